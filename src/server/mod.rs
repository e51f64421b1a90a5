//! HTTP server for the AnBuddy API.
//!
//! [`app`] stacks request tracing and an open CORS policy (the browser client
//! is served from another origin) on top of the route table; [`serve`] binds
//! every interface and runs until the shutdown future resolves.

pub mod error;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;

use std::future::Future;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;

use axum::Router;
use axum::http::{Method, header};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Failure to bind or to keep serving.
pub type ServeError = Box<dyn std::error::Error + Send + Sync>;

/// Route table wrapped in the tracing and CORS middleware.
#[must_use]
pub fn app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    create_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors),
    )
}

/// Serve the API on `0.0.0.0:port` until `shutdown` completes.
///
/// In-flight requests are allowed to finish once shutdown starts.
///
/// # Errors
/// Returns an error if the port cannot be bound or the server fails.
pub async fn serve<F>(state: Arc<AppState>, port: u16, shutdown: F) -> Result<(), ServeError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind(SocketAddr::from((Ipv4Addr::UNSPECIFIED, port))).await?;
    let addr = listener.local_addr()?;
    tracing::info!(%addr, "AnBuddy API listening at http://{addr}/api");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!(%addr, "AnBuddy API stopped");
    Ok(())
}
