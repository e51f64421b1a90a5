//! Startup helpers for the AnBuddy server.

use std::process::ExitCode;

use crate::config::AppConfig;
use crate::server::{self, AppState};

/// Run the server (used by the `anbuddy-server` binary).
///
/// # Returns
/// `ExitCode::SUCCESS` on graceful shutdown, `1` on failure.
#[must_use]
pub fn run() -> ExitCode {
    init_tracing();

    tracing::info!("Starting AnBuddy v{}", env!("CARGO_PKG_VERSION"));

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {e}");
            return ExitCode::from(1);
        }
    };
    tracing::info!(
        model = %config.provider.model,
        provider_configured = config.provider.is_configured(),
        journal_capacity = config.journal.capacity,
        "configuration loaded"
    );

    let state = match AppState::new(&config) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Failed to create state: {e}");
            return ExitCode::from(1);
        }
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to create runtime: {e}");
            return ExitCode::from(1);
        }
    };

    if let Err(e) = rt.block_on(server::serve(
        state,
        config.server.port,
        shutdown_signal(),
    )) {
        tracing::error!("Server error: {e}");
        return ExitCode::from(1);
    }

    tracing::info!("AnBuddy stopped");
    ExitCode::SUCCESS
}

/// Install the global tracing subscriber, honouring `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .try_init();
}

/// Resolve on Ctrl+C. If the handler cannot be installed, never resolves.
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Ctrl+C handler failed: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
