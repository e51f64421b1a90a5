//! HTTP route handlers for the AnBuddy API.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::chat::{ChatMessage, ReplyEnvelope};
use crate::emergency::{self, EmergencyContact};
use crate::journal::JournalEntry;
use crate::timestamp;

use super::error::ApiError;
use super::state::AppState;

/// Service name reported by the health check.
pub const SERVICE_NAME: &str = "AnBuddy Chatbot API";

/// Create the API router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/chat", post(chat))
        .route("/api/emergency-contacts", get(emergency_contacts))
        .route("/api/journal", get(list_journal).post(create_journal_entry))
        .with_state(state)
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `healthy`.
    pub status: &'static str,
    /// Service name.
    pub service: &'static str,
    /// Current time.
    pub timestamp: String,
}

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        service: SERVICE_NAME,
        timestamp: timestamp::now(),
    })
}

/// Chat request. Missing fields are treated as empty.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// The user's message.
    #[serde(default)]
    pub message: Option<String>,
    /// Prior turns, oldest first.
    #[serde(default)]
    pub conversation_history: Option<Vec<ChatMessage>>,
}

/// Handle chat messages.
async fn chat(
    State(state): State<Arc<AppState>>,
    request: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ReplyEnvelope>, ApiError> {
    let Json(request) = request?;
    let message = request.message.unwrap_or_default();
    let history = request.conversation_history.unwrap_or_default();

    let reply = state.orchestrator.handle(&message, &history).await?;
    Ok(Json(reply))
}

/// Emergency contacts response.
#[derive(Debug, Serialize)]
pub struct ContactsResponse {
    /// Always `true`.
    pub success: bool,
    /// The fixed contact table.
    pub contacts: &'static [EmergencyContact],
}

/// Return the emergency contact table.
async fn emergency_contacts() -> impl IntoResponse {
    Json(ContactsResponse {
        success: true,
        contacts: emergency::contacts(),
    })
}

/// Journal listing response.
#[derive(Debug, Serialize)]
pub struct JournalListResponse {
    /// Always `true`.
    pub success: bool,
    /// Entries, newest first.
    pub entries: Vec<JournalEntry>,
}

/// List journal entries.
async fn list_journal(State(state): State<Arc<AppState>>) -> Json<JournalListResponse> {
    Json(JournalListResponse {
        success: true,
        entries: state.journal.list(),
    })
}

/// Journal create request.
#[derive(Debug, Deserialize)]
pub struct JournalRequest {
    /// Note text.
    #[serde(default)]
    pub text: Option<String>,
    /// Optional client timestamp.
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Journal create response.
#[derive(Debug, Serialize)]
pub struct JournalEntryResponse {
    /// Always `true`.
    pub success: bool,
    /// The stored entry.
    pub entry: JournalEntry,
}

/// Append a journal entry.
async fn create_journal_entry(
    State(state): State<Arc<AppState>>,
    request: Result<Json<JournalRequest>, JsonRejection>,
) -> Result<Json<JournalEntryResponse>, ApiError> {
    let Json(request) = request?;
    let text = request.text.unwrap_or_default();

    let entry = state.journal.append(&text, request.timestamp.as_deref())?;
    Ok(Json(JournalEntryResponse {
        success: true,
        entry,
    }))
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::chat::ResponseOrchestrator;
    use crate::config::ProviderConfig;
    use crate::fallback::FallbackCategory;
    use crate::journal::JournalStore;
    use crate::llm::OpenAiChat;

    type TestResult = Result<(), Box<dyn Error>>;

    fn make_app() -> Result<Router, Box<dyn Error>> {
        let provider = OpenAiChat::new(ProviderConfig::default())?;
        let state = AppState::from_parts(
            ResponseOrchestrator::with_rng(Arc::new(provider), StdRng::seed_from_u64(1)),
            JournalStore::default(),
        );
        Ok(create_router(state))
    }

    async fn send(app: Router, request: Request<Body>) -> Result<(StatusCode, Value), Box<dyn Error>> {
        let resp = app.oneshot(request).await?;
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), 1024 * 1024).await?;
        Ok((status, serde_json::from_slice(&body)?))
    }

    fn post_json(uri: &str, body: &Value) -> Result<Request<Body>, Box<dyn Error>> {
        Ok(Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))?)
    }

    #[tokio::test]
    async fn test_health_endpoint() -> TestResult {
        let (status, body) = send(make_app()?, Request::get("/api/health").body(Body::empty())?).await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], SERVICE_NAME);
        assert!(body["timestamp"].is_string());
        Ok(())
    }

    #[tokio::test]
    async fn test_chat_falls_back_without_credential() -> TestResult {
        let request = post_json(
            "/api/chat",
            &json!({
                "message": "I feel anxious today",
                "conversation_history": [
                    {"id": 1, "text": "hello", "isUser": true},
                    {"id": 2, "text": "Hi there!", "isUser": false}
                ]
            }),
        )?;
        let (status, body) = send(make_app()?, request).await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["message_id"], 4);
        let response = body["response"].as_str().unwrap_or_default();
        assert!(
            FallbackCategory::Anxiety
                .responses()
                .iter()
                .any(|candidate| *candidate == response)
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_chat_rejects_blank_message() -> TestResult {
        for payload in [json!({"message": "   "}), json!({})] {
            let (status, body) = send(make_app()?, post_json("/api/chat", &payload)?).await?;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body, json!({"success": false, "error": "Message is required"}));
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_chat_malformed_history_is_server_error() -> TestResult {
        let request = post_json(
            "/api/chat",
            &json!({"message": "hi", "conversation_history": [{"text": "no flag"}]}),
        )?;
        let (status, body) = send(make_app()?, request).await?;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().is_some_and(|e| !e.is_empty()));
        Ok(())
    }

    #[tokio::test]
    async fn test_emergency_contacts() -> TestResult {
        let request = Request::get("/api/emergency-contacts").body(Body::empty())?;
        let (status, body) = send(make_app()?, request).await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["contacts"].as_array().map(Vec::len), Some(4));
        assert_eq!(body["contacts"][0]["number"], "911");
        assert_eq!(body["contacts"][3]["type"], "support");
        Ok(())
    }

    #[tokio::test]
    async fn test_journal_create_and_list() -> TestResult {
        let app = make_app()?;

        let created = post_json(
            "/api/journal",
            &json!({"text": "Slept well", "timestamp": "2024-05-01T08:00:00.000Z"}),
        )?;
        let (status, body) = send(app.clone(), created).await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "success": true,
                "entry": {"id": 1, "text": "Slept well", "timestamp": "2024-05-01T08:00:00.000Z"}
            })
        );

        let second = post_json("/api/journal", &json!({"text": "Went running"}))?;
        send(app.clone(), second).await?;

        let (status, body) = send(app, Request::get("/api/journal").body(Body::empty())?).await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        let texts: Vec<&str> = body["entries"]
            .as_array()
            .map(|entries| entries.iter().filter_map(|e| e["text"].as_str()).collect())
            .unwrap_or_default();
        assert_eq!(texts, ["Went running", "Slept well"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_journal_rejects_blank_text() -> TestResult {
        let app = make_app()?;
        let (status, body) = send(app.clone(), post_json("/api/journal", &json!({"text": ""}))?).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"success": false, "error": "Text is required"}));

        let (_, body) = send(app, Request::get("/api/journal").body(Body::empty())?).await?;
        assert_eq!(body["entries"], json!([]));
        Ok(())
    }
}
