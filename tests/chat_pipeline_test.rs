use std::error::Error;
use std::sync::{Arc, Mutex};

use anbuddy_agent::chat::{ChatMessage, ResponseOrchestrator};
use anbuddy_agent::config::AppConfig;
use anbuddy_agent::fallback::{self, FallbackCategory};
use anbuddy_agent::journal::JournalStore;
use anbuddy_agent::llm::{ChatProvider, ProviderFailure, ProviderFuture, ProviderResult};
use anbuddy_agent::server::{AppState, create_router};
use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::{Value, json};
use tower::ServiceExt;

type TestResult = Result<(), Box<dyn Error>>;

/// Echoes the message and the history it was handed.
struct EchoProvider;

impl ChatProvider for EchoProvider {
    fn generate<'a>(
        &'a self,
        message: &'a str,
        history: &'a [ChatMessage],
    ) -> ProviderFuture<'a, ProviderResult<String>> {
        let reply: ProviderResult<String> = Ok(format!("echo: {message} [{}]", history.len()));
        Box::pin(async move { reply })
    }

    fn is_configured(&self) -> bool {
        true
    }
}

/// Fails like a provider behind a broken network.
struct OfflineProvider;

impl ChatProvider for OfflineProvider {
    fn generate<'a>(
        &'a self,
        _message: &'a str,
        _history: &'a [ChatMessage],
    ) -> ProviderFuture<'a, ProviderResult<String>> {
        let failure: ProviderResult<String> =
            Err(ProviderFailure::Malformed("connection reset".to_string()));
        Box::pin(async move { failure })
    }

    fn is_configured(&self) -> bool {
        true
    }
}

async fn send(app: Router, request: Request<Body>) -> Result<(StatusCode, Value), Box<dyn Error>> {
    let resp = app.oneshot(request).await?;
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), 1024 * 1024).await?;
    Ok((status, serde_json::from_slice(&body)?))
}

fn chat_request(message: &str, history: &[ChatMessage]) -> Result<Request<Body>, Box<dyn Error>> {
    let body = json!({"message": message, "conversation_history": history});
    Ok(Request::post("/api/chat")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))?)
}

fn history(len: usize) -> Vec<ChatMessage> {
    (0..len)
        .map(|i| ChatMessage {
            text: format!("turn {i}"),
            is_user: i % 2 == 0,
        })
        .collect()
}

#[tokio::test]
async fn test_provider_reply_reaches_client() -> TestResult {
    let app = create_router(AppState::with_provider(Arc::new(EchoProvider), 500));
    let (status, body) = send(app, chat_request("  how are you?  ", &history(3))?).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["response"], "echo: how are you? [3]");
    assert_eq!(body["message_id"], 5);
    Ok(())
}

#[tokio::test]
async fn test_every_message_gets_a_reply_when_offline() -> TestResult {
    let orchestrator =
        ResponseOrchestrator::with_rng(Arc::new(OfflineProvider), StdRng::seed_from_u64(42));
    let app = create_router(AppState::from_parts(orchestrator, JournalStore::default()));

    let messages = [
        "hello",
        "I feel anxious today",
        "so much pressure at work",
        "feeling blue",
        "the weather is odd",
        "hi, I'm stressed",
    ];
    for message in messages {
        let (status, body) = send(app.clone(), chat_request(message, &[])?).await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message_id"], 2);
        let response = body["response"].as_str().unwrap_or_default();
        assert!(!response.is_empty());
        assert!(
            fallback::select(message)
                .iter()
                .any(|candidate| *candidate == response),
            "{message:?} got {response:?}"
        );
    }

    assert_eq!(fallback::classify("hi, I'm stressed"), FallbackCategory::Greeting);
    Ok(())
}

#[tokio::test]
async fn test_journal_over_http_keeps_latest_entries() -> TestResult {
    let app = create_router(AppState::with_provider(Arc::new(EchoProvider), 3));

    for i in 1..=4 {
        let request = Request::post("/api/journal")
            .header("content-type", "application/json")
            .body(Body::from(json!({"text": format!("note {i}")}).to_string()))?;
        let (status, body) = send(app.clone(), request).await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["entry"]["text"], format!("note {i}"));
    }

    let (_, body) = send(app, Request::get("/api/journal").body(Body::empty())?).await?;
    let texts: Vec<String> = body["entries"]
        .as_array()
        .map(|entries| {
            entries
                .iter()
                .filter_map(|e| e["text"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default();
    assert_eq!(texts, ["note 4", "note 3", "note 2"]);
    Ok(())
}

async fn record_completion(
    State(recorded): State<Arc<Mutex<Vec<Value>>>>,
    Json(body): Json<Value>,
) -> Json<Value> {
    let count = body["messages"].as_array().map_or(0, Vec::len);
    if let Ok(mut calls) = recorded.lock() {
        calls.push(body);
    }
    Json(json!({
        "choices": [{"message": {"role": "assistant", "content": format!("saw {count} messages")}}]
    }))
}

#[tokio::test]
async fn test_only_recent_history_goes_upstream() -> TestResult {
    let recorded: Arc<Mutex<Vec<Value>>> = Arc::default();
    let upstream = Router::new()
        .route("/v1/chat/completions", post(record_completion))
        .with_state(Arc::clone(&recorded));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, upstream).await;
    });

    let base_url = format!("http://{addr}/v1");
    let config = AppConfig::from_lookup(|key| match key {
        "OPENAI_API_KEY" => Some("sk-test".to_string()),
        "ANBUDDY_OPENAI_BASE_URL" => Some(base_url.clone()),
        _ => None,
    })?;
    let state = AppState::new(&config).map_err(|e| e.to_string())?;
    let app = create_router(state);

    let (status, body) = send(app, chat_request("still here", &history(15))?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], "saw 12 messages");
    assert_eq!(body["message_id"], 17);

    let calls = recorded.lock().map(|calls| calls.clone()).unwrap_or_default();
    assert_eq!(calls.len(), 1);
    let sent: Vec<String> = calls[0]["messages"]
        .as_array()
        .map(|messages| {
            messages
                .iter()
                .skip(1)
                .filter_map(|m| m["content"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default();
    let expected: Vec<String> = (5..15)
        .map(|i| format!("turn {i}"))
        .chain(["still here".to_string()])
        .collect();
    assert_eq!(sent, expected);
    Ok(())
}
