use std::sync::Arc;

use anyhow::Context;
use axum::Json;
use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::Settings;
use crate::error::ChatError;
use crate::gateway::ChatGateway;
use crate::providers::gemini::GeminiGateway;
use crate::session::ChatSession;

const INDEX_HTML: &str = include_str!("../assets/index.html");

/// Shared state for the web handlers.
///
/// The gateway is stateless and safe to share; each request gets its own
/// [`ChatSession`], so transcripts never cross requests.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<dyn ChatGateway>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/chat", post(chat))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(settings: Settings, host: &str, port: u16) -> anyhow::Result<()> {
    let gateway = GeminiGateway::new(&settings)?;
    let state = AppState {
        gateway: Arc::new(gateway),
    };
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind((host, port))
        .await
        .with_context(|| format!("Failed to bind {host}:{port}"))?;
    info!(
        addr = %listener.local_addr()?,
        model = %settings.model_name,
        "chat web interface listening"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Web server terminated unexpectedly")
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn chat(State(state): State<AppState>, body: Bytes) -> Response {
    let Ok(payload) = serde_json::from_slice::<Value>(&body) else {
        warn!("rejected chat request with unparseable body");
        return error_response(StatusCode::BAD_REQUEST, "Invalid JSON");
    };
    let Some(message) = payload.get("message").and_then(Value::as_str) else {
        warn!("rejected chat request without a message field");
        return error_response(StatusCode::BAD_REQUEST, "Message is required");
    };

    let mut session = ChatSession::new(state.gateway.clone());
    match session.send(message).await {
        Ok(reply) => (StatusCode::OK, Json(json!({ "response": reply }))).into_response(),
        Err(err @ ChatError::RateLimited { .. }) => {
            warn!(error = %err, "chat request rate limited");
            (
                StatusCode::TOO_MANY_REQUESTS,
                Json(json!({ "error": err.to_string(), "rate_limited": true })),
            )
                .into_response()
        }
        Err(err) => {
            warn!(error = %err, "chat request failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &err.to_string())
        }
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
