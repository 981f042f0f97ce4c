//! HTTP serving boundary for the answering pipeline.
//!
//! Thin glue over `docqa-core`: JSON in, JSON out, and a one-to-one mapping
//! from the core error taxonomy to status codes. Holds no answering logic
//! of its own.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use docqa_config::Config;
use docqa_core::readiness::ReadinessController;
use docqa_core::RagError;
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<ReadinessController>,
    pub config: Arc<Config>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(info_handler))
        .route("/health", get(health_handler))
        .route("/status", get(status_handler))
        .route("/ask", post(ask_handler))
        .with_state(state)
}

pub async fn run(state: AppState, addr: SocketAddr) -> anyhow::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "serving");
    axum::serve(listener, app).await?;
    Ok(())
}

#[derive(Debug, Deserialize)]
struct AskRequest {
    question: Option<String>,
}

/// Wraps the core taxonomy so each kind maps to a distinguishable status
/// code instead of a blanket 500.
struct ApiError(RagError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            RagError::InvalidQuestion | RagError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            RagError::NotReady(_) | RagError::ServiceUnavailable(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            RagError::EmbeddingUnavailable(_) | RagError::GenerationUnavailable(_) => {
                StatusCode::BAD_GATEWAY
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = serde_json::json!({
            "error": self.0.kind(),
            "message": self.0.to_string(),
        });
        (status, Json(body)).into_response()
    }
}

async fn ask_handler(
    State(state): State<AppState>,
    Json(req): Json<AskRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let question = req.question.ok_or(ApiError(RagError::InvalidQuestion))?;
    let result = state
        .controller
        .answer(&question)
        .await
        .map_err(ApiError)?;
    Ok(Json(result))
}

async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn status_handler(State(state): State<AppState>) -> impl IntoResponse {
    let readiness = state.controller.state();
    let body = serde_json::json!({
        "state": readiness.as_str(),
        "detail": match &readiness {
            docqa_core::readiness::ReadinessState::Degraded(reason) => Some(reason.as_str()),
            _ => None,
        },
        "index_exists": state.config.index_dir().exists(),
        "corpus_exists": state.config.storage.corpus_file.exists(),
        "openai_api_key_set": std::env::var("OPENAI_API_KEY").map(|v| !v.is_empty()).unwrap_or(false),
    });
    Json(body)
}

async fn info_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "service": "docqa",
        "description": "retrieval-augmented question answering over a text corpus",
        "endpoints": {
            "/": "service info",
            "/health": "liveness probe",
            "/status": "readiness and storage state",
            "/ask": "answer a question (POST {\"question\": ...})",
        },
    }))
}
