//! HTTP endpoint tests against mock providers.

use async_trait::async_trait;
use axum::body::Body;
use docqa_config::Config;
use docqa_core::embed::EmbeddingProvider;
use docqa_core::generate::GenerationProvider;
use docqa_core::ingest::IngestionPipeline;
use docqa_core::readiness::{InitPolicy, ReadinessController};
use docqa_core::{RagError, Result};
use docqa_server::{router, AppState};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

struct KeywordEmbedder;

#[async_trait]
impl EmbeddingProvider for KeywordEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts
            .iter()
            .map(|t| {
                if t.contains("AI") {
                    vec![1.0, 0.1]
                } else {
                    vec![0.1, 1.0]
                }
            })
            .collect())
    }

    fn model(&self) -> &str {
        "keyword-test"
    }
}

struct FixedGenerator;

#[async_trait]
impl GenerationProvider for FixedGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        Ok("a generated answer".to_string())
    }
}

struct FailingEmbedder;

#[async_trait]
impl EmbeddingProvider for FailingEmbedder {
    async fn embed(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Err(RagError::EmbeddingUnavailable("no credentials".into()))
    }

    fn model(&self) -> &str {
        "failing-test"
    }
}

fn make_state(dir: &TempDir, embedder: Arc<dyn EmbeddingProvider>) -> AppState {
    let corpus = dir.path().join("data.txt");
    std::fs::write(
        &corpus,
        "AI is a branch of computer science.\n\nMachine Learning is a subset.",
    )
    .unwrap();

    let mut config = Config::default();
    config.storage.data_dir = dir.path().join(".docqa");
    config.storage.corpus_file = corpus.clone();

    let pipeline = IngestionPipeline::new(corpus, config.index_dir(), 500, 50);
    let controller = ReadinessController::new(
        pipeline,
        embedder,
        Arc::new(FixedGenerator),
        2,
        InitPolicy::Lazy,
    );
    AppState {
        controller: Arc::new(controller),
        config: Arc::new(config),
    }
}

fn get(uri: &str) -> axum::http::Request<Body> {
    axum::http::Request::builder()
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, body: serde_json::Value) -> axum::http::Request<Body> {
    axum::http::Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

async fn send(
    state: AppState,
    req: axum::http::Request<Body>,
) -> (axum::http::StatusCode, serde_json::Value) {
    let app = router(state);
    let resp = ServiceExt::<axum::http::Request<Body>>::oneshot(app, req)
        .await
        .unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), 100_000).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn health_is_ok() {
    let dir = TempDir::new().unwrap();
    let state = make_state(&dir, Arc::new(KeywordEmbedder));
    let (status, json) = send(state, get("/health")).await;
    assert_eq!(status, 200);
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn ask_answers_with_sources() {
    let dir = TempDir::new().unwrap();
    let state = make_state(&dir, Arc::new(KeywordEmbedder));
    let (status, json) = send(
        state,
        post_json("/ask", serde_json::json!({ "question": "What is AI?" })),
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(json["question"], "What is AI?");
    assert_eq!(json["answer"], "a generated answer");
    let sources = json["sources"].as_array().unwrap();
    assert_eq!(sources.len(), 2);
    assert!(sources[0]["excerpt"]
        .as_str()
        .unwrap()
        .starts_with("AI is a branch"));
}

#[tokio::test]
async fn blank_question_is_bad_request() {
    let dir = TempDir::new().unwrap();
    let state = make_state(&dir, Arc::new(KeywordEmbedder));
    let (status, json) = send(
        state,
        post_json("/ask", serde_json::json!({ "question": "   " })),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(json["error"], "invalid_question");
}

#[tokio::test]
async fn missing_question_field_is_bad_request() {
    let dir = TempDir::new().unwrap();
    let state = make_state(&dir, Arc::new(KeywordEmbedder));
    let (status, json) = send(state, post_json("/ask", serde_json::json!({}))).await;
    assert_eq!(status, 400);
    assert_eq!(json["error"], "invalid_question");
}

#[tokio::test]
async fn failed_initialization_is_service_unavailable() {
    let dir = TempDir::new().unwrap();
    let state = make_state(&dir, Arc::new(FailingEmbedder));

    let (status, json) = send(
        state.clone(),
        post_json("/ask", serde_json::json!({ "question": "What is AI?" })),
    )
    .await;
    assert_eq!(status, 503);
    assert_eq!(json["error"], "service_unavailable");

    // Degraded is terminal: the status endpoint reflects it.
    let (status, json) = send(state, get("/status")).await;
    assert_eq!(status, 200);
    assert_eq!(json["state"], "degraded");
}

#[tokio::test]
async fn status_reflects_readiness_transitions() {
    let dir = TempDir::new().unwrap();
    let state = make_state(&dir, Arc::new(KeywordEmbedder));

    let (_, json) = send(state.clone(), get("/status")).await;
    assert_eq!(json["state"], "uninitialized");
    assert_eq!(json["corpus_exists"], true);
    assert_eq!(json["index_exists"], false);

    send(
        state.clone(),
        post_json("/ask", serde_json::json!({ "question": "What is AI?" })),
    )
    .await;

    let (_, json) = send(state, get("/status")).await;
    assert_eq!(json["state"], "ready");
    assert_eq!(json["index_exists"], true);
}
