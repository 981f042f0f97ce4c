use super::EmbeddingProvider;
use crate::{RagError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::env;

/// Embeddings via the OpenAI `/v1/embeddings` endpoint.
pub struct OpenAiEmbedder {
    client: reqwest::Client,
    api_key: String,
    api_base: String,
    model: String,
}

impl OpenAiEmbedder {
    pub fn from_env(model: &str) -> Result<Self> {
        let api_key = env::var("OPENAI_API_KEY").map_err(|_| {
            RagError::EmbeddingUnavailable("OPENAI_API_KEY environment variable not set".into())
        })?;
        let api_base =
            env::var("OPENAI_API_BASE").unwrap_or_else(|_| "https://api.openai.com/v1".into());
        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            api_base,
            model: model.to_string(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct EmbeddingObject {
    embedding: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingObject>,
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        // The API accepts a whole batch per request.
        let resp = self
            .client
            .post(format!(
                "{}/embeddings",
                self.api_base.trim_end_matches('/')
            ))
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({
                "input": texts,
                "model": self.model,
            }))
            .send()
            .await
            .map_err(|e| RagError::EmbeddingUnavailable(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(RagError::EmbeddingUnavailable(format!(
                "openai error ({status}): {body}"
            )));
        }

        let parsed: EmbeddingResponse = resp
            .json()
            .await
            .map_err(|e| RagError::EmbeddingUnavailable(format!("invalid response: {e}")))?;

        if parsed.data.len() != texts.len() {
            // A partial response is a failure, not a best-effort result.
            return Err(RagError::EmbeddingUnavailable(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                parsed.data.len()
            )));
        }

        Ok(parsed.data.into_iter().map(|d| d.embedding).collect())
    }

    fn model(&self) -> &str {
        &self.model
    }
}
