use super::GenerationProvider;
use crate::{RagError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::env;

/// Completions via the OpenAI `/v1/chat/completions` endpoint.
pub struct OpenAiGenerator {
    client: reqwest::Client,
    api_key: String,
    api_base: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAiGenerator {
    pub fn from_env(model: &str, temperature: f32, max_tokens: u32) -> Result<Self> {
        let api_key = env::var("OPENAI_API_KEY").map_err(|_| {
            RagError::GenerationUnavailable("OPENAI_API_KEY environment variable not set".into())
        })?;
        let api_base =
            env::var("OPENAI_API_BASE").unwrap_or_else(|_| "https://api.openai.com/v1".into());
        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            api_base,
            model: model.to_string(),
            temperature,
            max_tokens,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[async_trait]
impl GenerationProvider for OpenAiGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let resp = self
            .client
            .post(format!(
                "{}/chat/completions",
                self.api_base.trim_end_matches('/')
            ))
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({
                "model": self.model,
                "messages": [
                    { "role": "user", "content": prompt }
                ],
                "max_tokens": self.max_tokens,
                "temperature": self.temperature,
            }))
            .send()
            .await
            .map_err(|e| RagError::GenerationUnavailable(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(RagError::GenerationUnavailable(format!(
                "openai error ({status}): {body}"
            )));
        }

        let parsed: ChatResponse = resp
            .json()
            .await
            .map_err(|e| RagError::GenerationUnavailable(format!("invalid response: {e}")))?;

        let content = parsed
            .choices
            .first()
            .map(|c| c.message.content.clone())
            .unwrap_or_default();
        if content.trim().is_empty() {
            // An ambiguous provider response is a failure, not an answer.
            Err(RagError::GenerationUnavailable(
                "empty response from provider".into(),
            ))
        } else {
            Ok(content)
        }
    }
}
