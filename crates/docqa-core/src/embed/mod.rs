//! Embedding provider seam.
//!
//! The embedding model is an opaque external service: the core only relies
//! on it mapping text to a fixed-dimension vector. Retry policy, if any,
//! belongs to the provider implementation, not to the callers here.

use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a batch of texts. Returns one vector per input, all of the same
    /// dimension. Failures surface as `RagError::EmbeddingUnavailable`.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Model identifier, recorded in the index manifest so a model change
    /// invalidates a persisted index.
    fn model(&self) -> &str;
}

mod openai;

pub use openai::OpenAiEmbedder;
