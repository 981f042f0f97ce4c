//! Generation provider seam.

use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Generate a completion for `prompt`. Failures surface as
    /// `RagError::GenerationUnavailable`. No retries happen at this seam:
    /// a retried generation request has unclear idempotence semantics for
    /// billed calls.
    async fn generate(&self, prompt: &str) -> Result<String>;
}

mod openai;

pub use openai::OpenAiGenerator;
