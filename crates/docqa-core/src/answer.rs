//! Query-time orchestration: embed the question, retrieve passages, prompt
//! the generator.

use crate::embed::EmbeddingProvider;
use crate::generate::GenerationProvider;
use crate::index::VectorIndex;
use crate::models::{AnswerResult, SourcePassage};
use crate::{RagError, Result};
use std::sync::Arc;

/// Preview length for source excerpts returned to the caller. Truncation
/// applies only to the stored excerpt; the generator always sees the full
/// passage text.
const EXCERPT_LEN: usize = 200;

const PROMPT_PREAMBLE: &str = "\
Answer the question using only the context below. If the context does not \
contain the answer, say you don't know instead of making one up.";

/// Answers questions against a built index. Holds the read-only index and
/// the provider pair; safe to share across concurrent requests.
pub struct RetrievalAnswerer {
    index: Arc<VectorIndex>,
    embedder: Arc<dyn EmbeddingProvider>,
    generator: Arc<dyn GenerationProvider>,
    top_k: usize,
}

impl RetrievalAnswerer {
    pub fn new(
        index: Arc<VectorIndex>,
        embedder: Arc<dyn EmbeddingProvider>,
        generator: Arc<dyn GenerationProvider>,
        top_k: usize,
    ) -> Self {
        Self {
            index,
            embedder,
            generator,
            top_k,
        }
    }

    pub fn index(&self) -> &VectorIndex {
        &self.index
    }

    /// Answer one question. No retries happen here; per-request provider
    /// failures are local to the request and never affect readiness.
    pub async fn answer(&self, question: &str) -> Result<AnswerResult> {
        // Cheap fail-fast before any billed provider call.
        if question.trim().is_empty() {
            return Err(RagError::InvalidQuestion);
        }

        let query_embedding = self
            .embedder
            .embed(&[question.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                RagError::EmbeddingUnavailable("provider returned no embedding".into())
            })?;

        let hits = self.index.search(&query_embedding, self.top_k)?;
        if hits.is_empty() {
            // Should not happen (an index is never empty), but an empty
            // context is still answerable: the prompt tells the model to
            // say it does not know.
            tracing::warn!("search returned no passages, answering with empty context");
        }

        let context: Vec<&str> = hits.iter().map(|(_, p)| p.text.as_str()).collect();
        // Assembled with format!, not placeholder substitution, so passage
        // text containing brace tokens passes through verbatim.
        let prompt = format!(
            "{PROMPT_PREAMBLE}\n\nContext:\n{}\n\nQuestion: {}\n\nAnswer:",
            context.join("\n\n"),
            question
        );

        tracing::debug!(passages = hits.len(), "prompting generator");
        let answer = self.generator.generate(&prompt).await?;

        let sources = hits
            .into_iter()
            .map(|(score, passage)| SourcePassage {
                excerpt: excerpt(&passage.text),
                score,
                metadata: passage.metadata,
            })
            .collect();

        Ok(AnswerResult {
            question: question.to_string(),
            answer,
            sources,
        })
    }
}

fn excerpt(text: &str) -> String {
    if text.chars().count() <= EXCERPT_LEN {
        return text.to_string();
    }
    let cut: String = text.chars().take(EXCERPT_LEN).collect();
    format!("{cut}...")
}
