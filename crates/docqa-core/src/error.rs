//! Error taxonomy for the answering pipeline.
//!
//! Every failure surfaced to a caller carries a machine-distinguishable kind
//! (see [`RagError::kind`]) so the serving boundary can map it to a status
//! code without string matching.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, RagError>;

#[derive(Debug, Error)]
pub enum RagError {
    /// The question was empty or all-whitespace. Rejected before any
    /// provider call is made.
    #[error("question must not be empty")]
    InvalidQuestion,

    /// A caller violated an input contract (e.g. `k = 0` on search).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Initialization has not run yet (eager policy only).
    #[error("service is not ready: {0}")]
    NotReady(String),

    /// Initialization failed and the process will not retry it.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),

    /// The embedding provider failed during a request.
    #[error("embedding provider failed: {0}")]
    EmbeddingUnavailable(String),

    /// The generation provider failed during a request.
    #[error("generation provider failed: {0}")]
    GenerationUnavailable(String),

    /// No persisted index exists at the given location.
    #[error("no index found at {path}")]
    IndexNotFound { path: PathBuf },

    /// A persisted index exists but cannot be decoded.
    #[error("index at {path} is corrupt: {reason}")]
    IndexCorrupt { path: PathBuf, reason: String },

    /// An embedding did not match the index dimension.
    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// An index cannot be built from zero entries.
    #[error("cannot build an index from zero passages")]
    EmptyIndex,

    /// The corpus contained no text to chunk.
    #[error("corpus contains no text")]
    EmptyCorpus,

    /// An index build aborted; no partial index was persisted.
    #[error("ingestion failed: {0}")]
    IngestionFailed(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl RagError {
    /// Stable machine-readable kind, serialized at the serving boundary.
    pub fn kind(&self) -> &'static str {
        match self {
            RagError::InvalidQuestion => "invalid_question",
            RagError::InvalidInput(_) => "invalid_input",
            RagError::NotReady(_) => "not_ready",
            RagError::ServiceUnavailable(_) => "service_unavailable",
            RagError::EmbeddingUnavailable(_) => "embedding_unavailable",
            RagError::GenerationUnavailable(_) => "generation_unavailable",
            RagError::IndexNotFound { .. } => "index_not_found",
            RagError::IndexCorrupt { .. } => "index_corrupt",
            RagError::DimensionMismatch { .. } => "dimension_mismatch",
            RagError::EmptyIndex => "empty_index",
            RagError::EmptyCorpus => "empty_corpus",
            RagError::IngestionFailed(_) => "ingestion_failed",
            RagError::Io(_) => "io",
        }
    }
}
