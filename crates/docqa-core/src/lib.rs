//! docqa-core - retrieval-augmented question answering over a text corpus
//!
//! # Architecture
//!
//! ```text
//! Corpus -> Chunker -> EmbeddingProvider -> VectorIndex (persist)
//!                                               |
//! Question -> EmbeddingProvider -> search <-----+
//!                                     |
//!                 prompt assembly -> GenerationProvider -> AnswerResult
//! ```
//!
//! Ingestion runs once per corpus version and is gated by the
//! [`readiness::ReadinessController`], which owns the built index and the
//! provider pair. The index is immutable once built and is shared read-only
//! across concurrent `answer` calls.

pub mod answer;
pub mod chunk;
pub mod embed;
pub mod error;
pub mod generate;
pub mod index;
pub mod ingest;
pub mod models;
pub mod readiness;

pub use error::{RagError, Result};
