use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// A retrievable unit of corpus text.
///
/// Created during ingestion and immutable thereafter; a corpus change
/// replaces the whole index rather than mutating passages in place.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Passage {
    /// Content-derived identifier, unique within an index.
    pub id: String,
    /// The chunk's text, a substring of the source corpus.
    pub text: String,
    /// Provenance fields (source file, byte offset). Opaque to the core;
    /// passed through to answers unchanged.
    pub metadata: BTreeMap<String, String>,
}

impl Passage {
    pub fn new(text: String, metadata: BTreeMap<String, String>) -> Self {
        let id = passage_id(&text, &metadata);
        Self { id, text, metadata }
    }
}

/// Derive a stable id from the passage content and its provenance, so two
/// identical paragraphs at different offsets still get distinct ids.
fn passage_id(text: &str, metadata: &BTreeMap<String, String>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    for (k, v) in metadata {
        hasher.update(k.as_bytes());
        hasher.update(b"=");
        hasher.update(v.as_bytes());
    }
    hex::encode(&hasher.finalize()[..8])
}

/// A passage excerpt returned with an answer, ordered by descending
/// relevance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcePassage {
    /// Bounded preview of the passage text. The full text is what goes to
    /// the generator; only the stored excerpt is truncated.
    pub excerpt: String,
    /// Similarity score from the search step.
    pub score: f32,
    pub metadata: BTreeMap<String, String>,
}

/// The response to one question. Constructed per request, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerResult {
    /// The question, verbatim as received.
    pub question: String,
    pub answer: String,
    pub sources: Vec<SourcePassage>,
}
