//! Flat vector index with durable save/load.
//!
//! A flat exact scan rather than an approximate structure: the corpus is a
//! single document's chunks, so exact cosine ranking is affordable and makes
//! the ordering contract exact. The persisted layout is a directory holding
//! `vectors.bin` (bincode entries) and `manifest.json` (fingerprint and
//! shape), published atomically via a staging directory and rename so a
//! crash mid-write can never leave a loadable corrupt index.

use crate::models::Passage;
use crate::{RagError, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fs;
use std::path::Path;

const VECTORS_FILE: &str = "vectors.bin";
const MANIFEST_FILE: &str = "manifest.json";
const MANIFEST_VERSION: u32 = 1;

/// Describes a persisted index so reuse can be decided without decoding the
/// vector data. The fingerprint covers corpus text, chunking parameters and
/// embedding model; any change invalidates the index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IndexManifest {
    pub version: u32,
    pub fingerprint: String,
    pub dimension: usize,
    pub entries: usize,
    pub embedding_model: String,
}

impl IndexManifest {
    pub fn new(fingerprint: String, dimension: usize, entries: usize, model: &str) -> Self {
        Self {
            version: MANIFEST_VERSION,
            fingerprint,
            dimension,
            entries,
            embedding_model: model.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct IndexEntry {
    passage: Passage,
    embedding: Vec<f32>,
}

/// Immutable passage embeddings with nearest-neighbor search.
///
/// Once built the index is read-only and safe to share across concurrent
/// searches without locking. A corpus change rebuilds and replaces it
/// wholesale.
#[derive(Debug, Serialize, Deserialize)]
pub struct VectorIndex {
    dimension: usize,
    entries: Vec<IndexEntry>,
}

impl VectorIndex {
    /// Build an index from `(passage, embedding)` pairs.
    ///
    /// Fails with `EmptyIndex` on zero entries and `DimensionMismatch` if
    /// the embeddings are not all the same length.
    pub fn build(pairs: Vec<(Passage, Vec<f32>)>) -> Result<Self> {
        let dimension = match pairs.first() {
            Some((_, embedding)) => embedding.len(),
            None => return Err(RagError::EmptyIndex),
        };
        let mut entries = Vec::with_capacity(pairs.len());
        for (passage, embedding) in pairs {
            if embedding.len() != dimension {
                return Err(RagError::DimensionMismatch {
                    expected: dimension,
                    actual: embedding.len(),
                });
            }
            entries.push(IndexEntry { passage, embedding });
        }
        Ok(Self { dimension, entries })
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Top-`k` passages by descending cosine similarity to `query`.
    ///
    /// Ties keep insertion order (the sort is stable). `k = 0` is a caller
    /// contract violation; `k` beyond the entry count returns everything.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<(f32, Passage)>> {
        if k == 0 {
            return Err(RagError::InvalidInput("search requires k >= 1".into()));
        }
        if query.len() != self.dimension {
            return Err(RagError::DimensionMismatch {
                expected: self.dimension,
                actual: query.len(),
            });
        }

        let mut scored: Vec<(f32, &IndexEntry)> = self
            .entries
            .iter()
            .map(|e| (cosine_similarity(query, &e.embedding), e))
            .collect();
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
        scored.truncate(k);

        Ok(scored
            .into_iter()
            .map(|(score, e)| (score, e.passage.clone()))
            .collect())
    }

    /// Persist to `dir` atomically: both files are written into a staging
    /// directory next to `dir`, then the staging directory is renamed into
    /// place. In-flight readers hold the previous index in memory and are
    /// never disrupted by the swap.
    pub fn persist(&self, dir: &Path, manifest: &IndexManifest) -> Result<()> {
        let parent = dir.parent().unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent)?;

        let staging = tempfile::Builder::new()
            .prefix(".index-staging-")
            .tempdir_in(parent)?;

        let vectors = bincode::serialize(self)
            .map_err(|e| RagError::IngestionFailed(format!("encode index: {e}")))?;
        fs::write(staging.path().join(VECTORS_FILE), vectors)?;

        let manifest_json = serde_json::to_vec_pretty(manifest)
            .map_err(|e| RagError::IngestionFailed(format!("encode manifest: {e}")))?;
        fs::write(staging.path().join(MANIFEST_FILE), manifest_json)?;

        if dir.exists() {
            fs::remove_dir_all(dir)?;
        }
        fs::rename(staging.keep(), dir)?;
        Ok(())
    }

    /// Load a persisted index. Missing directory or vector file fails with
    /// `IndexNotFound`; anything present but undecodable fails with
    /// `IndexCorrupt`, so the caller can decide between rebuild and abort.
    pub fn load(dir: &Path) -> Result<(Self, IndexManifest)> {
        let vectors_path = dir.join(VECTORS_FILE);
        if !vectors_path.exists() {
            return Err(RagError::IndexNotFound {
                path: dir.to_path_buf(),
            });
        }

        let manifest_path = dir.join(MANIFEST_FILE);
        let manifest_bytes = fs::read(&manifest_path).map_err(|e| RagError::IndexCorrupt {
            path: dir.to_path_buf(),
            reason: format!("missing manifest: {e}"),
        })?;
        let manifest: IndexManifest =
            serde_json::from_slice(&manifest_bytes).map_err(|e| RagError::IndexCorrupt {
                path: dir.to_path_buf(),
                reason: format!("manifest: {e}"),
            })?;

        let vector_bytes = fs::read(&vectors_path)?;
        let index: VectorIndex =
            bincode::deserialize(&vector_bytes).map_err(|e| RagError::IndexCorrupt {
                path: dir.to_path_buf(),
                reason: format!("vectors: {e}"),
            })?;

        if manifest.version != MANIFEST_VERSION
            || manifest.dimension != index.dimension
            || manifest.entries != index.entries.len()
            || index.entries.iter().any(|e| e.embedding.len() != index.dimension)
        {
            return Err(RagError::IndexCorrupt {
                path: dir.to_path_buf(),
                reason: "manifest does not match vector data".into(),
            });
        }

        Ok((index, manifest))
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}
