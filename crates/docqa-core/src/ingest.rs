//! Corpus ingestion: chunk, embed, build, persist.
//!
//! Ingestion is idempotent by reuse. Embedding calls are billed, so a
//! persisted index whose fingerprint matches the current corpus and
//! parameters is loaded back without a single provider call. The
//! fingerprint covers the corpus text, chunking parameters and embedding
//! model, so any of them changing forces a rebuild instead of serving a
//! stale index.

use crate::chunk::Chunker;
use crate::embed::EmbeddingProvider;
use crate::index::{IndexManifest, VectorIndex};
use crate::models::Passage;
use crate::{RagError, Result};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::PathBuf;

/// Zero-configuration bootstrap corpus, written to the corpus path when no
/// corpus exists. Not the intended steady-state path.
const BOOTSTRAP_CORPUS: &str = "\
Artificial intelligence (AI) is a branch of computer science devoted to building systems that perform tasks normally requiring human intelligence.

Machine learning is a subset of artificial intelligence that lets computers learn from data and improve without being explicitly programmed.

Deep learning is a subset of machine learning that uses neural networks to model the way the human brain works.

Natural language processing (NLP) is a field of artificial intelligence focused on enabling computers to understand, interpret and generate human language.

Computer vision is a field of artificial intelligence that enables computers to derive high-level understanding from digital images and video.
";

const EMBED_BATCH_SIZE: usize = 32;

pub struct IngestionPipeline {
    corpus_path: PathBuf,
    index_dir: PathBuf,
    chunk_size: usize,
    overlap: usize,
}

impl IngestionPipeline {
    pub fn new(corpus_path: PathBuf, index_dir: PathBuf, chunk_size: usize, overlap: usize) -> Self {
        Self {
            corpus_path,
            index_dir,
            chunk_size,
            overlap,
        }
    }

    pub fn index_dir(&self) -> &PathBuf {
        &self.index_dir
    }

    pub fn corpus_path(&self) -> &PathBuf {
        &self.corpus_path
    }

    /// Load the persisted index if it is current, otherwise build one from
    /// the corpus and persist it atomically.
    ///
    /// A missing corpus file with a persisted index reuses that index; the
    /// bootstrap corpus is only written when neither exists.
    ///
    /// Any embedding failure aborts the whole build with `IngestionFailed`;
    /// no partial index is ever persisted.
    pub async fn ingest(&self, embedder: &dyn EmbeddingProvider) -> Result<VectorIndex> {
        // With no corpus file there is nothing to fingerprint against: a
        // persisted index is the corpus of record and is served as-is.
        if !self.corpus_path.exists() {
            if let Ok((index, _)) = VectorIndex::load(&self.index_dir) {
                tracing::info!(
                    entries = index.len(),
                    dir = %self.index_dir.display(),
                    "corpus file absent, reusing persisted index"
                );
                return Ok(index);
            }
        }

        let corpus = self.resolve_corpus()?;
        let fingerprint = self.fingerprint(&corpus, embedder.model());

        match VectorIndex::load(&self.index_dir) {
            Ok((index, manifest)) if manifest.fingerprint == fingerprint => {
                tracing::info!(
                    entries = index.len(),
                    dir = %self.index_dir.display(),
                    "reusing persisted index"
                );
                return Ok(index);
            }
            Ok(_) => {
                tracing::warn!(
                    dir = %self.index_dir.display(),
                    "persisted index is stale (corpus or parameters changed), rebuilding"
                );
            }
            Err(RagError::IndexNotFound { .. }) => {
                tracing::info!(dir = %self.index_dir.display(), "no persisted index, building");
            }
            Err(RagError::IndexCorrupt { reason, .. }) => {
                tracing::warn!(%reason, "persisted index is corrupt, rebuilding");
            }
            Err(e) => return Err(e),
        }

        let index = self.build(&corpus, embedder).await?;
        let manifest = IndexManifest::new(
            fingerprint,
            index.dimension(),
            index.len(),
            embedder.model(),
        );
        index.persist(&self.index_dir, &manifest)?;
        tracing::info!(
            entries = index.len(),
            dimension = index.dimension(),
            dir = %self.index_dir.display(),
            "index built and persisted"
        );
        Ok(index)
    }

    async fn build(&self, corpus: &str, embedder: &dyn EmbeddingProvider) -> Result<VectorIndex> {
        let source = self
            .corpus_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "corpus".to_string());

        let chunker = Chunker::new(self.chunk_size, self.overlap)?;
        let passages = chunker.split(corpus, &source);
        if passages.is_empty() {
            return Err(RagError::EmptyCorpus);
        }
        tracing::info!(passages = passages.len(), "corpus chunked");

        let mut pairs: Vec<(Passage, Vec<f32>)> = Vec::with_capacity(passages.len());
        for batch in passages.chunks(EMBED_BATCH_SIZE) {
            let texts: Vec<String> = batch.iter().map(|p| p.text.clone()).collect();
            let embeddings = embedder
                .embed(&texts)
                .await
                .map_err(|e| RagError::IngestionFailed(e.to_string()))?;
            if embeddings.len() != batch.len() {
                return Err(RagError::IngestionFailed(format!(
                    "provider returned {} embeddings for {} passages",
                    embeddings.len(),
                    batch.len()
                )));
            }
            pairs.extend(batch.iter().cloned().zip(embeddings));
        }

        VectorIndex::build(pairs)
    }

    /// Read the corpus file, materializing the bootstrap corpus when none
    /// exists.
    fn resolve_corpus(&self) -> Result<String> {
        if self.corpus_path.exists() {
            return Ok(fs::read_to_string(&self.corpus_path)?);
        }
        tracing::warn!(
            path = %self.corpus_path.display(),
            "corpus file not found, writing built-in sample corpus"
        );
        if let Some(parent) = self.corpus_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.corpus_path, BOOTSTRAP_CORPUS)?;
        Ok(BOOTSTRAP_CORPUS.to_string())
    }

    fn fingerprint(&self, corpus: &str, model: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(corpus.as_bytes());
        hasher.update(self.chunk_size.to_le_bytes());
        hasher.update(self.overlap.to_le_bytes());
        hasher.update(model.as_bytes());
        hex::encode(hasher.finalize())
    }
}
