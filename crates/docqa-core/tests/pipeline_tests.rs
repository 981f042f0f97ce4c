//! End-to-end ingestion and answering against mock providers.

use async_trait::async_trait;
use docqa_core::answer::RetrievalAnswerer;
use docqa_core::embed::EmbeddingProvider;
use docqa_core::generate::GenerationProvider;
use docqa_core::index::VectorIndex;
use docqa_core::ingest::IngestionPipeline;
use docqa_core::{RagError, Result};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::tempdir;

const TWO_PARAGRAPHS: &str = "\
AI is a branch of computer science devoted to intelligent systems.

Machine Learning is the study of programs that improve with data.
";

struct KeywordEmbedder {
    calls: AtomicUsize,
}

impl KeywordEmbedder {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl EmbeddingProvider for KeywordEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(texts
            .iter()
            .map(|t| {
                if t.contains("AI") {
                    vec![1.0, 0.1]
                } else {
                    vec![0.1, 1.0]
                }
            })
            .collect())
    }

    fn model(&self) -> &str {
        "keyword-test"
    }
}

struct FixedGenerator;

#[async_trait]
impl GenerationProvider for FixedGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        Ok("a fixed generated answer".to_string())
    }
}

fn write_corpus(dir: &Path, content: &str) -> std::path::PathBuf {
    let path = dir.join("data.txt");
    std::fs::write(&path, content).unwrap();
    path
}

#[tokio::test]
async fn ingest_then_answer_end_to_end() {
    let dir = tempdir().unwrap();
    let corpus = write_corpus(dir.path(), TWO_PARAGRAPHS);
    let pipeline = IngestionPipeline::new(corpus, dir.path().join("index"), 500, 50);

    let embedder = Arc::new(KeywordEmbedder::new());
    let index = pipeline.ingest(embedder.as_ref()).await.unwrap();
    assert_eq!(index.len(), 2);
    assert_eq!(index.dimension(), 2);

    let answerer = RetrievalAnswerer::new(
        Arc::new(index),
        embedder,
        Arc::new(FixedGenerator),
        2,
    );
    let result = answerer.answer("What is AI?").await.unwrap();

    assert_eq!(result.answer, "a fixed generated answer");
    assert_eq!(result.sources.len(), 2);
    assert!(result.sources[0].excerpt.starts_with("AI is a branch"));
    assert_eq!(result.sources[0].metadata["source"], "data.txt");
}

#[tokio::test]
async fn second_ingest_reuses_the_persisted_index_without_embedding() {
    let dir = tempdir().unwrap();
    let corpus = write_corpus(dir.path(), TWO_PARAGRAPHS);
    let pipeline = IngestionPipeline::new(corpus, dir.path().join("index"), 500, 50);

    let first = Arc::new(KeywordEmbedder::new());
    pipeline.ingest(first.as_ref()).await.unwrap();
    assert_eq!(first.calls.load(Ordering::SeqCst), 1);

    let second = Arc::new(KeywordEmbedder::new());
    let reloaded = pipeline.ingest(second.as_ref()).await.unwrap();
    assert_eq!(second.calls.load(Ordering::SeqCst), 0);
    assert_eq!(reloaded.len(), 2);
}

#[tokio::test]
async fn corpus_change_invalidates_the_persisted_index() {
    let dir = tempdir().unwrap();
    let corpus = write_corpus(dir.path(), TWO_PARAGRAPHS);
    let pipeline = IngestionPipeline::new(corpus.clone(), dir.path().join("index"), 500, 50);

    pipeline.ingest(&KeywordEmbedder::new()).await.unwrap();

    std::fs::write(&corpus, "An entirely new corpus about AI.").unwrap();
    let embedder = KeywordEmbedder::new();
    let rebuilt = pipeline.ingest(&embedder).await.unwrap();

    assert_eq!(embedder.calls.load(Ordering::SeqCst), 1);
    assert_eq!(rebuilt.len(), 1);
}

#[tokio::test]
async fn chunking_parameter_change_invalidates_the_persisted_index() {
    let dir = tempdir().unwrap();
    let corpus = write_corpus(dir.path(), TWO_PARAGRAPHS);
    let index_dir = dir.path().join("index");

    IngestionPipeline::new(corpus.clone(), index_dir.clone(), 500, 50)
        .ingest(&KeywordEmbedder::new())
        .await
        .unwrap();

    let embedder = KeywordEmbedder::new();
    IngestionPipeline::new(corpus, index_dir, 400, 40)
        .ingest(&embedder)
        .await
        .unwrap();
    assert_eq!(embedder.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn missing_corpus_with_persisted_index_reuses_it() {
    let dir = tempdir().unwrap();
    let corpus = write_corpus(dir.path(), TWO_PARAGRAPHS);
    let pipeline = IngestionPipeline::new(corpus.clone(), dir.path().join("index"), 500, 50);

    pipeline.ingest(&KeywordEmbedder::new()).await.unwrap();

    // A deploy that ships only the index: the corpus file is gone.
    std::fs::remove_file(&corpus).unwrap();
    let embedder = KeywordEmbedder::new();
    let reused = pipeline.ingest(&embedder).await.unwrap();

    assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);
    assert_eq!(reused.len(), 2);
    // No sample corpus is written over the deployment either.
    assert!(!corpus.exists());
}

#[tokio::test]
async fn invalid_chunking_parameters_are_rejected() {
    let dir = tempdir().unwrap();
    let corpus = write_corpus(dir.path(), TWO_PARAGRAPHS);
    let pipeline = IngestionPipeline::new(corpus, dir.path().join("index"), 100, 100);

    let err = pipeline.ingest(&KeywordEmbedder::new()).await.unwrap_err();
    assert!(matches!(err, RagError::InvalidInput(_)));
    assert!(!dir.path().join("index").exists());
}

#[tokio::test]
async fn empty_corpus_is_an_error_not_an_empty_index() {
    let dir = tempdir().unwrap();
    let corpus = write_corpus(dir.path(), "\n\n   \n");
    let pipeline = IngestionPipeline::new(corpus, dir.path().join("index"), 500, 50);

    let err = pipeline.ingest(&KeywordEmbedder::new()).await.unwrap_err();
    assert!(matches!(err, RagError::EmptyCorpus));
    assert!(!dir.path().join("index").exists());
}

#[tokio::test]
async fn embedding_failure_aborts_without_publishing_an_index() {
    struct FailingEmbedder;

    #[async_trait]
    impl EmbeddingProvider for FailingEmbedder {
        async fn embed(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Err(RagError::EmbeddingUnavailable("network down".into()))
        }

        fn model(&self) -> &str {
            "failing-test"
        }
    }

    let dir = tempdir().unwrap();
    let corpus = write_corpus(dir.path(), TWO_PARAGRAPHS);
    let pipeline = IngestionPipeline::new(corpus, dir.path().join("index"), 500, 50);

    let err = pipeline.ingest(&FailingEmbedder).await.unwrap_err();
    assert!(matches!(err, RagError::IngestionFailed(_)));
    assert!(!dir.path().join("index").exists());
}

#[tokio::test]
async fn missing_corpus_bootstraps_a_sample_corpus() {
    let dir = tempdir().unwrap();
    let corpus = dir.path().join("data.txt");
    let pipeline = IngestionPipeline::new(corpus.clone(), dir.path().join("index"), 500, 50);

    let index = pipeline.ingest(&KeywordEmbedder::new()).await.unwrap();
    assert!(corpus.exists());
    assert!(index.len() >= 2);
}

#[tokio::test]
async fn corrupt_index_is_rebuilt() {
    let dir = tempdir().unwrap();
    let corpus = write_corpus(dir.path(), TWO_PARAGRAPHS);
    let index_dir = dir.path().join("index");
    let pipeline = IngestionPipeline::new(corpus, index_dir.clone(), 500, 50);

    pipeline.ingest(&KeywordEmbedder::new()).await.unwrap();
    std::fs::write(index_dir.join("vectors.bin"), b"garbage").unwrap();

    let embedder = KeywordEmbedder::new();
    let rebuilt = pipeline.ingest(&embedder).await.unwrap();
    assert_eq!(embedder.calls.load(Ordering::SeqCst), 1);
    assert_eq!(rebuilt.len(), 2);

    // The rebuilt index is loadable again.
    let (loaded, _) = VectorIndex::load(&index_dir).unwrap();
    assert_eq!(loaded.len(), 2);
}
