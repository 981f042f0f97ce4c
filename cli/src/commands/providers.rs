use anyhow::Result;
use docqa_config::Config;
use docqa_core::embed::{EmbeddingProvider, OpenAiEmbedder};
use docqa_core::generate::{GenerationProvider, OpenAiGenerator};
use docqa_core::ingest::IngestionPipeline;
use std::sync::Arc;

pub fn build_embedder(config: &Config) -> Result<Arc<dyn EmbeddingProvider>> {
    let embedder = OpenAiEmbedder::from_env(&config.providers.embedding_model)?;
    Ok(Arc::new(embedder))
}

pub fn build_generator(config: &Config) -> Result<Arc<dyn GenerationProvider>> {
    let generator = OpenAiGenerator::from_env(
        &config.providers.generation_model,
        config.providers.temperature,
        config.providers.max_tokens,
    )?;
    Ok(Arc::new(generator))
}

pub fn build_pipeline(config: &Config) -> IngestionPipeline {
    IngestionPipeline::new(
        config.storage.corpus_file.clone(),
        config.index_dir(),
        config.chunking.chunk_size,
        config.chunking.overlap,
    )
}
