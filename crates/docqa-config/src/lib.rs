//! Configuration for the docqa service.
//!
//! Defaults cover the zero-configuration path; a `.docqa.yml` file next to
//! the working directory overrides them, and a handful of environment
//! variables (`DOCQA_DATA_DIR`, `DOCQA_CORPUS_FILE`, `PORT`) override the
//! file, so container deployments need no config file at all.

pub mod error;

pub use error::{ConfigError, Result};

use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = ".docqa.yml";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub chunking: ChunkingConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub providers: ProviderConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load from `path` if given, else from `.docqa.yml` if present, else
    /// defaults; then apply environment overrides and validate.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let config_path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(config_path).map_err(|e| ConfigError::Io {
                path: config_path.to_path_buf(),
                source: e,
            })?;
            serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
                path: config_path.to_path_buf(),
                message: e.to_string(),
            })?
        } else {
            Self::default()
        };
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(dir) = env::var("DOCQA_DATA_DIR") {
            self.storage.data_dir = PathBuf::from(dir);
        }
        if let Ok(file) = env::var("DOCQA_CORPUS_FILE") {
            self.storage.corpus_file = PathBuf::from(file);
        }
        if let Ok(port) = env::var("PORT") {
            self.server.port = port.parse().map_err(|_| ConfigError::EnvVar {
                var: "PORT".into(),
                message: format!("expected a port number, got '{port}'"),
            })?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.chunking.chunk_size == 0 {
            return Err(ConfigError::invalid("chunking.chunk_size", "must be > 0"));
        }
        if self.chunking.overlap >= self.chunking.chunk_size {
            return Err(ConfigError::invalid(
                "chunking.overlap",
                format!(
                    "must be smaller than chunk_size ({})",
                    self.chunking.chunk_size
                ),
            ));
        }
        if self.retrieval.top_k == 0 {
            return Err(ConfigError::invalid("retrieval.top_k", "must be >= 1"));
        }
        Ok(())
    }

    /// Where the persisted index lives.
    pub fn index_dir(&self) -> PathBuf {
        self.storage.data_dir.join("index")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the persisted index.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Plain-text corpus file. Created with a sample corpus if absent.
    #[serde(default = "default_corpus_file")]
    pub corpus_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            corpus_file: default_corpus_file(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    #[serde(default = "default_overlap")]
    pub overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            overlap: default_overlap(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Passages retrieved per question.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,
    #[serde(default = "default_generation_model")]
    pub generation_model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            embedding_model: default_embedding_model(),
            generation_model: default_generation_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Run ingestion at startup (`eager`) or on the first request (`lazy`).
    #[serde(default)]
    pub init: InitMode,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            init: InitMode::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum InitMode {
    #[default]
    Eager,
    Lazy,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".docqa")
}

fn default_corpus_file() -> PathBuf {
    PathBuf::from("data.txt")
}

fn default_chunk_size() -> usize {
    500
}

fn default_overlap() -> usize {
    50
}

fn default_top_k() -> usize {
    3
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

fn default_generation_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    512
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}
