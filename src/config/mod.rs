//! Configuration management for botforge
//!
//! Handles loading, saving, and validating configuration from TOML files.

mod defaults;

pub use defaults::*;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Embedding backend configuration
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Chunking configuration
    #[serde(default)]
    pub chunk: ChunkConfig,

    /// Vector index configuration
    #[serde(default)]
    pub index: IndexConfig,

    /// Response generation configuration
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Query configuration
    #[serde(default)]
    pub query: QueryConfig,

    /// Paths configuration (internal, not user-editable)
    #[serde(skip)]
    pub paths: PathsConfig,
}

/// Embedding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Backend kind: "hash", "http", or "fastembed" (feature `local-embed`)
    #[serde(default = "default_embedding_backend")]
    pub backend: String,

    /// Model name/identifier
    #[serde(default = "default_embedding_model")]
    pub model: String,

    /// Embedding dimension (must match model)
    #[serde(default = "default_embedding_dimension")]
    pub dimension: usize,

    /// Batch size for embedding
    #[serde(default = "default_embedding_batch_size")]
    pub batch_size: usize,

    /// Backend URL for the "http" backend (OpenAI-compatible /v1/embeddings)
    #[serde(default)]
    pub url: Option<String>,
}

/// Chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkConfig {
    /// Maximum characters per chunk
    #[serde(default = "default_chunk_max_chars")]
    pub max_chars: usize,
}

/// Vector index configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Backend kind: "memory" or "qdrant"
    #[serde(default = "default_index_backend")]
    pub backend: String,

    /// Qdrant connection URL
    #[serde(default = "default_qdrant_url")]
    pub qdrant_url: String,

    /// Prefix for per-chatbot collection names
    #[serde(default = "default_collection_prefix")]
    pub collection_prefix: String,
}

/// Response generation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Backend kind: "template" (offline) or "http" (OpenAI-compatible chat)
    #[serde(default = "default_generation_backend")]
    pub backend: String,

    /// Backend URL for the "http" backend
    #[serde(default)]
    pub url: Option<String>,

    /// Model name sent to the backend
    #[serde(default = "default_generation_model")]
    pub model: String,

    /// Number of completion candidates requested per call
    #[serde(default = "default_generation_candidates")]
    pub candidates: usize,

    /// Maximum tokens per completion
    #[serde(default = "default_generation_max_tokens")]
    pub max_tokens: u32,

    /// Request timeout in seconds
    #[serde(default = "default_backend_timeout_secs")]
    pub timeout_secs: u64,
}

/// Query configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Default number of chunks retrieved per query
    #[serde(default = "default_query_k")]
    pub default_k: usize,
}

/// Internal paths configuration
#[derive(Debug, Clone, Default)]
pub struct PathsConfig {
    /// Base directory for botforge data
    pub base_dir: PathBuf,

    /// Path to config file
    pub config_file: PathBuf,

    /// Path to SQLite database
    pub db_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            embedding: EmbeddingConfig::default(),
            chunk: ChunkConfig::default(),
            index: IndexConfig::default(),
            generation: GenerationConfig::default(),
            query: QueryConfig::default(),
            paths: PathsConfig::default(),
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            backend: default_embedding_backend(),
            model: default_embedding_model(),
            dimension: default_embedding_dimension(),
            batch_size: default_embedding_batch_size(),
            url: None,
        }
    }
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            max_chars: default_chunk_max_chars(),
        }
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            backend: default_index_backend(),
            qdrant_url: default_qdrant_url(),
            collection_prefix: default_collection_prefix(),
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            backend: default_generation_backend(),
            url: None,
            model: default_generation_model(),
            candidates: default_generation_candidates(),
            max_tokens: default_generation_max_tokens(),
            timeout_secs: default_backend_timeout_secs(),
        }
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_k: default_query_k(),
        }
    }
}

impl Config {
    /// Get the default base directory for botforge (~/.botforge)
    pub fn default_base_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".botforge")
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        Self::default_base_dir().join("config.toml")
    }

    /// Initialize paths configuration
    fn init_paths(&mut self, base_dir: Option<PathBuf>) {
        let base = base_dir.unwrap_or_else(Self::default_base_dir);
        self.paths = PathsConfig {
            config_file: base.join("config.toml"),
            db_file: base.join("metadata.db"),
            base_dir: base,
        };
    }

    /// Load configuration from a base directory, falling back to defaults
    /// when no config file exists there
    pub fn load_from(base_dir: Option<PathBuf>) -> Result<Self> {
        let mut config = Config::default();
        config.init_paths(base_dir);

        if config.paths.config_file.exists() {
            debug!("Loading config from {:?}", config.paths.config_file);
            let content = std::fs::read_to_string(&config.paths.config_file)?;
            let mut loaded: Config = toml::from_str(&content)?;
            loaded.paths = config.paths;
            config = loaded;
        } else {
            debug!("No config file found, using defaults");
        }

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.paths.config_file.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(&self.paths.config_file, content)?;
        info!("Saved config to {:?}", self.paths.config_file);
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.chunk.max_chars == 0 {
            return Err(Error::Config(
                "chunk.max_chars must be positive".to_string(),
            ));
        }

        if self.embedding.dimension == 0 {
            return Err(Error::Config(
                "embedding.dimension must be positive".to_string(),
            ));
        }

        if self.embedding.batch_size == 0 {
            return Err(Error::Config(
                "embedding.batch_size must be positive".to_string(),
            ));
        }

        match self.embedding.backend.as_str() {
            "hash" | "fastembed" => {}
            "http" => {
                if self.embedding.url.is_none() {
                    return Err(Error::Config(
                        "embedding.url is required for the http backend".to_string(),
                    ));
                }
            }
            other => {
                return Err(Error::Config(format!(
                    "Unknown embedding backend '{}'",
                    other
                )));
            }
        }

        match self.index.backend.as_str() {
            "memory" | "qdrant" => {}
            other => {
                return Err(Error::Config(format!("Unknown index backend '{}'", other)));
            }
        }

        match self.generation.backend.as_str() {
            "template" => {}
            "http" => {
                if self.generation.url.is_none() {
                    return Err(Error::Config(
                        "generation.url is required for the http backend".to_string(),
                    ));
                }
            }
            other => {
                return Err(Error::Config(format!(
                    "Unknown generation backend '{}'",
                    other
                )));
            }
        }

        if self.generation.candidates == 0 {
            return Err(Error::Config(
                "generation.candidates must be positive".to_string(),
            ));
        }

        Ok(())
    }
}
