//! Custom error types for botforge

use thiserror::Error;

/// Main error type for botforge operations
///
/// Ingestion surfaces `UnsupportedFormat`/`Extraction`/`Embedding`;
/// retrieval surfaces `Embedding`/`CollectionNotFound`; respond adds
/// `Generation` on top of the retrieval set.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),

    #[error("Extraction failed: {0}")]
    Extraction(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Vector index error: {0}")]
    Index(String),

    #[error("No collection found for chatbot {0}: nothing has been ingested yet")]
    CollectionNotFound(i64),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Invalid personality value: {0}")]
    InvalidPersonality(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Other(err.to_string())
    }
}

/// Convert qdrant errors
impl From<qdrant_client::QdrantError> for Error {
    fn from(err: qdrant_client::QdrantError) -> Self {
        Error::Index(err.to_string())
    }
}

/// Result type alias for botforge
pub type Result<T> = std::result::Result<T, Error>;
