//! Embedding generation
//!
//! This module provides an abstraction over embedding models with:
//! - A trait for different embedding backends
//! - A deterministic local token-hash backend (default)
//! - An HTTP backend (OpenAI-compatible /v1/embeddings)
//! - A fastembed backend behind the `local-embed` feature
//! - Batch processing for efficiency

#[cfg(feature = "local-embed")]
mod fastembed_impl;
mod hash_backend;
mod http_backend;

#[cfg(feature = "local-embed")]
pub use fastembed_impl::*;
pub use hash_backend::*;
pub use http_backend::*;

use crate::config::EmbeddingConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// Trait for embedding providers
///
/// Implementations must be deterministic: the same text under the same
/// model version always yields the same vector.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a batch of texts, one vector per input in the same order
    async fn embed(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>>;

    /// Embed a single text
    async fn embed_one(&self, text: &str) -> Result<Vec<f32>> {
        let mut embeddings = self.embed(vec![text.to_string()]).await?;
        embeddings
            .pop()
            .ok_or_else(|| Error::Embedding("Backend returned no embedding".to_string()))
    }

    /// Get the embedding dimension
    fn dimension(&self) -> usize;

    /// Get the model name
    fn model_name(&self) -> &str;
}

/// Create an embedder based on configuration
pub fn create_embedder(config: &EmbeddingConfig) -> Result<Arc<dyn Embedder>> {
    match config.backend.as_str() {
        "hash" => Ok(Arc::new(HashEmbedder::new(config.dimension))),
        "http" => Ok(Arc::new(HttpEmbedder::new(config)?)),
        #[cfg(feature = "local-embed")]
        "fastembed" => Ok(Arc::new(FastEmbedder::new(config)?)),
        #[cfg(not(feature = "local-embed"))]
        "fastembed" => Err(Error::Config(
            "Embedding backend 'fastembed' requires the 'local-embed' feature".to_string(),
        )),
        other => Err(Error::Config(format!(
            "Unknown embedding backend '{}'",
            other
        ))),
    }
}

/// Reject empty or whitespace-only inputs before they reach a backend
///
/// Indexing a zero vector for empty text would silently poison retrieval,
/// so this is an error at the embedding boundary.
pub fn validate_inputs(texts: &[String]) -> Result<()> {
    if let Some(pos) = texts.iter().position(|t| t.trim().is_empty()) {
        return Err(Error::Embedding(format!(
            "Empty text at batch position {}",
            pos
        )));
    }
    Ok(())
}

/// L2-normalize an embedding vector
pub fn normalize_embedding(vector: &[f32]) -> Vec<f32> {
    let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm == 0.0 {
        return vector.to_vec();
    }
    vector.iter().map(|v| v / norm).collect()
}

/// Helper to embed in batches
pub async fn embed_in_batches(
    embedder: &dyn Embedder,
    texts: Vec<String>,
    batch_size: usize,
) -> Result<Vec<Vec<f32>>> {
    let mut all_embeddings = Vec::with_capacity(texts.len());

    for batch in texts.chunks(batch_size) {
        let embeddings = embedder.embed(batch.to_vec()).await?;
        all_embeddings.extend(embeddings);
    }

    Ok(all_embeddings)
}
