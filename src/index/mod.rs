//! Per-chatbot vector index
//!
//! Each chatbot owns an isolated collection of (chunk id, text, embedding)
//! entries supporting nearest-neighbor search. Collections for different
//! chatbots never share entries; chunk ids are namespaced as
//! `{chatbot_id}:{document_id}:{sequence}` so numerically colliding ids can
//! never leak across chatbots.

mod memory;
mod qdrant;

pub use memory::*;
pub use qdrant::*;

use crate::config::IndexConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A single entry in a chatbot's collection
#[derive(Debug, Clone)]
pub struct IndexEntry {
    /// Namespaced chunk id
    pub chunk_id: String,

    /// Owning document id
    pub document_id: i64,

    /// Chunk sequence index within the document
    pub chunk_index: usize,

    /// Chunk text
    pub text: String,

    /// Embedding vector
    pub embedding: Vec<f32>,
}

impl IndexEntry {
    /// Build the namespaced chunk id
    pub fn make_chunk_id(chatbot_id: i64, document_id: i64, chunk_index: usize) -> String {
        format!("{}:{}:{}", chatbot_id, document_id, chunk_index)
    }
}

/// A search hit: chunk text plus similarity score
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub text: String,
    pub score: f32,
}

/// Trait for per-chatbot vector index backends
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Insert or replace entries by chunk id; creates the chatbot's
    /// collection lazily on first write
    async fn upsert(&self, chatbot_id: i64, entries: Vec<IndexEntry>) -> Result<()>;

    /// Return up to `top_k` nearest entries by cosine similarity, most
    /// similar first (ties stable in insertion order)
    ///
    /// Fails with `CollectionNotFound` when the chatbot has never ingested
    /// anything.
    async fn query(
        &self,
        chatbot_id: i64,
        query_embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<SearchHit>>;

    /// Remove all entries belonging to one document; idempotent
    async fn delete_document(&self, chatbot_id: i64, document_id: i64) -> Result<()>;

    /// Remove the chatbot's whole collection; idempotent
    async fn delete_collection(&self, chatbot_id: i64) -> Result<()>;

    /// Whether the chatbot has a collection
    async fn collection_exists(&self, chatbot_id: i64) -> Result<bool>;
}

/// Create a vector index based on configuration
pub async fn create_index(config: &IndexConfig) -> Result<Arc<dyn VectorIndex>> {
    match config.backend.as_str() {
        "memory" => Ok(Arc::new(MemoryIndex::new())),
        "qdrant" => {
            let index =
                QdrantIndex::connect(&config.qdrant_url, &config.collection_prefix).await?;
            Ok(Arc::new(index))
        }
        other => Err(Error::Config(format!("Unknown index backend '{}'", other))),
    }
}

/// Cosine similarity between two vectors
///
/// Returns 0.0 when either vector has zero magnitude.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
