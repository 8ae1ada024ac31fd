//! In-memory vector index
//!
//! Collections live in a `tokio::sync::RwLock` map keyed by chatbot id.
//! Records keep their insertion position when replaced so similarity ties
//! resolve in stable insertion order. Suitable for embedded use and tests;
//! the Qdrant backend is the persistent option.

use super::{cosine_similarity, IndexEntry, SearchHit, VectorIndex};
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Collection {
    dimension: usize,
    records: Vec<IndexEntry>,
    by_id: HashMap<String, usize>,
}

impl Collection {
    fn upsert(&mut self, entry: IndexEntry) {
        match self.by_id.get(&entry.chunk_id) {
            Some(&pos) => self.records[pos] = entry,
            None => {
                self.by_id.insert(entry.chunk_id.clone(), self.records.len());
                self.records.push(entry);
            }
        }
    }

    fn delete_document(&mut self, document_id: i64) {
        self.records.retain(|r| r.document_id != document_id);
        self.by_id = self
            .records
            .iter()
            .enumerate()
            .map(|(pos, r)| (r.chunk_id.clone(), pos))
            .collect();
    }
}

/// In-memory per-chatbot vector index
#[derive(Debug, Default)]
pub struct MemoryIndex {
    collections: RwLock<HashMap<i64, Collection>>,
}

impl MemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VectorIndex for MemoryIndex {
    async fn upsert(&self, chatbot_id: i64, entries: Vec<IndexEntry>) -> Result<()> {
        if entries.is_empty() {
            return Ok(());
        }

        let mut collections = self.collections.write().await;
        let collection = collections.entry(chatbot_id).or_default();

        if collection.dimension == 0 {
            collection.dimension = entries[0].embedding.len();
        }

        for entry in entries {
            if entry.embedding.len() != collection.dimension {
                return Err(Error::Index(format!(
                    "Dimension mismatch in collection for chatbot {}: expected {}, got {}",
                    chatbot_id,
                    collection.dimension,
                    entry.embedding.len()
                )));
            }
            collection.upsert(entry);
        }

        Ok(())
    }

    async fn query(
        &self,
        chatbot_id: i64,
        query_embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<SearchHit>> {
        let collections = self.collections.read().await;
        let collection = collections
            .get(&chatbot_id)
            .ok_or(Error::CollectionNotFound(chatbot_id))?;

        let mut hits: Vec<SearchHit> = collection
            .records
            .iter()
            .map(|record| SearchHit {
                text: record.text.clone(),
                score: cosine_similarity(&record.embedding, query_embedding),
            })
            .collect();

        // Stable sort keeps insertion order among equal scores
        hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        hits.truncate(top_k);
        Ok(hits)
    }

    async fn delete_document(&self, chatbot_id: i64, document_id: i64) -> Result<()> {
        let mut collections = self.collections.write().await;
        if let Some(collection) = collections.get_mut(&chatbot_id) {
            collection.delete_document(document_id);
        }
        Ok(())
    }

    async fn delete_collection(&self, chatbot_id: i64) -> Result<()> {
        let mut collections = self.collections.write().await;
        collections.remove(&chatbot_id);
        Ok(())
    }

    async fn collection_exists(&self, chatbot_id: i64) -> Result<bool> {
        let collections = self.collections.read().await;
        Ok(collections.contains_key(&chatbot_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(chatbot_id: i64, document_id: i64, idx: usize, text: &str, v: Vec<f32>) -> IndexEntry {
        IndexEntry {
            chunk_id: IndexEntry::make_chunk_id(chatbot_id, document_id, idx),
            document_id,
            chunk_index: idx,
            text: text.to_string(),
            embedding: v,
        }
    }

    #[tokio::test]
    async fn test_upsert_then_query_self_similarity() {
        let index = MemoryIndex::new();
        index
            .upsert(
                1,
                vec![
                    entry(1, 1, 0, "alpha", vec![1.0, 0.0, 0.0]),
                    entry(1, 1, 1, "beta", vec![0.0, 1.0, 0.0]),
                ],
            )
            .await
            .unwrap();

        let hits = index.query(1, &[0.0, 1.0, 0.0], 1).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].text, "beta");
        assert!((hits[0].score - 1.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_query_missing_collection_fails() {
        let index = MemoryIndex::new();
        let err = index.query(99, &[1.0, 0.0], 3).await.unwrap_err();
        assert!(matches!(err, Error::CollectionNotFound(99)));
    }

    #[tokio::test]
    async fn test_no_cross_chatbot_leakage() {
        let index = MemoryIndex::new();
        index
            .upsert(1, vec![entry(1, 5, 0, "chatbot one text", vec![1.0, 0.0])])
            .await
            .unwrap();
        index
            .upsert(2, vec![entry(2, 5, 0, "chatbot two text", vec![1.0, 0.0])])
            .await
            .unwrap();

        let hits = index.query(1, &[1.0, 0.0], 10).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].text, "chatbot one text");
    }

    #[tokio::test]
    async fn test_upsert_replaces_by_id() {
        let index = MemoryIndex::new();
        index
            .upsert(1, vec![entry(1, 1, 0, "old text", vec![1.0, 0.0])])
            .await
            .unwrap();
        index
            .upsert(1, vec![entry(1, 1, 0, "new text", vec![1.0, 0.0])])
            .await
            .unwrap();

        let hits = index.query(1, &[1.0, 0.0], 10).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].text, "new text");
    }

    #[tokio::test]
    async fn test_dimension_mismatch_rejected() {
        let index = MemoryIndex::new();
        index
            .upsert(1, vec![entry(1, 1, 0, "three dims", vec![1.0, 0.0, 0.0])])
            .await
            .unwrap();

        let err = index
            .upsert(1, vec![entry(1, 1, 1, "two dims", vec![1.0, 0.0])])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Index(_)));
    }

    #[tokio::test]
    async fn test_delete_document_keeps_others() {
        let index = MemoryIndex::new();
        index
            .upsert(
                1,
                vec![
                    entry(1, 1, 0, "doc one", vec![1.0, 0.0]),
                    entry(1, 2, 0, "doc two", vec![0.0, 1.0]),
                ],
            )
            .await
            .unwrap();

        index.delete_document(1, 1).await.unwrap();
        let hits = index.query(1, &[1.0, 1.0], 10).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].text, "doc two");

        // Idempotent for absent documents and collections
        index.delete_document(1, 1).await.unwrap();
        index.delete_document(42, 1).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_collection_idempotent() {
        let index = MemoryIndex::new();
        index
            .upsert(1, vec![entry(1, 1, 0, "text", vec![1.0])])
            .await
            .unwrap();

        index.delete_collection(1).await.unwrap();
        assert!(!index.collection_exists(1).await.unwrap());
        // Deleting again is a no-op
        index.delete_collection(1).await.unwrap();

        // Queries after teardown report a missing collection
        let err = index.query(1, &[1.0], 1).await.unwrap_err();
        assert!(matches!(err, Error::CollectionNotFound(1)));
    }

    #[tokio::test]
    async fn test_tie_break_insertion_order() {
        let index = MemoryIndex::new();
        index
            .upsert(
                1,
                vec![
                    entry(1, 1, 0, "first inserted", vec![1.0, 0.0]),
                    entry(1, 1, 1, "second inserted", vec![1.0, 0.0]),
                ],
            )
            .await
            .unwrap();

        let hits = index.query(1, &[1.0, 0.0], 2).await.unwrap();
        assert_eq!(hits[0].text, "first inserted");
        assert_eq!(hits[1].text, "second inserted");
    }
}
