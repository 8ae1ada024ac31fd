//! Qdrant vector index backend
//!
//! One Qdrant collection per chatbot, named `{prefix}{chatbot_id}`
//! (`chatbot_1`, `chatbot_2`, ...). Point ids are UUIDv5 digests of the
//! namespaced chunk id so re-ingesting a chunk overwrites its point.

use super::{IndexEntry, SearchHit, VectorIndex};
use crate::error::{Error, Result};
use async_trait::async_trait;
use qdrant_client::qdrant::{
    Condition, CreateCollectionBuilder, DeletePointsBuilder, Distance, Filter, PointStruct,
    SearchPointsBuilder, UpsertPointsBuilder, Value as QdrantValue, VectorParamsBuilder,
};
use qdrant_client::Qdrant;
use std::collections::HashMap;
use tracing::{debug, info};
use uuid::Uuid;

/// Qdrant-backed vector index
pub struct QdrantIndex {
    client: Qdrant,
    collection_prefix: String,
}

impl QdrantIndex {
    /// Connect to Qdrant
    pub async fn connect(url: &str, collection_prefix: &str) -> Result<Self> {
        debug!("Connecting to Qdrant at {}", url);

        let client = Qdrant::from_url(url)
            .skip_compatibility_check()
            .build()
            .map_err(|e| Error::Index(e.to_string()))?;

        Ok(Self {
            client,
            collection_prefix: collection_prefix.to_string(),
        })
    }

    fn collection_name(&self, chatbot_id: i64) -> String {
        format!("{}{}", self.collection_prefix, chatbot_id)
    }

    async fn ensure_collection(&self, chatbot_id: i64, dimension: usize) -> Result<()> {
        let collection = self.collection_name(chatbot_id);
        if self.client.collection_exists(&collection).await? {
            return Ok(());
        }

        info!(
            "Creating collection {} with dimension {}",
            collection, dimension
        );

        self.client
            .create_collection(
                CreateCollectionBuilder::new(&collection)
                    .vectors_config(VectorParamsBuilder::new(dimension as u64, Distance::Cosine)),
            )
            .await?;

        Ok(())
    }

    fn entry_to_point(entry: IndexEntry) -> PointStruct {
        let point_id = Uuid::new_v5(&Uuid::NAMESPACE_OID, entry.chunk_id.as_bytes());

        let mut payload: HashMap<String, QdrantValue> = HashMap::new();
        payload.insert("chunk_id".to_string(), string_to_qdrant(&entry.chunk_id));
        payload.insert("document_id".to_string(), int_to_qdrant(entry.document_id));
        payload.insert(
            "chunk_index".to_string(),
            int_to_qdrant(entry.chunk_index as i64),
        );
        payload.insert("text".to_string(), string_to_qdrant(&entry.text));

        PointStruct::new(point_id.to_string(), entry.embedding, payload)
    }
}

#[async_trait]
impl VectorIndex for QdrantIndex {
    async fn upsert(&self, chatbot_id: i64, entries: Vec<IndexEntry>) -> Result<()> {
        if entries.is_empty() {
            return Ok(());
        }

        self.ensure_collection(chatbot_id, entries[0].embedding.len())
            .await?;

        let collection = self.collection_name(chatbot_id);
        debug!("Upserting {} points to {}", entries.len(), collection);

        let points: Vec<PointStruct> = entries.into_iter().map(Self::entry_to_point).collect();

        self.client
            .upsert_points(UpsertPointsBuilder::new(&collection, points))
            .await?;

        Ok(())
    }

    async fn query(
        &self,
        chatbot_id: i64,
        query_embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<SearchHit>> {
        let collection = self.collection_name(chatbot_id);

        if !self.client.collection_exists(&collection).await? {
            return Err(Error::CollectionNotFound(chatbot_id));
        }

        debug!("Searching {} with limit {}", collection, top_k);

        let response = self
            .client
            .search_points(
                SearchPointsBuilder::new(&collection, query_embedding.to_vec(), top_k as u64)
                    .with_payload(true),
            )
            .await?;

        let hits = response
            .result
            .into_iter()
            .map(|point| {
                let text = point
                    .payload
                    .get("text")
                    .and_then(|v| match &v.kind {
                        Some(qdrant_client::qdrant::value::Kind::StringValue(s)) => {
                            Some(s.clone())
                        }
                        _ => None,
                    })
                    .unwrap_or_default();

                SearchHit {
                    text,
                    score: point.score,
                }
            })
            .collect();

        Ok(hits)
    }

    async fn delete_document(&self, chatbot_id: i64, document_id: i64) -> Result<()> {
        let collection = self.collection_name(chatbot_id);

        if !self.client.collection_exists(&collection).await? {
            return Ok(());
        }

        debug!(
            "Deleting points for document {} from {}",
            document_id, collection
        );

        let filter = Filter {
            must: vec![Condition::matches("document_id", document_id)],
            should: vec![],
            must_not: vec![],
            min_should: None,
        };

        self.client
            .delete_points(DeletePointsBuilder::new(&collection).points(filter))
            .await?;

        Ok(())
    }

    async fn delete_collection(&self, chatbot_id: i64) -> Result<()> {
        let collection = self.collection_name(chatbot_id);

        if !self.client.collection_exists(&collection).await? {
            return Ok(());
        }

        info!("Deleting collection {}", collection);
        self.client.delete_collection(&collection).await?;
        Ok(())
    }

    async fn collection_exists(&self, chatbot_id: i64) -> Result<bool> {
        let collection = self.collection_name(chatbot_id);
        Ok(self.client.collection_exists(&collection).await?)
    }
}

fn string_to_qdrant(s: &str) -> QdrantValue {
    QdrantValue {
        kind: Some(qdrant_client::qdrant::value::Kind::StringValue(s.to_string())),
    }
}

fn int_to_qdrant(i: i64) -> QdrantValue {
    QdrantValue {
        kind: Some(qdrant_client::qdrant::value::Kind::IntegerValue(i)),
    }
}
