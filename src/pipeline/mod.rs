//! Ingestion and retrieval pipeline
//!
//! Orchestrates extract -> chunk -> embed -> index for ingestion and
//! embed -> search for retrieval, plus the respond flow that feeds
//! retrieved context into the response composer. All dependencies are
//! injected at construction; there is no global backend state.

use crate::chunk::chunk_text;
use crate::embed::{embed_in_batches, Embedder};
use crate::error::Result;
use crate::extract::{extract_text, DocumentFormat};
use crate::index::{IndexEntry, VectorIndex};
use crate::respond::{Personality, ResponseComposer};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Default number of chunks retrieved per query
pub const DEFAULT_TOP_K: usize = 3;

/// Pipeline tuning knobs
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Maximum characters per chunk
    pub max_chunk_size: usize,

    /// Embedding batch size
    pub embed_batch_size: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            max_chunk_size: crate::chunk::DEFAULT_MAX_CHUNK_SIZE,
            embed_batch_size: 32,
        }
    }
}

/// The ingestion/retrieval pipeline
///
/// Constructed once at service start and shared across requests; per-chatbot
/// collections are independent, so concurrent work on different chatbots
/// never contends.
pub struct Pipeline {
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorIndex>,
    composer: ResponseComposer,
    options: PipelineOptions,
    // Serializes concurrent re-ingestion of the same (chatbot, document)
    // pair; without it two uploads could interleave delete/upsert and lose
    // chunks.
    ingest_locks: Mutex<HashMap<(i64, i64), Arc<Mutex<()>>>>,
}

impl Pipeline {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        index: Arc<dyn VectorIndex>,
        composer: ResponseComposer,
        options: PipelineOptions,
    ) -> Self {
        Self {
            embedder,
            index,
            composer,
            options,
            ingest_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Ingest one document for a chatbot
    ///
    /// All-or-nothing: the full entry batch is built (extraction, chunking,
    /// embedding) before the index is touched, so a failure at any stage
    /// leaves the index exactly as it was. Entries for a previously
    /// ingested version of the same document id are replaced.
    pub async fn ingest(
        &self,
        chatbot_id: i64,
        document_id: i64,
        raw: &[u8],
        format: DocumentFormat,
    ) -> Result<usize> {
        let key = (chatbot_id, document_id);
        let lock = {
            let mut locks = self.ingest_locks.lock().await;
            locks.entry(key).or_default().clone()
        };

        let guard = lock.lock().await;
        let result = self
            .ingest_locked(chatbot_id, document_id, raw, format)
            .await;
        drop(guard);

        // Drop the map entry once no other ingest of this document holds or
        // awaits the lock (map + our clone = 2 references).
        let mut locks = self.ingest_locks.lock().await;
        if locks.get(&key).is_some_and(|entry| Arc::strong_count(entry) == 2) {
            locks.remove(&key);
        }

        result
    }

    async fn ingest_locked(
        &self,
        chatbot_id: i64,
        document_id: i64,
        raw: &[u8],
        format: DocumentFormat,
    ) -> Result<usize> {
        info!(chatbot_id, document_id, %format, "Ingesting document");

        let text = extract_text(raw, format)?;
        let chunks = chunk_text(&text, self.options.max_chunk_size);
        debug!(chatbot_id, document_id, chunks = chunks.len(), "Chunked document");

        let embeddings =
            embed_in_batches(&*self.embedder, chunks.clone(), self.options.embed_batch_size)
                .await?;

        let entries: Vec<IndexEntry> = chunks
            .into_iter()
            .zip(embeddings)
            .enumerate()
            .map(|(chunk_index, (text, embedding))| IndexEntry {
                chunk_id: IndexEntry::make_chunk_id(chatbot_id, document_id, chunk_index),
                document_id,
                chunk_index,
                text,
                embedding,
            })
            .collect();

        let count = entries.len();

        // Supersede any earlier version of this document, then write the
        // complete batch in one call so concurrent queries never observe a
        // half-written document.
        self.index.delete_document(chatbot_id, document_id).await?;
        self.index.upsert(chatbot_id, entries).await?;

        info!(chatbot_id, document_id, chunks = count, "Ingest complete");
        Ok(count)
    }

    /// Retrieve the `top_k` most similar chunk texts for a query
    pub async fn retrieve(
        &self,
        chatbot_id: i64,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<String>> {
        debug!(chatbot_id, top_k, "Retrieving context");

        let query_embedding = self.embedder.embed_one(query).await?;
        let hits = self.index.query(chatbot_id, &query_embedding, top_k).await?;

        Ok(hits.into_iter().map(|hit| hit.text).collect())
    }

    /// Answer a query with a personality-shaped response
    ///
    /// Composes retrieve -> generate -> adjust_tone. An empty retrieval
    /// result is a valid (if context-free) generation input; a chatbot that
    /// never ingested anything fails with `CollectionNotFound`.
    pub async fn respond(
        &self,
        chatbot_id: i64,
        query: &str,
        personality: &Personality,
        top_k: usize,
    ) -> Result<String> {
        personality.validate()?;

        let context_chunks = self.retrieve(chatbot_id, query, top_k).await?;
        let context = context_chunks.join(" ");

        let response = self.composer.generate(query, &context, personality).await?;
        Ok(self.composer.adjust_tone(&response, personality))
    }

    /// Tear down a chatbot's collection entirely
    pub async fn delete_chatbot(&self, chatbot_id: i64) -> Result<()> {
        info!(chatbot_id, "Deleting chatbot collection");
        self.index.delete_collection(chatbot_id).await
    }
}
