//! Default values for configuration

/// Default Qdrant URL for local development
pub fn default_qdrant_url() -> String {
    std::env::var("QDRANT_URL").unwrap_or_else(|_| "http://127.0.0.1:6334".to_string())
}

/// Default prefix for per-chatbot Qdrant collections
pub fn default_collection_prefix() -> String {
    "chatbot_".to_string()
}

/// Default vector index backend
pub fn default_index_backend() -> String {
    "memory".to_string()
}

/// Default embedding backend
pub fn default_embedding_backend() -> String {
    "hash".to_string()
}

/// Default embedding model identifier
pub fn default_embedding_model() -> String {
    "botforge/token-hash-v1".to_string()
}

/// Default embedding dimension
pub fn default_embedding_dimension() -> usize {
    384
}

/// Default batch size for embedding
pub fn default_embedding_batch_size() -> usize {
    32
}

/// Default maximum characters per chunk
pub fn default_chunk_max_chars() -> usize {
    500
}

/// Default generation backend
pub fn default_generation_backend() -> String {
    "template".to_string()
}

/// Default generation model identifier
pub fn default_generation_model() -> String {
    "local-chat".to_string()
}

/// Default number of completion candidates per generation call
pub fn default_generation_candidates() -> usize {
    3
}

/// Default maximum tokens per completion
pub fn default_generation_max_tokens() -> u32 {
    256
}

/// Default request timeout for generation/embedding backends (seconds)
pub fn default_backend_timeout_secs() -> u64 {
    30
}

/// Default number of chunks retrieved per query
pub fn default_query_k() -> usize {
    crate::pipeline::DEFAULT_TOP_K
}
