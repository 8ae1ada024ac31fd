//! Sentence-aligned text chunking
//!
//! Splits normalized document text into bounded-size chunks without ever
//! splitting a sentence. Boundaries are deterministic for identical input
//! and size limit, so re-ingesting an unchanged document produces the same
//! chunk sequence.

use blake3::Hasher;
use regex::Regex;
use std::sync::LazyLock;

/// Default maximum characters per chunk
pub const DEFAULT_MAX_CHUNK_SIZE: usize = 500;

// A sentence ends at a run of ./!/? followed by whitespace (or end of input).
static SENTENCE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]+(\s+|$)").unwrap());

/// Split text into sentences
///
/// Trailing text without terminal punctuation still forms a final sentence.
/// Whitespace-only input yields no sentences.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0;

    for m in SENTENCE_END.find_iter(text) {
        let sentence = text[start..m.end()].trim();
        if !sentence.is_empty() {
            sentences.push(sentence.to_string());
        }
        start = m.end();
    }

    let tail = text[start..].trim();
    if !tail.is_empty() {
        sentences.push(tail.to_string());
    }

    sentences
}

/// Split text into sentence-aligned chunks of at most `max_chunk_size`
/// characters
///
/// Sentences are accumulated greedily; a chunk is closed when appending the
/// next sentence would push the joined length (single-space joins) past the
/// limit. A single sentence longer than the limit still becomes its own
/// chunk. Empty input yields an empty sequence.
pub fn chunk_text(text: &str, max_chunk_size: usize) -> Vec<String> {
    let sentences = split_sentences(text);

    let mut chunks = Vec::new();
    let mut current: Vec<String> = Vec::new();
    let mut current_len = 0;

    for sentence in sentences {
        let sentence_len = sentence.chars().count();
        let joined_len = if current.is_empty() {
            sentence_len
        } else {
            current_len + 1 + sentence_len
        };

        if !current.is_empty() && joined_len > max_chunk_size {
            chunks.push(current.join(" "));
            current = vec![sentence];
            current_len = sentence_len;
        } else {
            current.push(sentence);
            current_len = joined_len;
        }
    }

    if !current.is_empty() {
        chunks.push(current.join(" "));
    }

    chunks
}

/// Compute a stable hash for document content
pub fn compute_content_hash(content: &[u8]) -> String {
    let mut hasher = Hasher::new();
    hasher.update(content);
    hasher.finalize().to_hex().to_string()
}
