//! Deterministic token-hash embedding backend
//!
//! Feature-hashing embedder: each lowercased alphanumeric token is hashed
//! into a handful of dimension buckets and the resulting vector is
//! L2-normalized. The output is a pure function of the input text, which
//! makes it usable offline and gives tests exact reproducibility. Texts
//! sharing tokens land near each other under cosine similarity; it is a
//! bag-of-words signal, not a semantic model.

use super::{normalize_embedding, validate_inputs, Embedder};
use crate::error::Result;
use async_trait::async_trait;

/// Buckets per token; spreading one token over several dimensions keeps
/// accidental cross-token collisions from dominating a true shared token.
const BUCKETS_PER_TOKEN: usize = 4;

const MODEL_NAME: &str = "botforge/token-hash-v1";

/// Local deterministic embedder
pub struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];

        for token in tokenize(text) {
            let digest = blake3::hash(token.as_bytes());
            let bytes = digest.as_bytes();
            for i in 0..BUCKETS_PER_TOKEN {
                let raw = u32::from_le_bytes([
                    bytes[i * 4],
                    bytes[i * 4 + 1],
                    bytes[i * 4 + 2],
                    bytes[i * 4 + 3],
                ]);
                let bucket = (raw as usize) % self.dimension;
                vector[bucket] += 1.0;
            }
        }

        normalize_embedding(&vector)
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .collect()
}

#[async_trait]
impl Embedder for HashEmbedder {
    async fn embed(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
        validate_inputs(&texts)?;
        Ok(texts.iter().map(|t| self.embed_text(t)).collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        MODEL_NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[tokio::test]
    async fn test_deterministic_across_calls() {
        let embedder = HashEmbedder::new(384);
        let a = embedder.embed_one("The quick brown fox").await.unwrap();
        let b = embedder.embed_one("The quick brown fox").await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_fixed_dimension_and_unit_norm() {
        let embedder = HashEmbedder::new(128);
        let v = embedder.embed_one("hello world").await.unwrap();
        assert_eq!(v.len(), 128);

        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[tokio::test]
    async fn test_shared_tokens_score_higher() {
        let embedder = HashEmbedder::new(384);
        let query = embedder.embed_one("Do dogs exist?").await.unwrap();
        let dogs = embedder.embed_one("Dogs are great too.").await.unwrap();
        let cats = embedder.embed_one("Cats are great.").await.unwrap();

        let dot = |a: &[f32], b: &[f32]| -> f32 {
            a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
        };
        assert!(dot(&query, &dogs) > dot(&query, &cats));
    }

    #[tokio::test]
    async fn test_empty_text_fails() {
        let embedder = HashEmbedder::new(64);
        let err = embedder.embed_one("").await.unwrap_err();
        assert!(matches!(err, Error::Embedding(_)));
    }

    #[tokio::test]
    async fn test_batch_order_matches_inputs() {
        let embedder = HashEmbedder::new(64);
        let texts = vec!["first".to_string(), "second".to_string()];
        let batch = embedder.embed(texts).await.unwrap();
        assert_eq!(batch[0], embedder.embed_one("first").await.unwrap());
        assert_eq!(batch[1], embedder.embed_one("second").await.unwrap());
    }

    #[test]
    fn test_tokenize_strips_punctuation_and_case() {
        assert_eq!(tokenize("Dogs, dogs... DOGS!"), vec!["dogs", "dogs", "dogs"]);
    }
}
