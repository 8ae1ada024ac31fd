//! HTTP embedding backend (OpenAI-compatible /v1/embeddings)

use super::{validate_inputs, Embedder};
use crate::config::EmbeddingConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub struct HttpEmbedder {
    client: Client,
    base_url: String,
    model: String,
    dimension: usize,
}

#[derive(Debug, Serialize)]
struct EmbeddingsRequest {
    model: String,
    input: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}

impl HttpEmbedder {
    pub fn new(config: &EmbeddingConfig) -> Result<Self> {
        let base_url = config
            .url
            .as_ref()
            .ok_or_else(|| Error::Config("embedding.url is not set".to_string()))?
            .trim_end_matches('/')
            .to_string();

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url,
            model: config.model.clone(),
            dimension: config.dimension,
        })
    }

    fn validate_dimensions(&self, embeddings: &[Vec<f32>]) -> Result<()> {
        if let Some(mismatch) = embeddings.iter().find(|v| v.len() != self.dimension) {
            return Err(Error::Embedding(format!(
                "Embedding dimension mismatch for model '{}': expected {}, got {}",
                self.model,
                self.dimension,
                mismatch.len()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl Embedder for HttpEmbedder {
    async fn embed(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        validate_inputs(&texts)?;

        let expected = texts.len();
        let request = EmbeddingsRequest {
            model: self.model.clone(),
            input: texts,
        };

        let response = self
            .client
            .post(format!("{}/v1/embeddings", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Embedding(format!("Backend unreachable: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Embedding(format!(
                "Backend returned {}",
                response.status()
            )));
        }

        let body: EmbeddingsResponse = response
            .json()
            .await
            .map_err(|e| Error::Embedding(format!("Invalid backend response: {}", e)))?;

        if body.data.len() != expected {
            return Err(Error::Embedding(format!(
                "Backend returned {} embeddings for {} inputs",
                body.data.len(),
                expected
            )));
        }

        // Responses carry an index field; restore request order
        let mut data = body.data;
        data.sort_by_key(|d| d.index);
        let embeddings: Vec<Vec<f32>> = data.into_iter().map(|d| d.embedding).collect();

        self.validate_dimensions(&embeddings)?;
        Ok(embeddings)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(url: &str, dimension: usize) -> EmbeddingConfig {
        EmbeddingConfig {
            backend: "http".to_string(),
            model: "test-model".to_string(),
            dimension,
            batch_size: 32,
            url: Some(url.to_string()),
        }
    }

    #[tokio::test]
    async fn test_embed_parses_response_in_index_order() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/embeddings"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [
                    {"index": 1, "embedding": [0.0, 1.0, 0.0]},
                    {"index": 0, "embedding": [1.0, 0.0, 0.0]}
                ]
            })))
            .mount(&server)
            .await;

        let embedder = HttpEmbedder::new(&test_config(&server.uri(), 3)).unwrap();
        let embeddings = embedder
            .embed(vec!["first".to_string(), "second".to_string()])
            .await
            .unwrap();

        assert_eq!(embeddings[0], vec![1.0, 0.0, 0.0]);
        assert_eq!(embeddings[1], vec![0.0, 1.0, 0.0]);
    }

    #[tokio::test]
    async fn test_embed_dimension_mismatch_fails() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/embeddings"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"index": 0, "embedding": [1.0, 2.0]}]
            })))
            .mount(&server)
            .await;

        let embedder = HttpEmbedder::new(&test_config(&server.uri(), 3)).unwrap();
        let err = embedder.embed(vec!["text".to_string()]).await.unwrap_err();
        assert!(matches!(err, Error::Embedding(_)));
    }

    #[tokio::test]
    async fn test_embed_server_error_fails() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/embeddings"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let embedder = HttpEmbedder::new(&test_config(&server.uri(), 3)).unwrap();
        let err = embedder.embed(vec!["text".to_string()]).await.unwrap_err();
        assert!(matches!(err, Error::Embedding(_)));
    }
}
