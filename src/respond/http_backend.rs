//! HTTP generation backend (OpenAI-compatible /v1/chat/completions)

use super::Generator;
use crate::config::GenerationConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

pub struct HttpGenerator {
    client: Client,
    base_url: String,
    model: String,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionsResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

impl HttpGenerator {
    pub fn new(config: &GenerationConfig) -> Result<Self> {
        let base_url = config
            .url
            .as_ref()
            .ok_or_else(|| Error::Config("generation.url is not set".to_string()))?
            .trim_end_matches('/')
            .to_string();

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        })
    }
}

#[async_trait]
impl Generator for HttpGenerator {
    async fn complete(
        &self,
        prompt: &str,
        temperature: f32,
        candidates: usize,
    ) -> Result<Vec<String>> {
        let body = json!({
            "model": self.model,
            "messages": [{"role": "user", "content": prompt}],
            "temperature": temperature,
            "n": candidates,
            "max_tokens": self.max_tokens,
        });

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Generation(format!("Backend unreachable: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Generation(format!(
                "Backend returned {}",
                response.status()
            )));
        }

        let parsed: ChatCompletionsResponse = response
            .json()
            .await
            .map_err(|e| Error::Generation(format!("Invalid backend response: {}", e)))?;

        // Choices arrive in generation order; the composer relies on that
        // for its tie-break.
        Ok(parsed
            .choices
            .into_iter()
            .map(|c| c.message.content)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(url: &str) -> GenerationConfig {
        GenerationConfig {
            backend: "http".to_string(),
            url: Some(url.to_string()),
            model: "test-chat".to_string(),
            candidates: 3,
            max_tokens: 128,
            timeout_secs: 5,
        }
    }

    #[tokio::test]
    async fn test_complete_returns_choices_in_order() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(body_partial_json(json!({"model": "test-chat", "n": 2})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [
                    {"message": {"role": "assistant", "content": "first answer"}},
                    {"message": {"role": "assistant", "content": "second answer"}}
                ]
            })))
            .mount(&server)
            .await;

        let generator = HttpGenerator::new(&test_config(&server.uri())).unwrap();
        let candidates = generator.complete("prompt", 0.8, 2).await.unwrap();

        assert_eq!(candidates, vec!["first answer", "second answer"]);
    }

    #[tokio::test]
    async fn test_complete_server_error_fails() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let generator = HttpGenerator::new(&test_config(&server.uri())).unwrap();
        let err = generator.complete("prompt", 0.5, 1).await.unwrap_err();
        assert!(matches!(err, Error::Generation(_)));
    }
}
