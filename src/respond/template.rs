//! Offline template generation backend
//!
//! Deterministic fallback used when no chat backend is configured: answers
//! by echoing the retrieved context back to the user. Keeps the full
//! pipeline usable without any model running.

use super::Generator;
use crate::error::Result;
use async_trait::async_trait;

/// Deterministic context-echo generator
#[derive(Debug, Default)]
pub struct TemplateGenerator;

impl TemplateGenerator {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Generator for TemplateGenerator {
    async fn complete(
        &self,
        prompt: &str,
        _temperature: f32,
        _candidates: usize,
    ) -> Result<Vec<String>> {
        let context = extract_context(prompt);
        let response = if context.is_empty() {
            "I don't have any knowledge-base content for that yet.".to_string()
        } else {
            format!(
                "I'm not connected to a language model, but here is the most \
                 relevant information I have: {}",
                context
            )
        };
        Ok(vec![response])
    }
}

/// Pull the context section back out of the composed prompt
fn extract_context(prompt: &str) -> &str {
    prompt
        .strip_prefix("Context: ")
        .and_then(|rest| rest.split("\n\nQuestion:").next())
        .unwrap_or("")
        .trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::respond::build_prompt;

    #[tokio::test]
    async fn test_echoes_context() {
        let generator = TemplateGenerator::new();
        let prompt = build_prompt("Dogs are great too.", "Do dogs exist?");
        let candidates = generator.complete(&prompt, 0.5, 3).await.unwrap();

        assert_eq!(candidates.len(), 1);
        assert!(candidates[0].contains("Dogs are great too."));
    }

    #[tokio::test]
    async fn test_empty_context_has_fallback_text() {
        let generator = TemplateGenerator::new();
        let prompt = build_prompt("", "Anything?");
        let candidates = generator.complete(&prompt, 0.5, 1).await.unwrap();

        assert_eq!(
            candidates[0],
            "I don't have any knowledge-base content for that yet."
        );
    }

    #[tokio::test]
    async fn test_deterministic() {
        let generator = TemplateGenerator::new();
        let prompt = build_prompt("Facts here.", "Question?");
        let a = generator.complete(&prompt, 0.1, 3).await.unwrap();
        let b = generator.complete(&prompt, 0.9, 3).await.unwrap();
        assert_eq!(a, b);
    }
}
