//! Respond command implementation

use crate::error::Result;
use crate::pipeline::Pipeline;
use crate::respond::Personality;
use serde::Serialize;
use tracing::info;

/// Respond result for CLI display
#[derive(Debug, Clone, Serialize)]
pub struct RespondResult {
    pub chatbot_id: i64,
    pub query: String,
    pub personality: Personality,
    pub response: String,
}

/// Answer a query with a personality-shaped response
pub async fn cmd_respond(
    pipeline: &Pipeline,
    chatbot_id: i64,
    query: &str,
    personality: Personality,
    top_k: usize,
) -> Result<RespondResult> {
    info!(chatbot_id, "Responding to: {}", query);

    let response = pipeline.respond(chatbot_id, query, &personality, top_k).await?;

    Ok(RespondResult {
        chatbot_id,
        query: query.to_string(),
        personality,
        response,
    })
}

/// Print respond results to console
pub fn print_respond_result(result: &RespondResult) {
    println!("\nChatbot {}: {}\n", result.chatbot_id, result.response);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::build_pipeline;
    use crate::config::Config;
    use crate::error::Error;
    use crate::extract::DocumentFormat;

    #[tokio::test]
    async fn test_respond_end_to_end() {
        let pipeline = build_pipeline(&Config::default()).await.unwrap();
        pipeline
            .ingest(1, 1, b"Dogs are great too.", DocumentFormat::Plain)
            .await
            .unwrap();

        let result = cmd_respond(
            &pipeline,
            1,
            "Do dogs exist?",
            Personality::default(),
            3,
        )
        .await
        .unwrap();

        assert!(result.response.contains("Dogs are great too."));
    }

    #[tokio::test]
    async fn test_respond_invalid_personality_fails() {
        let pipeline = build_pipeline(&Config::default()).await.unwrap();
        let bad = Personality {
            friendliness: 2.0,
            formality: 0.5,
            creativity: 0.5,
        };

        let err = cmd_respond(&pipeline, 1, "query", bad, 3).await.unwrap_err();
        assert!(matches!(err, Error::InvalidPersonality(_)));
    }
}
