//! Query command implementation

use crate::error::Result;
use crate::pipeline::Pipeline;
use serde::Serialize;
use tracing::info;

/// Query result for CLI display
#[derive(Debug, Clone, Serialize)]
pub struct QueryResult {
    pub chatbot_id: i64,
    pub query: String,
    pub chunks: Vec<String>,
}

/// Retrieve the most relevant chunks for a query
pub async fn cmd_query(
    pipeline: &Pipeline,
    chatbot_id: i64,
    query: &str,
    top_k: usize,
) -> Result<QueryResult> {
    info!(chatbot_id, top_k, "Querying: {}", query);

    let chunks = pipeline.retrieve(chatbot_id, query, top_k).await?;

    Ok(QueryResult {
        chatbot_id,
        query: query.to_string(),
        chunks,
    })
}

/// Print query results to console
pub fn print_query_result(result: &QueryResult) {
    println!("\nQuery (chatbot {}): {}\n", result.chatbot_id, result.query);

    if result.chunks.is_empty() {
        println!("No matching chunks.");
        return;
    }

    for (i, chunk) in result.chunks.iter().enumerate() {
        println!("{}. {}", i + 1, chunk.replace('\n', " "));
    }
}
