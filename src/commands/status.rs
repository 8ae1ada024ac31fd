//! Status command implementation

use crate::config::Config;
use crate::error::Result;
use crate::meta::MetaDb;
use serde::Serialize;

/// System status for CLI display
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub embedding_backend: String,
    pub embedding_model: String,
    pub embedding_dimension: usize,
    pub index_backend: String,
    pub generation_backend: String,
    pub chatbots: Vec<ChatbotStatus>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatbotStatus {
    pub chatbot_id: i64,
    pub documents: i64,
}

/// Gather configuration and per-chatbot document counts
pub async fn cmd_status(config: &Config, db: &MetaDb) -> Result<StatusReport> {
    let chatbots = db
        .count_documents()
        .await?
        .into_iter()
        .map(|(chatbot_id, documents)| ChatbotStatus {
            chatbot_id,
            documents,
        })
        .collect();

    Ok(StatusReport {
        embedding_backend: config.embedding.backend.clone(),
        embedding_model: config.embedding.model.clone(),
        embedding_dimension: config.embedding.dimension,
        index_backend: config.index.backend.clone(),
        generation_backend: config.generation.backend.clone(),
        chatbots,
    })
}

/// Print status to console
pub fn print_status(report: &StatusReport) {
    println!("botforge status");
    println!(
        "  Embedding:  {} ({}, {} dims)",
        report.embedding_backend, report.embedding_model, report.embedding_dimension
    );
    println!("  Index:      {}", report.index_backend);
    println!("  Generation: {}", report.generation_backend);

    if report.chatbots.is_empty() {
        println!("  No chatbots have documents yet.");
        return;
    }

    println!("  Chatbots:");
    for chatbot in &report.chatbots {
        println!(
            "    {} - {} document(s)",
            chatbot.chatbot_id, chatbot.documents
        );
    }
}
