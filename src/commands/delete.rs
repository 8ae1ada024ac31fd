//! Delete command implementation

use crate::error::Result;
use crate::meta::MetaDb;
use crate::pipeline::Pipeline;
use serde::Serialize;
use tracing::info;

/// Delete result for CLI display
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResult {
    pub chatbot_id: i64,
    pub documents_removed: u64,
}

/// Tear down a chatbot: its vector collection and all document records
pub async fn cmd_delete(
    db: &MetaDb,
    pipeline: &Pipeline,
    chatbot_id: i64,
) -> Result<DeleteResult> {
    info!(chatbot_id, "Deleting chatbot data");

    pipeline.delete_chatbot(chatbot_id).await?;
    let documents_removed = db.delete_chatbot(chatbot_id).await?;

    Ok(DeleteResult {
        chatbot_id,
        documents_removed,
    })
}

/// Print delete results to console
pub fn print_delete_result(result: &DeleteResult) {
    println!(
        "Deleted chatbot {}: {} document record(s) removed",
        result.chatbot_id, result.documents_removed
    );
}
