//! Documents command implementation

use crate::error::Result;
use crate::meta::{DocumentRecord, MetaDb};

/// List a chatbot's latest document versions
pub async fn cmd_documents(db: &MetaDb, chatbot_id: i64) -> Result<Vec<DocumentRecord>> {
    db.list_documents(chatbot_id).await
}

/// Print document list to console
pub fn print_documents(chatbot_id: i64, documents: &[DocumentRecord]) {
    if documents.is_empty() {
        println!("No documents for chatbot {}.", chatbot_id);
        return;
    }

    println!("Documents for chatbot {}:", chatbot_id);
    for doc in documents {
        println!(
            "  {} v{} ({}) uploaded {}",
            doc.document_id, doc.version, doc.format, doc.created_at
        );
    }
}
