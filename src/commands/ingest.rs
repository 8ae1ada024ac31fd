//! Ingest command implementation

use crate::chunk::compute_content_hash;
use crate::error::Result;
use crate::extract::DocumentFormat;
use crate::meta::MetaDb;
use crate::pipeline::Pipeline;
use serde::Serialize;
use std::path::Path;
use std::str::FromStr;
use tracing::info;

/// Ingest result for CLI display
#[derive(Debug, Clone, Serialize)]
pub struct IngestResult {
    pub chatbot_id: i64,
    pub document_id: i64,
    pub format: String,
    pub version: i64,
    pub chunks: usize,
}

/// Ingest a file into a chatbot's knowledge base
///
/// Format comes from `--format` when given, otherwise from the file
/// extension. The metadata record is written only after the index accepted
/// the full chunk batch.
pub async fn cmd_ingest(
    db: &MetaDb,
    pipeline: &Pipeline,
    chatbot_id: i64,
    document_id: i64,
    file: &Path,
    format_override: Option<&str>,
) -> Result<IngestResult> {
    let format = match format_override {
        Some(name) => DocumentFormat::from_str(name)?,
        None => DocumentFormat::from_extension(file)?,
    };

    info!(chatbot_id, document_id, file = %file.display(), %format, "Ingesting file");

    let raw = std::fs::read(file)?;
    let chunks = pipeline.ingest(chatbot_id, document_id, &raw, format).await?;

    let content_hash = compute_content_hash(&raw);
    let version = db
        .record_document(chatbot_id, document_id, &format.to_string(), &content_hash)
        .await?;

    Ok(IngestResult {
        chatbot_id,
        document_id,
        format: format.to_string(),
        version,
        chunks,
    })
}

/// Print ingest results to console
pub fn print_ingest_result(result: &IngestResult) {
    println!(
        "Ingested document {} for chatbot {} ({}, version {}): {} chunks",
        result.document_id, result.chatbot_id, result.format, result.version, result.chunks
    );
}
