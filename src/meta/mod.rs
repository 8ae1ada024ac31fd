//! Document metadata storage using SQLite
//!
//! Tracks which documents each chatbot has uploaded and their versions.
//! Re-uploading a document id inserts a new version and clears `is_latest`
//! on the superseded rows; the vector index itself only ever holds the
//! latest version's chunks.

mod schema;

pub use schema::*;

use crate::error::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::FromRow;
use std::path::Path;
use tracing::{debug, info};

/// A stored document version record
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub chatbot_id: i64,
    pub document_id: i64,
    pub version: i64,
    pub format: String,
    pub content_hash: String,
    pub is_latest: bool,
    pub created_at: String,
}

/// Metadata database handle
#[derive(Clone)]
pub struct MetaDb {
    pool: SqlitePool,
}

impl MetaDb {
    /// Connect to the metadata database, creating it if missing
    pub async fn connect(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);

        debug!("Connecting to SQLite database at {:?}", db_path);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Initialize the database schema
    pub async fn init_schema(&self) -> Result<()> {
        info!("Initializing database schema");
        sqlx::query(SCHEMA_SQL).execute(&self.pool).await?;
        Ok(())
    }

    /// Record a document upload, superseding earlier versions
    ///
    /// Returns the new version number (1 for a first upload).
    pub async fn record_document(
        &self,
        chatbot_id: i64,
        document_id: i64,
        format: &str,
        content_hash: &str,
    ) -> Result<i64> {
        let mut tx = self.pool.begin().await?;

        let (current,): (Option<i64>,) = sqlx::query_as(
            "SELECT MAX(version) FROM documents WHERE chatbot_id = ? AND document_id = ?",
        )
        .bind(chatbot_id)
        .bind(document_id)
        .fetch_one(&mut *tx)
        .await?;

        let version = current.unwrap_or(0) + 1;

        sqlx::query(
            "UPDATE documents SET is_latest = 0 WHERE chatbot_id = ? AND document_id = ?",
        )
        .bind(chatbot_id)
        .bind(document_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO documents (chatbot_id, document_id, version, format, content_hash, is_latest, created_at)
            VALUES (?, ?, ?, ?, ?, 1, ?)
            "#,
        )
        .bind(chatbot_id)
        .bind(document_id)
        .bind(version)
        .bind(format)
        .bind(content_hash)
        .bind(Utc::now().to_rfc3339())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(version)
    }

    /// Get the latest version record of a document
    pub async fn get_latest(
        &self,
        chatbot_id: i64,
        document_id: i64,
    ) -> Result<Option<DocumentRecord>> {
        let record = sqlx::query_as::<_, DocumentRecord>(
            "SELECT * FROM documents WHERE chatbot_id = ? AND document_id = ? AND is_latest = 1",
        )
        .bind(chatbot_id)
        .bind(document_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(record)
    }

    /// List latest document versions for a chatbot
    pub async fn list_documents(&self, chatbot_id: i64) -> Result<Vec<DocumentRecord>> {
        let records = sqlx::query_as::<_, DocumentRecord>(
            "SELECT * FROM documents WHERE chatbot_id = ? AND is_latest = 1 ORDER BY document_id",
        )
        .bind(chatbot_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }

    /// Count latest documents per chatbot across the whole database
    pub async fn count_documents(&self) -> Result<Vec<(i64, i64)>> {
        let rows: Vec<(i64, i64)> = sqlx::query_as(
            "SELECT chatbot_id, COUNT(*) FROM documents WHERE is_latest = 1 GROUP BY chatbot_id ORDER BY chatbot_id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Remove all document records for a chatbot
    pub async fn delete_chatbot(&self, chatbot_id: i64) -> Result<u64> {
        let result = sqlx::query("DELETE FROM documents WHERE chatbot_id = ?")
            .bind(chatbot_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn test_db() -> (TempDir, MetaDb) {
        let tmp = TempDir::new().unwrap();
        let db = MetaDb::connect(&tmp.path().join("metadata.db")).await.unwrap();
        db.init_schema().await.unwrap();
        (tmp, db)
    }

    #[tokio::test]
    async fn test_record_and_get_latest() {
        let (_tmp, db) = test_db().await;

        let version = db.record_document(1, 1, "plain", "hash-a").await.unwrap();
        assert_eq!(version, 1);

        let latest = db.get_latest(1, 1).await.unwrap().unwrap();
        assert_eq!(latest.content_hash, "hash-a");
        assert!(latest.is_latest);
    }

    #[tokio::test]
    async fn test_reupload_bumps_version_and_flips_latest() {
        let (_tmp, db) = test_db().await;

        db.record_document(1, 1, "plain", "hash-a").await.unwrap();
        let version = db.record_document(1, 1, "plain", "hash-b").await.unwrap();
        assert_eq!(version, 2);

        let latest = db.get_latest(1, 1).await.unwrap().unwrap();
        assert_eq!(latest.version, 2);
        assert_eq!(latest.content_hash, "hash-b");

        // Exactly one latest row per document
        let docs = db.list_documents(1).await.unwrap();
        assert_eq!(docs.len(), 1);
    }

    #[tokio::test]
    async fn test_list_documents_scoped_to_chatbot() {
        let (_tmp, db) = test_db().await;

        db.record_document(1, 1, "plain", "h1").await.unwrap();
        db.record_document(1, 2, "markdown", "h2").await.unwrap();
        db.record_document(2, 1, "pdf", "h3").await.unwrap();

        let docs = db.list_documents(1).await.unwrap();
        assert_eq!(docs.len(), 2);
        assert!(docs.iter().all(|d| d.chatbot_id == 1));
    }

    #[tokio::test]
    async fn test_delete_chatbot_removes_all_versions() {
        let (_tmp, db) = test_db().await;

        db.record_document(1, 1, "plain", "h1").await.unwrap();
        db.record_document(1, 1, "plain", "h2").await.unwrap();
        db.record_document(2, 1, "plain", "h3").await.unwrap();

        let removed = db.delete_chatbot(1).await.unwrap();
        assert_eq!(removed, 2);
        assert!(db.get_latest(1, 1).await.unwrap().is_none());
        assert!(db.get_latest(2, 1).await.unwrap().is_some());
    }
}
