//! SQLite chat log repository implementation.
//!
//! Implements `ChatLogRepository` from `concierge-core`: raw queries, a
//! private Row struct, writes on the writer pool and reads on the reader pool.

use concierge_core::chat::repository::ChatLogRepository;
use concierge_types::chat::SessionSummary;
use concierge_types::error::RepositoryError;
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, push_pagination};

/// SQLite-backed implementation of `ChatLogRepository`.
#[derive(Clone)]
pub struct SqliteChatLogRepository {
    pool: DatabasePool,
}

impl SqliteChatLogRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping `chat_logs` rows to SessionSummary.
struct ChatLogRow {
    id: String,
    summary: String,
    raw_log: String,
    created_at: String,
}

impl ChatLogRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            summary: row.try_get("summary")?,
            raw_log: row.try_get("raw_log")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_summary(self) -> Result<SessionSummary, RepositoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid chat log id: {e}")))?;
        Ok(SessionSummary {
            id,
            structured_text: self.summary,
            raw_transcript_text: self.raw_log,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

impl ChatLogRepository for SqliteChatLogRepository {
    async fn save_summary(&self, summary: &SessionSummary) -> Result<(), RepositoryError> {
        sqlx::query("INSERT INTO chat_logs (id, summary, raw_log, created_at) VALUES (?, ?, ?, ?)")
            .bind(summary.id.to_string())
            .bind(&summary.structured_text)
            .bind(&summary.raw_transcript_text)
            .bind(format_datetime(&summary.created_at))
            .execute(&self.pool.writer)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    RepositoryError::Conflict(format!("chat log {} already stored", summary.id))
                }
                other => RepositoryError::Query(other.to_string()),
            })?;
        Ok(())
    }

    async fn list_summaries(
        &self,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<SessionSummary>, RepositoryError> {
        let mut sql = String::from("SELECT * FROM chat_logs ORDER BY created_at DESC");
        push_pagination(&mut sql, limit, offset);

        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut summaries = Vec::with_capacity(rows.len());
        for row in &rows {
            let log_row =
                ChatLogRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            summaries.push(log_row.into_summary()?);
        }
        Ok(summaries)
    }

    async fn count_summaries(&self) -> Result<u64, RepositoryError> {
        let row = sqlx::query("SELECT COUNT(*) as cnt FROM chat_logs")
            .fetch_one(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        let count: i64 = row
            .try_get("cnt")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(count as u64)
    }
}
