//! SQLite inquiry repository implementation.

use concierge_core::inquiry::repository::InquiryRepository;
use concierge_types::error::RepositoryError;
use concierge_types::inquiry::{Inquiry, ProjectType};
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, push_pagination};

/// SQLite-backed implementation of `InquiryRepository`.
#[derive(Clone)]
pub struct SqliteInquiryRepository {
    pool: DatabasePool,
}

impl SqliteInquiryRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping `inquiries` rows to Inquiry.
struct InquiryRow {
    id: String,
    name: String,
    email: String,
    message: String,
    project_type: String,
    created_at: String,
}

impl InquiryRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            message: row.try_get("message")?,
            project_type: row.try_get("project_type")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_inquiry(self) -> Result<Inquiry, RepositoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid inquiry id: {e}")))?;
        let project_type: ProjectType = self
            .project_type
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;

        Ok(Inquiry {
            id,
            name: self.name,
            email: self.email,
            message: self.message,
            project_type,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

impl InquiryRepository for SqliteInquiryRepository {
    async fn save_inquiry(&self, inquiry: &Inquiry) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"INSERT INTO inquiries (id, name, email, message, project_type, created_at)
               VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(inquiry.id.to_string())
        .bind(&inquiry.name)
        .bind(&inquiry.email)
        .bind(&inquiry.message)
        .bind(inquiry.project_type.as_str())
        .bind(format_datetime(&inquiry.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(())
    }

    async fn list_inquiries(
        &self,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Inquiry>, RepositoryError> {
        let mut sql = String::from("SELECT * FROM inquiries ORDER BY created_at DESC");
        push_pagination(&mut sql, limit, offset);

        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut inquiries = Vec::with_capacity(rows.len());
        for row in &rows {
            let inquiry_row =
                InquiryRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            inquiries.push(inquiry_row.into_inquiry()?);
        }
        Ok(inquiries)
    }

    async fn count_inquiries(&self) -> Result<u64, RepositoryError> {
        let row = sqlx::query("SELECT COUNT(*) as cnt FROM inquiries")
            .fetch_one(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        let count: i64 = row
            .try_get("cnt")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(count as u64)
    }
}
