//! ChatLogRepository trait definition.
//!
//! Persists the summaries written when a chat session closes.

use concierge_types::chat::SessionSummary;
use concierge_types::error::RepositoryError;

/// Repository trait for session summary persistence.
///
/// Implementations live in concierge-infra (e.g., `SqliteChatLogRepository`).
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait ChatLogRepository: Send + Sync {
    /// Store one summary. Called at most once per closed session.
    fn save_summary(
        &self,
        summary: &SessionSummary,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// List summaries, ordered by created_at DESC.
    fn list_summaries(
        &self,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> impl std::future::Future<Output = Result<Vec<SessionSummary>, RepositoryError>> + Send;

    /// Count all stored summaries.
    fn count_summaries(
        &self,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;
}
