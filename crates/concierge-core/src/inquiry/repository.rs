//! InquiryRepository trait definition.

use concierge_types::error::RepositoryError;
use concierge_types::inquiry::Inquiry;

/// Repository trait for contact inquiry persistence.
///
/// Implementations live in concierge-infra (e.g., `SqliteInquiryRepository`).
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait InquiryRepository: Send + Sync {
    /// Store a new inquiry.
    fn save_inquiry(
        &self,
        inquiry: &Inquiry,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// List inquiries, ordered by created_at DESC.
    fn list_inquiries(
        &self,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> impl std::future::Future<Output = Result<Vec<Inquiry>, RepositoryError>> + Send;

    /// Count all stored inquiries.
    fn count_inquiries(
        &self,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;
}
