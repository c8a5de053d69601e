//! Admin console read path.
//!
//! Lists stored inquiries and chat summaries behind a shared access key.
//! The key check is a plain string comparison: it keeps casual visitors
//! out of the dashboard and nothing more.

use tracing::warn;

use concierge_types::chat::SessionSummary;
use concierge_types::error::AdminError;
use concierge_types::inquiry::Inquiry;

use crate::chat::repository::ChatLogRepository;
use crate::inquiry::repository::InquiryRepository;

/// Record counts shown on the dashboard header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct AdminOverview {
    pub inquiry_count: u64,
    pub chat_log_count: u64,
}

/// Read-only access to everything visitors have left behind.
pub struct AdminService<C: ChatLogRepository, I: InquiryRepository> {
    chat_logs: C,
    inquiries: I,
    access_key: String,
}

impl<C: ChatLogRepository, I: InquiryRepository> AdminService<C, I> {
    pub fn new(chat_logs: C, inquiries: I, access_key: impl Into<String>) -> Self {
        Self {
            chat_logs,
            inquiries,
            access_key: access_key.into(),
        }
    }

    /// Check `access_key` against the configured secret.
    pub fn authenticate(&self, access_key: &str) -> Result<(), AdminError> {
        if access_key == self.access_key {
            Ok(())
        } else {
            warn!("Rejected admin access with wrong key");
            Err(AdminError::AccessDenied)
        }
    }

    /// All inquiries, newest first.
    pub async fn list_inquiries(&self, access_key: &str) -> Result<Vec<Inquiry>, AdminError> {
        self.authenticate(access_key)?;
        Ok(self.inquiries.list_inquiries(None, None).await?)
    }

    /// All chat session summaries, newest first.
    pub async fn list_chat_logs(
        &self,
        access_key: &str,
    ) -> Result<Vec<SessionSummary>, AdminError> {
        self.authenticate(access_key)?;
        Ok(self.chat_logs.list_summaries(None, None).await?)
    }

    pub async fn overview(&self, access_key: &str) -> Result<AdminOverview, AdminError> {
        self.authenticate(access_key)?;
        Ok(AdminOverview {
            inquiry_count: self.inquiries.count_inquiries().await?,
            chat_log_count: self.chat_logs.count_summaries().await?,
        })
    }
}
