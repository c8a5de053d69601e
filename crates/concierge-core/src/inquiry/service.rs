//! Inquiry submission service.
//!
//! Validates contact form input and stores it exactly once. A storage
//! failure is logged and handed back so the form can show an error.

use chrono::Utc;
use tracing::{error, info};
use uuid::Uuid;

use concierge_types::error::InquiryError;
use concierge_types::inquiry::{Inquiry, NewInquiry};

use super::repository::InquiryRepository;

/// Service accepting contact form submissions.
pub struct InquiryService<I: InquiryRepository> {
    repo: I,
}

impl<I: InquiryRepository> InquiryService<I> {
    pub fn new(repo: I) -> Self {
        Self { repo }
    }

    /// Validate and store an inquiry.
    ///
    /// Fields are trimmed; name, email, and message must be non-empty and
    /// the email must contain `@`. No retry on storage failure.
    pub async fn submit(&self, input: NewInquiry) -> Result<Inquiry, InquiryError> {
        let inquiry = validate(input)?;

        if let Err(e) = self.repo.save_inquiry(&inquiry).await {
            error!(inquiry_id = %inquiry.id, error = %e, "Failed to store inquiry");
            return Err(e.into());
        }

        info!(
            inquiry_id = %inquiry.id,
            project_type = %inquiry.project_type,
            "Inquiry submitted"
        );
        Ok(inquiry)
    }
}

fn validate(input: NewInquiry) -> Result<Inquiry, InquiryError> {
    let name = input.name.trim();
    let email = input.email.trim();
    let message = input.message.trim();

    if name.is_empty() {
        return Err(InquiryError::Validation("name cannot be empty".to_string()));
    }
    if email.is_empty() {
        return Err(InquiryError::Validation("email cannot be empty".to_string()));
    }
    if !email.contains('@') {
        return Err(InquiryError::Validation(format!(
            "'{email}' is not an email address"
        )));
    }
    if message.is_empty() {
        return Err(InquiryError::Validation("message cannot be empty".to_string()));
    }

    Ok(Inquiry {
        id: Uuid::now_v7(),
        name: name.to_string(),
        email: email.to_string(),
        message: message.to_string(),
        project_type: input.project_type,
        created_at: Utc::now(),
    })
}
