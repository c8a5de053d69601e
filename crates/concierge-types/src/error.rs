use thiserror::Error;

/// Errors from repository operations (used by trait definitions in concierge-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors constructing a chat turn.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TurnError {
    #[error("turn text must not be empty")]
    EmptyText,
}

/// Errors related to contact inquiry operations.
#[derive(Debug, Error)]
pub enum InquiryError {
    #[error("invalid inquiry: {0}")]
    Validation(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Errors from admin console operations.
#[derive(Debug, Error)]
pub enum AdminError {
    #[error("access denied")]
    AccessDenied,

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
