//! Application error type mapping to HTTP status codes and envelope format.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use concierge_types::error::{AdminError, InquiryError};

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    Inquiry(InquiryError),
    Admin(AdminError),
    /// No live chat session with this id.
    SessionNotFound(String),
    /// Missing or malformed credentials.
    Unauthorized(String),
    Validation(String),
    /// A feature that needs configuration the server was started without.
    Unavailable(String),
    Internal(String),
}

impl From<InquiryError> for AppError {
    fn from(e: InquiryError) -> Self {
        AppError::Inquiry(e)
    }
}

impl From<AdminError> for AppError {
    fn from(e: AdminError) -> Self {
        AppError::Admin(e)
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Inquiry(InquiryError::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Inquiry(e) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INQUIRY_ERROR", e.to_string())
            }
            AppError::Admin(AdminError::AccessDenied) => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", "Invalid admin access key".to_string())
            }
            AppError::Admin(e) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "ADMIN_ERROR", e.to_string())
            }
            AppError::SessionNotFound(id) => {
                (StatusCode::NOT_FOUND, "SESSION_NOT_FOUND", format!("Chat session '{id}' not found"))
            }
            AppError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
            }
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Unavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "UNAVAILABLE", msg.clone())
            }
            AppError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg.clone())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        if status.is_server_error() {
            tracing::error!(code, error = %message, "Request failed");
        }

        let body = json!({
            "data": null,
            "meta": {
                "request_id": "",
                "timestamp": chrono::Utc::now().to_rfc3339(),
                "response_time_ms": 0
            },
            "errors": [{
                "code": code,
                "message": message,
            }]
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use concierge_types::error::RepositoryError;

    #[test]
    fn test_validation_maps_to_400() {
        let err = AppError::from(InquiryError::Validation("email must contain '@'".into()));
        let (status, code, message) = err.parts();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(code, "VALIDATION_ERROR");
        assert!(message.contains('@'));
    }

    #[test]
    fn test_access_denied_maps_to_401() {
        let response = AppError::from(AdminError::AccessDenied).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_repository_failure_maps_to_500() {
        let err = AppError::from(InquiryError::Repository(RepositoryError::Connection));
        assert_eq!(err.parts().0, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_missing_session_maps_to_404() {
        let response = AppError::SessionNotFound("abc".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_chat_without_key_maps_to_503() {
        let (status, code, _) = AppError::Unavailable("chat disabled".into()).parts();
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(code, "UNAVAILABLE");
    }
}
