//! Admin access key extractor.
//!
//! Reads the shared key from the `X-Admin-Key` header and checks it against
//! the configured secret before the handler runs.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::http::error::AppError;
use crate::state::AppState;

pub const ADMIN_KEY_HEADER: &str = "x-admin-key";

/// Verified admin access. Holds the key so handlers can pass it on to
/// `AdminService`, which re-checks it.
pub struct AdminKey(pub String);

impl FromRequestParts<AppState> for AdminKey {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let key = extract_admin_key(parts)?;
        state.admin_service.authenticate(&key)?;
        Ok(AdminKey(key))
    }
}

fn extract_admin_key(parts: &Parts) -> Result<String, AppError> {
    let value = parts.headers.get(ADMIN_KEY_HEADER).ok_or_else(|| {
        AppError::Unauthorized("Missing admin key. Provide it via the 'X-Admin-Key' header.".to_string())
    })?;
    let key = value
        .to_str()
        .map_err(|_| AppError::Unauthorized("Invalid X-Admin-Key header encoding".to_string()))?;
    Ok(key.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with(header: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/api/v1/admin/inquiries");
        if let Some(value) = header {
            builder = builder.header("X-Admin-Key", value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_extracts_trimmed_key() {
        let parts = parts_with(Some("  1502admin "));
        assert_eq!(extract_admin_key(&parts).unwrap(), "1502admin");
    }

    #[test]
    fn test_missing_header_is_unauthorized() {
        let parts = parts_with(None);
        assert!(matches!(
            extract_admin_key(&parts),
            Err(AppError::Unauthorized(_))
        ));
    }
}
