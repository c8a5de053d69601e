//! Admin console endpoints. All require the `X-Admin-Key` header.
//!
//! - GET /api/v1/admin/inquiries  - All inquiries, newest first
//! - GET /api/v1/admin/chat-logs  - All chat summaries, newest first
//! - GET /api/v1/admin/overview   - Record counts

use axum::extract::State;

use concierge_core::service::admin::AdminOverview;
use concierge_types::chat::SessionSummary;
use concierge_types::inquiry::Inquiry;

use crate::http::error::AppError;
use crate::http::extractors::admin::AdminKey;
use crate::http::response::{ApiResponse, RequestTimer};
use crate::state::AppState;

pub async fn list_inquiries(
    State(state): State<AppState>,
    AdminKey(key): AdminKey,
) -> Result<ApiResponse<Vec<Inquiry>>, AppError> {
    let timer = RequestTimer::start();
    let inquiries = state.admin_service.list_inquiries(&key).await?;
    Ok(timer.finish(inquiries))
}

pub async fn list_chat_logs(
    State(state): State<AppState>,
    AdminKey(key): AdminKey,
) -> Result<ApiResponse<Vec<SessionSummary>>, AppError> {
    let timer = RequestTimer::start();
    let logs = state.admin_service.list_chat_logs(&key).await?;
    Ok(timer.finish(logs))
}

pub async fn overview(
    State(state): State<AppState>,
    AdminKey(key): AdminKey,
) -> Result<ApiResponse<AdminOverview>, AppError> {
    let timer = RequestTimer::start();
    let overview = state.admin_service.overview(&key).await?;
    Ok(timer.finish(overview))
}
