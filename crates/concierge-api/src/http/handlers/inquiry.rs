//! Contact form endpoint.
//!
//! - POST /api/v1/inquiries - Submit an inquiry

use axum::extract::State;
use axum::Json;

use concierge_types::inquiry::{Inquiry, NewInquiry};

use crate::http::error::AppError;
use crate::http::response::{ApiResponse, RequestTimer};
use crate::state::AppState;

/// POST /api/v1/inquiries - Validate and store a contact inquiry.
pub async fn submit_inquiry(
    State(state): State<AppState>,
    Json(body): Json<NewInquiry>,
) -> Result<ApiResponse<Inquiry>, AppError> {
    let timer = RequestTimer::start();
    let inquiry = state.inquiry_service.submit(body).await?;
    Ok(timer.finish(inquiry))
}
