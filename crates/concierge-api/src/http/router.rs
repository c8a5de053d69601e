//! Axum router configuration with middleware.
//!
//! All API routes are under `/api/v1/`; `/health` sits at the root.
//! Middleware: CORS (the site widget calls from another origin) and tracing.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Chat widget
        .route("/chat/sessions", post(handlers::chat::open_session))
        .route(
            "/chat/sessions/{id}",
            get(handlers::chat::get_session).delete(handlers::chat::close_session),
        )
        .route(
            "/chat/sessions/{id}/messages",
            post(handlers::chat::send_message),
        )
        // Contact form
        .route("/inquiries", post(handlers::inquiry::submit_inquiry))
        // Admin console
        .route("/admin/inquiries", get(handlers::admin::list_inquiries))
        .route("/admin/chat-logs", get(handlers::admin::list_chat_logs))
        .route("/admin/overview", get(handlers::admin::overview));

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Simple health check endpoint (no auth required).
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
