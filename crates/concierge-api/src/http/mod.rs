//! HTTP/REST API layer.
//!
//! Axum-based REST API at `/api/v1/` with envelope responses and CORS.
//! The chat endpoints drive the same `ChatSession` the terminal chat uses.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod response;
pub mod router;
