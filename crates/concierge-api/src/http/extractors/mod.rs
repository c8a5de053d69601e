//! Custom axum extractors.

pub mod admin;
