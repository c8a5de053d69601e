//! Cross-cutting services for Concierge.

pub mod admin;
