//! Shared domain types for Concierge.
//!
//! This crate contains the core domain types used across the chat widget:
//! Turn, Transcript, SessionSummary, Inquiry, LLM request/response shapes,
//! configuration, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod inquiry;
pub mod llm;
