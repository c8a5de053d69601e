//! Business logic and repository trait definitions for Concierge.
//!
//! This crate defines the "ports" (repository and provider traits) that the
//! infrastructure layer implements, plus the chat session lifecycle built on
//! top of them. It depends only on `concierge-types`, never on
//! `concierge-infra` or any database/IO crate.

pub mod chat;
pub mod inquiry;
pub mod llm;
pub mod service;
