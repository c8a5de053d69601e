//! Chat session lifecycle for Concierge.
//!
//! - `ChatSession`: owns one transcript and mediates turn-taking with the model
//! - `ChatService`: validated settings plus the collaborators every session shares
//! - `SessionSummarizer`: turns a closed transcript into a persisted summary
//! - `ChatLogRepository`: persistence port for session summaries

pub mod repository;
pub mod service;
pub mod session;
pub mod summarizer;

#[cfg(test)]
pub(crate) mod fakes;
