//! Infrastructure layer for Concierge.
//!
//! Contains implementations of the ports defined in `concierge-core`:
//! SQLite storage for chat logs and inquiries, and the Gemini model
//! provider. Also loads configuration and resolves the data directory.

pub mod config;
pub mod data_dir;
pub mod llm;
pub mod sqlite;
