//! LlmProvider trait definition.
//!
//! This is the core abstraction that all LLM providers implement.

use concierge_types::llm::{CompletionRequest, CompletionResponse, LlmError};

/// Trait for LLM provider backends (Gemini, test doubles, etc.).
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
/// A provider makes exactly one attempt per call; it never retries.
///
/// Implementations live in concierge-infra (e.g., `GeminiProvider`).
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "gemini").
    fn name(&self) -> &str;

    /// Send a completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
