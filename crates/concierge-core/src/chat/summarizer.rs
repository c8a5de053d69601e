//! Session summarizer.
//!
//! `SessionSummarizer` turns the transcript of a closed chat session into a
//! `SessionSummary` with one model call and hands it to the chat log store.
//! It runs detached from the session: failures are logged and dropped.

use std::sync::Arc;

use chrono::Utc;
use tracing::{Instrument, debug, error, info, info_span, warn};
use uuid::Uuid;

use concierge_types::chat::{SessionSummary, Transcript};
use concierge_types::config::ChatConfig;
use concierge_types::error::RepositoryError;
use concierge_types::llm::{CompletionRequest, LlmError, Message, MessageRole};

use super::repository::ChatLogRepository;
use crate::llm::box_provider::BoxLlmProvider;

/// Errors from a single summarization attempt.
#[derive(Debug, thiserror::Error)]
pub enum SummarizeError {
    #[error("summary request failed: {0}")]
    Llm(#[from] LlmError),

    #[error("model returned an empty summary")]
    EmptySummary,

    #[error("failed to store summary: {0}")]
    Repository(#[from] RepositoryError),
}

/// Produces and stores the summary of a closed conversation.
pub struct SessionSummarizer<R: ChatLogRepository> {
    provider: Arc<BoxLlmProvider>,
    repo: Arc<R>,
    model: String,
    prompt: String,
    max_tokens: u32,
}

impl<R: ChatLogRepository> SessionSummarizer<R> {
    pub fn new(provider: Arc<BoxLlmProvider>, repo: Arc<R>, config: &ChatConfig) -> Self {
        Self {
            provider,
            repo,
            model: config.model.clone(),
            prompt: config.summary_prompt.clone(),
            max_tokens: config.max_tokens,
        }
    }

    /// Build the single-prompt request asking for a three-part summary
    /// (customer need, inquiry type, emotional tone) of `raw_transcript`.
    pub fn build_request(&self, raw_transcript: &str) -> CompletionRequest {
        CompletionRequest {
            model: self.model.clone(),
            messages: vec![Message {
                role: MessageRole::User,
                content: format!("{}\n\n{raw_transcript}", self.prompt),
            }],
            system: None,
            max_tokens: self.max_tokens,
            temperature: None,
        }
    }

    /// Summarize `transcript` and persist the result exactly once.
    ///
    /// Makes one model request and, on success, one `save_summary` call.
    /// Nothing is retried. An all-whitespace summary is an error and is
    /// not stored.
    pub async fn summarize(&self, transcript: &Transcript) -> Result<SessionSummary, SummarizeError> {
        let raw_transcript_text = transcript.flatten();
        let request = self.build_request(&raw_transcript_text);

        let span = info_span!(
            "gen_ai.summarize_session",
            gen_ai.system = self.provider.name(),
            gen_ai.request.model = %request.model,
            gen_ai.request.max_tokens = request.max_tokens,
            gen_ai.usage.input_tokens = tracing::field::Empty,
            gen_ai.usage.output_tokens = tracing::field::Empty,
            turn_count = transcript.len(),
        );
        let response = self.provider.complete(&request).instrument(span.clone()).await?;
        span.record("gen_ai.usage.input_tokens", response.usage.input_tokens);
        span.record("gen_ai.usage.output_tokens", response.usage.output_tokens);

        if response.content.trim().is_empty() {
            return Err(SummarizeError::EmptySummary);
        }

        let summary = SessionSummary {
            id: Uuid::now_v7(),
            structured_text: response.content,
            raw_transcript_text,
            created_at: Utc::now(),
        };
        self.repo.save_summary(&summary).await?;

        debug!(
            summary_id = %summary.id,
            output_tokens = response.usage.output_tokens,
            "Session summary stored"
        );
        Ok(summary)
    }

    /// Summarize and store, logging the outcome instead of returning it.
    ///
    /// This is the body of the detached task spawned by `ChatSession::close`.
    pub async fn run(&self, session_id: Uuid, transcript: Transcript) {
        match self.summarize(&transcript).await {
            Ok(summary) => {
                info!(%session_id, summary_id = %summary.id, "Chat session summarized");
            }
            Err(SummarizeError::Repository(e)) => {
                error!(%session_id, error = %e, "Failed to store chat session summary");
            }
            Err(e) => {
                warn!(%session_id, error = %e, "Chat session summarization failed");
            }
        }
    }
}
