//! Chat service: the shared half of every chat session.
//!
//! `ChatService` validates the chat configuration once and owns the
//! provider and summarizer that each `ChatSession` it opens borrows.

use std::sync::Arc;

use tracing::debug;

use concierge_types::config::ChatConfig;
use concierge_types::error::TurnError;

use super::repository::ChatLogRepository;
use super::session::{ChatSession, ChatSettings};
use super::summarizer::SessionSummarizer;
use crate::llm::box_provider::BoxLlmProvider;

/// Opens chat sessions wired to the configured model and chat log store.
///
/// Generic over `R: ChatLogRepository` so that tests can substitute an
/// in-memory store.
pub struct ChatService<R: ChatLogRepository + 'static> {
    provider: Arc<BoxLlmProvider>,
    summarizer: Arc<SessionSummarizer<R>>,
    settings: Arc<ChatSettings>,
}

impl<R: ChatLogRepository + 'static> ChatService<R> {
    /// Build the service, rejecting a config whose greeting or fallback
    /// texts are blank (they become transcript turns verbatim).
    pub fn new(
        provider: Arc<BoxLlmProvider>,
        repo: Arc<R>,
        config: &ChatConfig,
    ) -> Result<Self, TurnError> {
        let settings = Arc::new(ChatSettings::from_config(config)?);
        let summarizer = Arc::new(SessionSummarizer::new(Arc::clone(&provider), repo, config));
        Ok(Self {
            provider,
            summarizer,
            settings,
        })
    }

    /// Start a new conversation seeded with the greeting.
    pub fn open_session(&self) -> ChatSession<R> {
        let session = ChatSession::new(
            Arc::clone(&self.provider),
            Arc::clone(&self.summarizer),
            Arc::clone(&self.settings),
        );
        debug!(session_id = %session.id(), provider = self.provider.name(), "Opened chat session");
        session
    }

    pub fn settings(&self) -> &ChatSettings {
        &self.settings
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }
}

impl<R: ChatLogRepository + 'static> Clone for ChatService<R> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            summarizer: Arc::clone(&self.summarizer),
            settings: Arc::clone(&self.settings),
        }
    }
}
