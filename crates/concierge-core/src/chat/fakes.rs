//! In-memory collaborators shared by the chat module's unit tests.

use std::future::Future;
use std::sync::{Arc, Mutex};

use tokio::sync::Notify;

use concierge_types::chat::SessionSummary;
use concierge_types::config::ChatConfig;
use concierge_types::error::RepositoryError;
use concierge_types::llm::{CompletionRequest, CompletionResponse, LlmError, Usage};

use super::repository::ChatLogRepository;
use crate::llm::provider::LlmProvider;

/// What a scripted provider does on each call, in order.
#[derive(Clone)]
pub enum Step {
    Reply(String),
    Fail,
    /// Wait for the gate to open, then reply.
    Gated(Arc<Notify>, String),
    /// Panic inside the provider future.
    Panic,
}

/// Provider that plays back a script and records every request it sees.
pub struct ScriptedProvider {
    steps: Mutex<Vec<Step>>,
    pub requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl ScriptedProvider {
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            steps: Mutex::new(steps),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn replying(replies: &[&str]) -> Self {
        Self::new(replies.iter().map(|r| Step::Reply(r.to_string())).collect())
    }
}

impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl Future<Output = Result<CompletionResponse, LlmError>> + Send {
        self.requests.lock().unwrap().push(request.clone());
        let step = {
            let mut steps = self.steps.lock().unwrap();
            if steps.is_empty() {
                Step::Fail
            } else {
                steps.remove(0)
            }
        };
        let model = request.model.clone();
        async move {
            let content = match step {
                Step::Reply(text) => text,
                Step::Fail => {
                    return Err(LlmError::Provider {
                        message: "connection reset".to_string(),
                    });
                }
                Step::Gated(gate, text) => {
                    gate.notified().await;
                    text
                }
                Step::Panic => panic!("provider crashed mid-request"),
            };
            Ok(CompletionResponse {
                content,
                model,
                finish_reason: Some("STOP".to_string()),
                usage: Usage {
                    input_tokens: 12,
                    output_tokens: 8,
                },
            })
        }
    }
}

/// Chat log store backed by a vector.
#[derive(Default)]
pub struct MemoryChatLogs {
    pub saved: Mutex<Vec<SessionSummary>>,
    pub fail: bool,
}

impl MemoryChatLogs {
    pub fn failing() -> Self {
        Self {
            saved: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn saved(&self) -> Vec<SessionSummary> {
        self.saved.lock().unwrap().clone()
    }
}

impl ChatLogRepository for MemoryChatLogs {
    fn save_summary(
        &self,
        summary: &SessionSummary,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send {
        let result = if self.fail {
            Err(RepositoryError::Connection)
        } else {
            self.saved.lock().unwrap().push(summary.clone());
            Ok(())
        };
        async move { result }
    }

    fn list_summaries(
        &self,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> impl Future<Output = Result<Vec<SessionSummary>, RepositoryError>> + Send {
        let mut all = self.saved.lock().unwrap().clone();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let offset = offset.unwrap_or(0).max(0) as usize;
        let limit = limit.map(|l| l.max(0) as usize).unwrap_or(usize::MAX);
        let page: Vec<_> = all.into_iter().skip(offset).take(limit).collect();
        async move { Ok(page) }
    }

    fn count_summaries(&self) -> impl Future<Output = Result<u64, RepositoryError>> + Send {
        let count = self.saved.lock().unwrap().len() as u64;
        async move { Ok(count) }
    }
}

pub fn test_config() -> ChatConfig {
    ChatConfig {
        model: "test-model".to_string(),
        greeting: "Hello, how can I help?".to_string(),
        system_instruction: "You are a consultant.".to_string(),
        empty_reply_fallback: "Sorry, something went wrong.".to_string(),
        connection_fallback: "Connection problem, please call us.".to_string(),
        summary_prompt: "Summarize into need, type, tone:".to_string(),
        max_tokens: 256,
        temperature: None,
    }
}
