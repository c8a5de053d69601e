//! A single chat conversation.
//!
//! `ChatSession` owns the transcript of one visitor's conversation. `send`
//! and `close` are its only mutators; everything else is a read-only view
//! for the rendering layer (CLI or HTTP).
//!
//! State lives behind a `std::sync::Mutex` that is only held for the
//! bookkeeping on either side of a model call, never across an `.await`.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, info_span, warn};
use uuid::Uuid;

use concierge_types::chat::{
    FallbackReason, RejectReason, SendOutcome, SessionStatus, Transcript, Turn,
};
use concierge_types::config::ChatConfig;
use concierge_types::error::TurnError;
use concierge_types::llm::CompletionRequest;

use super::repository::ChatLogRepository;
use super::summarizer::SessionSummarizer;
use crate::llm::box_provider::BoxLlmProvider;

/// Validated, per-service chat settings shared by every session.
///
/// Greeting and fallback texts are pre-built as turns so a session never
/// has to handle a blank one at runtime.
#[derive(Debug, Clone)]
pub struct ChatSettings {
    pub model: String,
    pub system_instruction: String,
    pub max_tokens: u32,
    pub temperature: Option<f64>,
    greeting: Turn,
    empty_reply_fallback: Turn,
    connection_fallback: Turn,
}

impl ChatSettings {
    pub fn from_config(config: &ChatConfig) -> Result<Self, TurnError> {
        Ok(Self {
            model: config.model.clone(),
            system_instruction: config.system_instruction.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            greeting: Turn::assistant(config.greeting.clone())?,
            empty_reply_fallback: Turn::assistant(config.empty_reply_fallback.clone())?,
            connection_fallback: Turn::assistant(config.connection_fallback.clone())?,
        })
    }

    pub fn greeting(&self) -> &Turn {
        &self.greeting
    }

    fn fallback(&self, reason: FallbackReason) -> Turn {
        match reason {
            FallbackReason::EmptyReply => self.empty_reply_fallback.clone(),
            FallbackReason::RequestFailed => self.connection_fallback.clone(),
        }
    }
}

#[derive(Debug)]
struct SessionState {
    transcript: Transcript,
    status: SessionStatus,
    awaiting_reply: bool,
    started_at: DateTime<Utc>,
    last_activity_at: DateTime<Utc>,
    closed_at: Option<DateTime<Utc>>,
}

/// Point-in-time copy of a session for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub id: Uuid,
    pub status: SessionStatus,
    pub is_awaiting_reply: bool,
    pub transcript: Transcript,
    pub started_at: DateTime<Utc>,
    pub last_activity_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
}

/// One conversation between a visitor and the model.
///
/// Starts `open` with the greeting as its only turn and moves to `closed`
/// exactly once. At most one model request is in flight at a time.
pub struct ChatSession<R: ChatLogRepository + 'static> {
    id: Uuid,
    provider: Arc<BoxLlmProvider>,
    summarizer: Arc<SessionSummarizer<R>>,
    settings: Arc<ChatSettings>,
    state: Mutex<SessionState>,
}

impl<R: ChatLogRepository + 'static> ChatSession<R> {
    pub fn new(
        provider: Arc<BoxLlmProvider>,
        summarizer: Arc<SessionSummarizer<R>>,
        settings: Arc<ChatSettings>,
    ) -> Self {
        let now = Utc::now();
        let state = SessionState {
            transcript: Transcript::seeded(settings.greeting().clone()),
            status: SessionStatus::Open,
            awaiting_reply: false,
            started_at: now,
            last_activity_at: now,
            closed_at: None,
        };
        Self {
            id: Uuid::now_v7(),
            provider,
            summarizer,
            settings,
            state: Mutex::new(state),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Copy of the transcript as it stands now.
    pub fn transcript(&self) -> Transcript {
        self.lock_state().transcript.clone()
    }

    /// When a turn was last appended (or the session opened).
    pub fn last_activity_at(&self) -> DateTime<Utc> {
        self.lock_state().last_activity_at
    }

    pub fn is_awaiting_reply(&self) -> bool {
        self.lock_state().awaiting_reply
    }

    pub fn status(&self) -> SessionStatus {
        self.lock_state().status
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.lock_state();
        SessionSnapshot {
            id: self.id,
            status: state.status,
            is_awaiting_reply: state.awaiting_reply,
            transcript: state.transcript.clone(),
            started_at: state.started_at,
            last_activity_at: state.last_activity_at,
            closed_at: state.closed_at,
        }
    }

    /// Send one user message and append the model's reply.
    ///
    /// Rejected without side effects when the session is closed, a reply
    /// is still pending, or the trimmed text is empty. Otherwise the user
    /// turn is appended and exactly one assistant turn follows: the reply
    /// verbatim, or a fallback text if the model fails or answers with
    /// nothing. If the session is closed while the request is in flight,
    /// the reply is dropped.
    ///
    /// Never returns an error; the outcome says what happened.
    pub async fn send(&self, user_text: &str) -> SendOutcome {
        let request = {
            let mut state = self.lock_state();
            if state.status == SessionStatus::Closed {
                return SendOutcome::Rejected(RejectReason::Closed);
            }
            if state.awaiting_reply {
                return SendOutcome::Rejected(RejectReason::AwaitingReply);
            }
            let Ok(turn) = Turn::user(user_text.trim()) else {
                return SendOutcome::Rejected(RejectReason::EmptyInput);
            };
            state.transcript.push(turn);
            state.awaiting_reply = true;
            state.last_activity_at = Utc::now();
            self.build_request(&state.transcript)
        };
        let mut pending = PendingReply {
            session: self,
            armed: true,
        };

        let span = info_span!(
            "gen_ai.chat",
            gen_ai.system = self.provider.name(),
            gen_ai.request.model = %request.model,
            gen_ai.request.max_tokens = request.max_tokens,
            gen_ai.request.temperature = ?request.temperature,
            gen_ai.usage.input_tokens = tracing::field::Empty,
            gen_ai.usage.output_tokens = tracing::field::Empty,
            session_id = %self.id,
            message_count = request.messages.len(),
        );
        let result = self.provider.complete(&request).instrument(span.clone()).await;
        if let Ok(response) = &result {
            span.record("gen_ai.usage.input_tokens", response.usage.input_tokens);
            span.record("gen_ai.usage.output_tokens", response.usage.output_tokens);
        }

        let (reply, outcome) = match result {
            Ok(response) => match Turn::assistant(response.content) {
                Ok(turn) => (turn, SendOutcome::Replied),
                Err(_) => {
                    warn!(session_id = %self.id, "Model returned an empty reply");
                    let reason = FallbackReason::EmptyReply;
                    (self.settings.fallback(reason), SendOutcome::FellBack(reason))
                }
            },
            Err(e) => {
                warn!(session_id = %self.id, error = %e, "Chat request failed");
                let reason = FallbackReason::RequestFailed;
                (self.settings.fallback(reason), SendOutcome::FellBack(reason))
            }
        };

        pending.armed = false;
        let mut state = self.lock_state();
        state.awaiting_reply = false;
        if state.status == SessionStatus::Closed {
            debug!(session_id = %self.id, "Discarding reply that arrived after close");
            return SendOutcome::DiscardedAfterClose;
        }
        state.transcript.push(reply);
        state.last_activity_at = Utc::now();
        outcome
    }

    /// Close the session. Idempotent.
    ///
    /// The transcript is frozen immediately. If it holds a real exchange,
    /// a snapshot is summarized on a detached task whose handle is
    /// returned; callers may await it but never have to. Returns `None`
    /// when already closed or when there is nothing worth summarizing.
    pub fn close(&self) -> Option<JoinHandle<()>> {
        let snapshot = {
            let mut state = self.lock_state();
            if state.status == SessionStatus::Closed {
                return None;
            }
            state.status = SessionStatus::Closed;
            state.closed_at = Some(Utc::now());
            if !state.transcript.is_meaningful() {
                debug!(session_id = %self.id, "Closed chat session without an exchange; skipping summary");
                return None;
            }
            state.transcript.clone()
        };

        let session_id = self.id;
        let summarizer = Arc::clone(&self.summarizer);
        let span = info_span!("summarize_session", %session_id, turn_count = snapshot.len());
        Some(tokio::spawn(
            async move { summarizer.run(session_id, snapshot).await }.instrument(span),
        ))
    }

    fn build_request(&self, transcript: &Transcript) -> CompletionRequest {
        CompletionRequest {
            model: self.settings.model.clone(),
            messages: transcript.to_messages(),
            system: Some(self.settings.system_instruction.clone()),
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().expect("chat session lock poisoned")
    }
}

/// Clears the busy flag if a `send` never reaches its normal end, either
/// because the provider panicked or because the future was dropped mid-flight.
///
/// The dangling user turn gets the connection fallback as its reply so the
/// transcript keeps alternating roles.
struct PendingReply<'a, R: ChatLogRepository + 'static> {
    session: &'a ChatSession<R>,
    armed: bool,
}

impl<R: ChatLogRepository + 'static> Drop for PendingReply<'_, R> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let session = self.session;
        let mut state = session.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.awaiting_reply = false;
        if state.status == SessionStatus::Open {
            warn!(session_id = %session.id, "Chat turn abandoned before a reply arrived");
            state
                .transcript
                .push(session.settings.fallback(FallbackReason::RequestFailed));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::fakes::{MemoryChatLogs, ScriptedProvider, Step, test_config};
    use concierge_types::chat::MessageRole;
    use tokio::sync::Notify;

    fn session_with(
        provider: ScriptedProvider,
        repo: Arc<MemoryChatLogs>,
    ) -> ChatSession<MemoryChatLogs> {
        let config = test_config();
        let provider = Arc::new(BoxLlmProvider::new(provider));
        let summarizer = Arc::new(SessionSummarizer::new(Arc::clone(&provider), repo, &config));
        let settings = Arc::new(ChatSettings::from_config(&config).unwrap());
        ChatSession::new(provider, summarizer, settings)
    }

    async fn wait_until_awaiting<R: ChatLogRepository>(session: &ChatSession<R>) {
        while !session.is_awaiting_reply() {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_send_appends_user_and_reply() {
        let session = session_with(
            ScriptedProvider::replying(&["We build agents."]),
            Arc::new(MemoryChatLogs::default()),
        );

        let outcome = session.send("  What do you do?  ").await;

        assert_eq!(outcome, SendOutcome::Replied);
        let transcript = session.transcript();
        assert_eq!(transcript.len(), 3);
        assert_eq!(transcript.turns()[1].role(), MessageRole::User);
        assert_eq!(transcript.turns()[1].text(), "What do you do?");
        assert_eq!(transcript.turns()[2].text(), "We build agents.");
        assert!(!session.is_awaiting_reply());
    }

    #[tokio::test]
    async fn test_request_carries_history_and_system_instruction() {
        let provider = ScriptedProvider::replying(&["first", "second"]);
        let requests = Arc::clone(&provider.requests);
        let session = session_with(provider, Arc::new(MemoryChatLogs::default()));

        session.send("one").await;
        session.send("two").await;

        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
        let second = &requests[1];
        assert_eq!(second.system.as_deref(), Some("You are a consultant."));
        let contents: Vec<_> = second.messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, ["Hello, how can I help?", "one", "first", "two"]);
    }

    #[tokio::test]
    async fn test_blank_input_is_rejected_without_request() {
        let provider = ScriptedProvider::replying(&["unused"]);
        let requests = Arc::clone(&provider.requests);
        let session = session_with(provider, Arc::new(MemoryChatLogs::default()));

        assert_eq!(
            session.send("").await,
            SendOutcome::Rejected(RejectReason::EmptyInput)
        );
        assert_eq!(
            session.send(" \t\n").await,
            SendOutcome::Rejected(RejectReason::EmptyInput)
        );
        assert_eq!(session.transcript().len(), 1);
        assert!(requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_request_failure_appends_connection_fallback() {
        let session = session_with(
            ScriptedProvider::new(vec![Step::Fail]),
            Arc::new(MemoryChatLogs::default()),
        );

        let outcome = session.send("hello?").await;

        assert_eq!(outcome, SendOutcome::FellBack(FallbackReason::RequestFailed));
        let transcript = session.transcript();
        assert_eq!(transcript.len(), 3);
        assert_eq!(transcript.turns()[2].role(), MessageRole::Assistant);
        assert_eq!(transcript.turns()[2].text(), "Connection problem, please call us.");
        assert!(!session.is_awaiting_reply());
    }

    #[tokio::test]
    async fn test_empty_reply_appends_empty_reply_fallback() {
        let session = session_with(
            ScriptedProvider::replying(&["   "]),
            Arc::new(MemoryChatLogs::default()),
        );

        let outcome = session.send("hello?").await;

        assert_eq!(outcome, SendOutcome::FellBack(FallbackReason::EmptyReply));
        assert_eq!(
            session.transcript().turns()[2].text(),
            "Sorry, something went wrong."
        );
    }

    #[tokio::test]
    async fn test_send_while_awaiting_is_rejected() {
        let gate = Arc::new(Notify::new());
        let session = Arc::new(session_with(
            ScriptedProvider::new(vec![Step::Gated(Arc::clone(&gate), "done".to_string())]),
            Arc::new(MemoryChatLogs::default()),
        ));

        let pending = tokio::spawn({
            let session = Arc::clone(&session);
            async move { session.send("first").await }
        });
        wait_until_awaiting(&session).await;

        assert_eq!(
            session.send("second").await,
            SendOutcome::Rejected(RejectReason::AwaitingReply)
        );
        assert_eq!(session.transcript().len(), 2);

        gate.notify_one();
        assert_eq!(pending.await.unwrap(), SendOutcome::Replied);
        assert_eq!(session.transcript().len(), 3);
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let repo = Arc::new(MemoryChatLogs::default());
        let session = session_with(ScriptedProvider::replying(&["reply", "summary"]), Arc::clone(&repo));
        session.send("hi").await;

        let handle = session.close().expect("meaningful transcript is summarized");
        assert!(session.close().is_none());
        handle.await.unwrap();

        assert_eq!(session.status(), SessionStatus::Closed);
        assert_eq!(repo.saved().len(), 1);
    }

    #[tokio::test]
    async fn test_close_without_exchange_skips_summary() {
        let provider = ScriptedProvider::replying(&["summary"]);
        let requests = Arc::clone(&provider.requests);
        let repo = Arc::new(MemoryChatLogs::default());
        let session = session_with(provider, Arc::clone(&repo));

        assert!(session.close().is_none());
        assert!(session.snapshot().closed_at.is_some());
        assert!(requests.lock().unwrap().is_empty());
        assert!(repo.saved().is_empty());
    }

    #[tokio::test]
    async fn test_send_after_close_is_rejected() {
        let session = session_with(
            ScriptedProvider::replying(&["unused"]),
            Arc::new(MemoryChatLogs::default()),
        );
        session.close();

        assert_eq!(
            session.send("anyone there?").await,
            SendOutcome::Rejected(RejectReason::Closed)
        );
        assert_eq!(session.transcript().len(), 1);
    }

    #[tokio::test]
    async fn test_reply_after_close_is_discarded() {
        let gate = Arc::new(Notify::new());
        let repo = Arc::new(MemoryChatLogs::default());
        let session = Arc::new(session_with(
            ScriptedProvider::new(vec![Step::Gated(Arc::clone(&gate), "late".to_string())]),
            Arc::clone(&repo),
        ));

        let pending = tokio::spawn({
            let session = Arc::clone(&session);
            async move { session.send("question").await }
        });
        wait_until_awaiting(&session).await;

        // Seed + user turn only: not meaningful, so no summary is spawned.
        assert!(session.close().is_none());
        gate.notify_one();

        assert_eq!(pending.await.unwrap(), SendOutcome::DiscardedAfterClose);
        let transcript = session.transcript();
        assert_eq!(transcript.len(), 2);
        assert!(transcript.iter().all(|t| t.text() != "late"));
        assert!(!session.is_awaiting_reply());
    }

    #[tokio::test]
    async fn test_panicking_provider_does_not_leave_session_busy() {
        let session = Arc::new(session_with(
            ScriptedProvider::new(vec![Step::Panic, Step::Reply("Back online.".to_string())]),
            Arc::new(MemoryChatLogs::default()),
        ));

        let crashed = tokio::spawn({
            let session = Arc::clone(&session);
            async move { session.send("hi").await }
        })
        .await;

        assert!(crashed.is_err());
        assert!(!session.is_awaiting_reply());
        let transcript = session.transcript();
        assert_eq!(transcript.len(), 3);
        assert_eq!(transcript.turns()[2].role(), MessageRole::Assistant);
        assert_eq!(transcript.turns()[2].text(), "Connection problem, please call us.");

        assert_eq!(session.send("still there?").await, SendOutcome::Replied);
        assert_eq!(session.transcript().len(), 5);
    }

    #[tokio::test]
    async fn test_cancelled_send_clears_busy_flag() {
        let gate = Arc::new(Notify::new());
        let session = Arc::new(session_with(
            ScriptedProvider::new(vec![
                Step::Gated(Arc::clone(&gate), "never seen".to_string()),
                Step::Reply("fresh reply".to_string()),
            ]),
            Arc::new(MemoryChatLogs::default()),
        ));

        let pending = tokio::spawn({
            let session = Arc::clone(&session);
            async move { session.send("first").await }
        });
        wait_until_awaiting(&session).await;
        pending.abort();
        assert!(pending.await.unwrap_err().is_cancelled());

        assert!(!session.is_awaiting_reply());
        assert_eq!(session.send("second").await, SendOutcome::Replied);
        let transcript = session.transcript();
        assert_eq!(transcript.len(), 5);
        assert!(transcript.iter().all(|t| t.text() != "never seen"));
    }

    #[tokio::test]
    async fn test_sequential_sends_alternate_roles() {
        let session = session_with(
            ScriptedProvider::new(vec![
                Step::Reply("a1".to_string()),
                Step::Fail,
                Step::Reply("  ".to_string()),
                Step::Reply("a4".to_string()),
            ]),
            Arc::new(MemoryChatLogs::default()),
        );

        for i in 0..4 {
            session.send(&format!("question {i}")).await;
        }

        let transcript = session.transcript();
        assert_eq!(transcript.len(), 1 + 2 * 4);
        for (i, turn) in transcript.iter().enumerate() {
            let expected = if i % 2 == 0 {
                MessageRole::Assistant
            } else {
                MessageRole::User
            };
            assert_eq!(turn.role(), expected, "turn {i}");
        }
    }

    #[tokio::test]
    async fn test_closed_session_summary_matches_frozen_transcript() {
        let provider = ScriptedProvider::replying(&[
            "We offer automation and development.",
            "[Need] services [Type] general [Tone] curious",
        ]);
        let requests = Arc::clone(&provider.requests);
        let repo = Arc::new(MemoryChatLogs::default());
        let session = session_with(provider, Arc::clone(&repo));
        session.send("What services do you offer?").await;

        let handle = session.close().expect("summary task spawned");
        let frozen = session.transcript();
        assert_eq!(
            session.send("still there?").await,
            SendOutcome::Rejected(RejectReason::Closed)
        );
        handle.await.unwrap();

        let expected_raw = "ASSISTANT: Hello, how can I help?\n\
                            USER: What services do you offer?\n\
                            ASSISTANT: We offer automation and development.";
        assert_eq!(session.transcript(), frozen);
        assert_eq!(frozen.flatten(), expected_raw);

        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(
            requests[1].messages[0].content,
            format!("Summarize into need, type, tone:\n\n{expected_raw}")
        );
        let saved = repo.saved();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].raw_transcript_text, expected_raw);
        assert!(saved[0].structured_text.contains("[Need]"));
    }

    #[tokio::test]
    async fn test_close_mid_flight_summarizes_without_late_reply() {
        let gate = Arc::new(Notify::new());
        let repo = Arc::new(MemoryChatLogs::default());
        let session = Arc::new(session_with(
            ScriptedProvider::new(vec![
                Step::Reply("first answer".to_string()),
                Step::Gated(Arc::clone(&gate), "late answer".to_string()),
                Step::Reply("[Need] pricing".to_string()),
            ]),
            Arc::clone(&repo),
        ));
        session.send("first").await;

        let second = tokio::spawn({
            let session = Arc::clone(&session);
            async move { session.send("second").await }
        });
        wait_until_awaiting(&session).await;

        let handle = session.close().expect("summary task spawned");
        let frozen = session.transcript();
        assert_eq!(frozen.len(), 4);

        gate.notify_one();
        assert_eq!(second.await.unwrap(), SendOutcome::DiscardedAfterClose);
        handle.await.unwrap();

        assert_eq!(session.transcript(), frozen);
        let saved = repo.saved();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].raw_transcript_text, frozen.flatten());
        assert!(!saved[0].raw_transcript_text.contains("late answer"));
    }

    #[tokio::test]
    async fn test_last_activity_advances_on_accepted_turns_only() {
        let session = session_with(
            ScriptedProvider::replying(&["reply"]),
            Arc::new(MemoryChatLogs::default()),
        );
        let opened = session.last_activity_at();
        assert_eq!(session.snapshot().last_activity_at, opened);

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        session.send("   ").await;
        assert_eq!(session.last_activity_at(), opened);

        session.send("hello").await;
        assert!(session.last_activity_at() > opened);
    }

    #[tokio::test]
    async fn test_snapshot_serializes_for_rendering() {
        let session = session_with(
            ScriptedProvider::replying(&[]),
            Arc::new(MemoryChatLogs::default()),
        );
        let snapshot = session.snapshot();
        assert_eq!(snapshot.id, session.id());
        assert_eq!(snapshot.status, SessionStatus::Open);
        assert!(!snapshot.is_awaiting_reply);
        assert!(snapshot.closed_at.is_none());
    }
}
