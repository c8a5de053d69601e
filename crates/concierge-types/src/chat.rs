//! Chat turn, transcript, and session summary types for Concierge.
//!
//! These types model one visitor's conversation with the chat widget:
//! immutable turns, the append-only transcript that owns them, and the
//! summary written once the conversation is closed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

use crate::error::TurnError;
use crate::llm::Message;

// Re-export MessageRole from llm module (a turn's role is its LLM message role).
pub use crate::llm::MessageRole;

/// A transcript becomes worth summarizing once it holds more turns than this:
/// the seeded greeting plus one full user/assistant exchange.
pub const MEANINGFUL_TURN_THRESHOLD: usize = 2;

/// One message in a conversation, tagged with its speaker.
///
/// Fields are private: a `Turn` can only be built through [`Turn::new`],
/// which rejects whitespace-only text, and is never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Turn {
    role: MessageRole,
    text: String,
}

impl Turn {
    /// Create a turn, rejecting text that is empty after trimming.
    ///
    /// The text itself is stored as given (assistant replies are kept
    /// verbatim); callers trim user input before calling.
    pub fn new(role: MessageRole, text: impl Into<String>) -> Result<Self, TurnError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(TurnError::EmptyText);
        }
        Ok(Self { role, text })
    }

    pub fn user(text: impl Into<String>) -> Result<Self, TurnError> {
        Self::new(MessageRole::User, text)
    }

    pub fn assistant(text: impl Into<String>) -> Result<Self, TurnError> {
        Self::new(MessageRole::Assistant, text)
    }

    pub fn role(&self) -> MessageRole {
        self.role
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl From<&Turn> for Message {
    fn from(turn: &Turn) -> Self {
        Message {
            role: turn.role,
            content: turn.text.clone(),
        }
    }
}

impl fmt::Display for Turn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.role.label(), self.text)
    }
}

/// The ordered, append-only history of turns for one chat session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    /// Start a transcript with the system-provided greeting turn.
    pub fn seeded(greeting: Turn) -> Self {
        Self {
            turns: vec![greeting],
        }
    }

    /// Append a turn. Turns are never removed or edited.
    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Turn> {
        self.turns.iter()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// Whether the conversation went past the greeting into a real exchange.
    pub fn is_meaningful(&self) -> bool {
        self.turns.len() > MEANINGFUL_TURN_THRESHOLD
    }

    /// Render the transcript as `"ROLE: text"` lines joined with `\n`.
    pub fn flatten(&self) -> String {
        self.turns
            .iter()
            .map(Turn::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Convert every turn, in order, into LLM messages.
    pub fn to_messages(&self) -> Vec<Message> {
        self.turns.iter().map(Message::from).collect()
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a Turn;
    type IntoIter = std::slice::Iter<'a, Turn>;

    fn into_iter(self) -> Self::IntoIter {
        self.turns.iter()
    }
}

/// Lifecycle status of a chat session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    #[default]
    Open,
    Closed,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStatus::Open => write!(f, "open"),
            SessionStatus::Closed => write!(f, "closed"),
        }
    }
}

impl FromStr for SessionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "open" => Ok(SessionStatus::Open),
            "closed" => Ok(SessionStatus::Closed),
            other => Err(format!("invalid session status: '{other}'")),
        }
    }
}

/// Why a `send` call was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// The message was empty or whitespace only.
    EmptyInput,
    /// A previous message is still waiting for its reply.
    AwaitingReply,
    /// The session has been closed.
    Closed,
}

/// Why the assistant turn holds canned text instead of a model reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    /// The model answered, but with no text.
    EmptyReply,
    /// The request failed (transport, status, or decoding error).
    RequestFailed,
}

/// What a single `send` call did to the transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum SendOutcome {
    /// User turn and the model's reply were appended.
    Replied,
    /// User turn and a fallback assistant turn were appended.
    FellBack(FallbackReason),
    /// User turn was appended, but the session closed before the reply arrived.
    DiscardedAfterClose,
    /// Nothing changed.
    Rejected(RejectReason),
}

impl SendOutcome {
    /// Whether this call appended anything to the transcript.
    pub fn appended(&self) -> bool {
        !matches!(self, SendOutcome::Rejected(_))
    }
}

/// The stored result of summarizing a closed conversation.
///
/// `structured_text` is opaque model output and is never parsed.
/// `created_at` is when the summary was produced, not when the chat began.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub id: Uuid,
    pub structured_text: String,
    pub raw_transcript_text: String,
    pub created_at: DateTime<Utc>,
}
