use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Optional annotations an agent reply may carry. Display-only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageMetadata {
    /// Model confidence in `0.0..=1.0`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    /// Ordered provenance labels.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<String>,
}

impl MessageMetadata {
    /// Confidence as a whole percentage, clamped to `0..=100`.
    pub fn confidence_percent(&self) -> Option<u8> {
        self.confidence
            .filter(|value| value.is_finite())
            .map(|value| (value.clamp(0.0, 1.0) * 100.0).round() as u8)
    }
}

/// Who authored a message.
#[derive(Debug, Clone, PartialEq)]
pub enum Sender {
    User,
    Agent {
        /// Weak reference into the agent registry.
        agent_id: Option<String>,
        metadata: Option<MessageMetadata>,
    },
}

impl Sender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Agent { .. } => "agent",
        }
    }
}

/// One turn in the conversation.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: String,
    pub content: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// A user turn stamped with the current time and a fresh client id.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: next_message_id("user"),
            content: content.into(),
            sender: Sender::User,
            timestamp: Utc::now(),
        }
    }

    /// An agent turn created on the client (welcome, diagnostics, failures).
    pub fn local_agent(
        id: impl Into<String>,
        agent_id: Option<&str>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            sender: Sender::Agent {
                agent_id: agent_id.map(str::to_string),
                metadata: None,
            },
            timestamp: Utc::now(),
        }
    }

    pub fn is_user(&self) -> bool {
        matches!(self.sender, Sender::User)
    }

    pub fn agent_id(&self) -> Option<&str> {
        match &self.sender {
            Sender::Agent { agent_id, .. } => agent_id.as_deref(),
            Sender::User => None,
        }
    }

    pub fn metadata(&self) -> Option<&MessageMetadata> {
        match &self.sender {
            Sender::Agent { metadata, .. } => metadata.as_ref(),
            Sender::User => None,
        }
    }
}

static MESSAGE_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Generate a process-unique id such as `user_1718000000000_3`.
///
/// The sequence suffix keeps ids distinct when several messages are created
/// within the same millisecond.
pub fn next_message_id(prefix: &str) -> String {
    let seq = MESSAGE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}_{}_{seq}", Utc::now().timestamp_millis())
}

/// Append-only, insertion-ordered conversation log.
#[derive(Debug, Clone, Default)]
pub struct MessageLog {
    messages: Vec<Message>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    pub fn as_slice(&self) -> &[Message] {
        &self.messages
    }

    /// Messages appended after the first `offset` entries.
    pub fn since(&self, offset: usize) -> &[Message] {
        self.messages.get(offset..).unwrap_or(&[])
    }
}
