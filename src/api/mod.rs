//! JSON payloads exchanged with the assistant backend.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::agents::Agent;
use crate::core::message::{next_message_id, Message, MessageMetadata, Sender};
use crate::core::providers::ProviderStatus;

#[derive(Serialize)]
pub struct ChatRequest<'a> {
    pub message: &'a str,
    pub user_id: &'a str,
}

/// Body of a successful `POST /api/chat`.
#[derive(Deserialize)]
pub struct ChatResponse {
    pub message: Option<WireMessage>,
}

#[derive(Debug, Deserialize)]
pub struct WireMessage {
    #[serde(default)]
    pub id: Option<String>,
    pub content: String,
    pub sender: String,
    pub timestamp: String,
    #[serde(default, rename = "agentId", alias = "agent_id")]
    pub agent_id: Option<String>,
    #[serde(default)]
    pub metadata: Option<MessageMetadata>,
}

impl WireMessage {
    /// Convert into a typed [`Message`], parsing the server timestamp.
    pub fn into_message(self) -> Result<Message, String> {
        let timestamp = parse_timestamp(&self.timestamp)?;
        let sender = match self.sender.as_str() {
            "user" => Sender::User,
            "agent" => Sender::Agent {
                agent_id: self.agent_id,
                metadata: self.metadata,
            },
            other => return Err(format!("unknown message sender: {other}")),
        };
        let id = self
            .id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| next_message_id("agent"));

        Ok(Message {
            id,
            content: self.content,
            sender,
            timestamp,
        })
    }
}

/// Parse an ISO-8601 timestamp. Offsets are honoured; naive values are
/// taken as UTC.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|err| format!("invalid timestamp '{raw}': {err}"))
}

/// The `{ success, data }` wrapper used by the listing endpoints.
#[derive(Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// The payload, only when the backend flagged success.
    pub fn into_data(self) -> Option<T> {
        if self.success {
            self.data
        } else {
            None
        }
    }
}

#[derive(Deserialize)]
pub struct AgentsData {
    pub agents: Vec<Agent>,
}

#[derive(Deserialize)]
pub struct ProvidersData {
    pub providers: BTreeMap<String, ProviderStatus>,
    #[serde(default)]
    pub default: Option<String>,
}

#[derive(Serialize)]
pub struct SwitchRequest<'a> {
    pub provider: &'a str,
}

#[derive(Deserialize)]
pub struct SwitchResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}
