//! Client side of the assistant backend's HTTP contract.
//!
//! [`Backend`] is the seam the chat session and the provider tracker talk
//! through; [`HttpBackend`] is the production implementation. Tests swap in
//! in-process doubles.

use std::error::Error;
use std::fmt;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::api::{
    AgentsData, ChatRequest, ChatResponse, Envelope, ProvidersData, SwitchRequest, SwitchResponse,
};
use crate::core::agents::Agent;
use crate::core::connectivity::ConnectivityMonitor;
use crate::core::message::Message;
use crate::core::providers::ProviderSnapshot;
use crate::utils::url::{
    construct_api_url, AGENTS_ENDPOINT, CHAT_ENDPOINT, PROVIDERS_ENDPOINT, SWITCH_ENDPOINT,
};

/// Failures at the network boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendError {
    /// The health probe failed; no request was attempted.
    Unavailable,

    /// A chat request reached the backend (or tried to) and did not produce
    /// a usable reply.
    RequestFailed {
        /// HTTP status, when a response was received.
        status: Option<u16>,
        reason: String,
    },

    /// Listing agents or providers failed.
    FetchFailed {
        resource: &'static str,
        reason: String,
    },

    /// The backend declined a provider switch.
    SwitchRejected { provider: String },

    /// Chat text was blank after trimming.
    EmptyMessage,
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::Unavailable => write!(f, "Backend is not available"),
            BackendError::RequestFailed {
                status: Some(status),
                reason,
            } => write!(f, "Request failed with status {status}: {reason}"),
            BackendError::RequestFailed {
                status: None,
                reason,
            } => write!(f, "Request failed: {reason}"),
            BackendError::FetchFailed { resource, reason } => {
                write!(f, "Failed to fetch {resource}: {reason}")
            }
            BackendError::SwitchRejected { provider } => {
                write!(f, "Backend rejected switch to provider '{provider}'")
            }
            BackendError::EmptyMessage => write!(f, "Message is empty"),
        }
    }
}

impl Error for BackendError {}

impl BackendError {
    fn request(status: Option<StatusCode>, reason: impl Into<String>) -> Self {
        BackendError::RequestFailed {
            status: status.map(|s| s.as_u16()),
            reason: reason.into(),
        }
    }

    fn fetch(resource: &'static str, reason: impl fmt::Display) -> Self {
        BackendError::FetchFailed {
            resource,
            reason: reason.to_string(),
        }
    }
}

#[async_trait]
pub trait Backend: Send + Sync {
    /// Submit `text` and return the agent's reply.
    ///
    /// Does not touch any conversation state; the caller owns the log.
    async fn send_message(&self, text: &str, user_id: &str) -> Result<Message, BackendError>;

    async fn fetch_agents(&self) -> Result<Vec<Agent>, BackendError>;

    async fn fetch_providers(&self) -> Result<ProviderSnapshot, BackendError>;

    /// Ask the backend to make `provider` the default. `Ok` only when the
    /// backend confirmed.
    async fn switch_provider(&self, provider: &str) -> Result<(), BackendError>;

    /// Run a fresh health probe.
    async fn probe(&self) -> bool;

    /// Last known reachability, without probing.
    fn is_available(&self) -> bool;

    /// Agent list with failures absorbed into an empty list.
    async fn get_agents(&self) -> Vec<Agent> {
        match self.fetch_agents().await {
            Ok(agents) => agents,
            Err(err) => {
                warn!(error = %err, "Agent list unavailable; continuing without personas");
                Vec::new()
            }
        }
    }
}

/// [`Backend`] over HTTP with `reqwest`.
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
    connectivity: ConnectivityMonitor,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        let connectivity = ConnectivityMonitor::new(client.clone(), base_url);
        Self {
            client,
            base_url: base_url.to_string(),
            connectivity,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn connectivity(&self) -> &ConnectivityMonitor {
        &self.connectivity
    }

    async fn get_envelope<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        resource: &'static str,
    ) -> Result<T, BackendError> {
        let url = construct_api_url(&self.base_url, endpoint);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| BackendError::fetch(resource, err))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::fetch(resource, format!("status {status}")));
        }

        let envelope: Envelope<T> = response
            .json()
            .await
            .map_err(|err| BackendError::fetch(resource, err))?;
        envelope
            .into_data()
            .ok_or_else(|| BackendError::fetch(resource, "response missing success envelope"))
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn send_message(&self, text: &str, user_id: &str) -> Result<Message, BackendError> {
        if text.trim().is_empty() {
            return Err(BackendError::EmptyMessage);
        }

        if !self.connectivity.is_available() && !self.connectivity.probe().await {
            return Err(BackendError::Unavailable);
        }

        let url = construct_api_url(&self.base_url, CHAT_ENDPOINT);
        debug!(url = %url, chars = text.chars().count(), "Sending chat message");
        let response = self
            .client
            .post(&url)
            .json(&ChatRequest {
                message: text,
                user_id,
            })
            .send()
            .await
            .map_err(|err| BackendError::request(None, err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), body = %body, "Chat request failed");
            return Err(BackendError::request(Some(status), "non-success status"));
        }

        let payload: ChatResponse = response.json().await.map_err(|err| {
            warn!(status = status.as_u16(), error = %err, "Chat response was not valid JSON");
            BackendError::request(Some(status), format!("malformed response: {err}"))
        })?;

        let wire = payload.message.ok_or_else(|| {
            warn!(status = status.as_u16(), "Chat response had no message");
            BackendError::request(Some(status), "response missing message")
        })?;

        wire.into_message().map_err(|reason| {
            warn!(status = status.as_u16(), reason = %reason, "Chat message was malformed");
            BackendError::request(Some(status), reason)
        })
    }

    async fn fetch_agents(&self) -> Result<Vec<Agent>, BackendError> {
        let data: AgentsData = self.get_envelope(AGENTS_ENDPOINT, "agents").await?;
        Ok(data.agents)
    }

    async fn fetch_providers(&self) -> Result<ProviderSnapshot, BackendError> {
        let data: ProvidersData = self.get_envelope(PROVIDERS_ENDPOINT, "providers").await?;
        Ok(ProviderSnapshot::new(data.providers, data.default))
    }

    async fn switch_provider(&self, provider: &str) -> Result<(), BackendError> {
        let url = construct_api_url(&self.base_url, SWITCH_ENDPOINT);
        let response = self
            .client
            .post(&url)
            .json(&SwitchRequest { provider })
            .send()
            .await
            .map_err(|err| BackendError::fetch("provider switch", err))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::fetch(
                "provider switch",
                format!("status {status}"),
            ));
        }

        let body: SwitchResponse = response
            .json()
            .await
            .map_err(|err| BackendError::fetch("provider switch", err))?;
        if !body.success {
            return Err(BackendError::SwitchRejected {
                provider: provider.to_string(),
            });
        }

        debug!(
            provider = %provider,
            message = body.message.as_deref().unwrap_or(""),
            "Provider switch confirmed"
        );
        Ok(())
    }

    async fn probe(&self) -> bool {
        self.connectivity.probe().await
    }

    fn is_available(&self) -> bool {
        self.connectivity.is_available()
    }
}

#[cfg(test)]
mod tests;
