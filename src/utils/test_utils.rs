//! In-process [`Backend`] double for session and tracker tests.

use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Semaphore;

use crate::api::parse_timestamp;
use crate::core::agents::Agent;
use crate::core::backend::{Backend, BackendError};
use crate::core::message::{Message, Sender};
use crate::core::providers::{ProviderSnapshot, ProviderStatus};

/// Replays scripted results. When a script runs dry the last entry repeats.
#[derive(Default)]
pub struct FakeBackend {
    agents: Mutex<Option<Result<Vec<Agent>, BackendError>>>,
    replies: Mutex<VecDeque<Result<Message, BackendError>>>,
    providers: Mutex<VecDeque<Result<ProviderSnapshot, BackendError>>>,
    switches: Mutex<VecDeque<Result<(), BackendError>>>,
    available: AtomicBool,
    gate: Option<Arc<Semaphore>>,
    pub sent: Mutex<Vec<String>>,
    pub switch_requests: Mutex<Vec<String>>,
    pub provider_fetches: AtomicUsize,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

fn next_scripted<T: Clone>(queue: &Mutex<VecDeque<T>>) -> Option<T> {
    let mut queue = queue.lock().unwrap();
    if queue.len() > 1 {
        queue.pop_front()
    } else {
        queue.front().cloned()
    }
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            agents: Mutex::new(Some(Ok(Vec::new()))),
            available: AtomicBool::new(true),
            ..Default::default()
        }
    }

    /// Sends block until the returned semaphore receives permits.
    pub fn gated() -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        let backend = Self {
            gate: Some(Arc::clone(&gate)),
            ..Self::new()
        };
        (backend, gate)
    }

    pub fn with_agents(self, agents: Vec<Agent>) -> Self {
        *self.agents.lock().unwrap() = Some(Ok(agents));
        self
    }

    pub fn with_agent_failure(self) -> Self {
        *self.agents.lock().unwrap() = Some(Err(BackendError::FetchFailed {
            resource: "agents",
            reason: "connection refused".to_string(),
        }));
        self
    }

    pub fn reply(self, reply: Result<Message, BackendError>) -> Self {
        self.replies.lock().unwrap().push_back(reply);
        self
    }

    pub fn providers(self, snapshot: Result<ProviderSnapshot, BackendError>) -> Self {
        self.providers.lock().unwrap().push_back(snapshot);
        self
    }

    pub fn push_providers(&self, snapshot: Result<ProviderSnapshot, BackendError>) {
        let mut queue = self.providers.lock().unwrap();
        // Replace a lone sticky entry so the new one takes effect next.
        if queue.len() == 1 {
            queue.clear();
        }
        queue.push_back(snapshot);
    }

    pub fn switch_result(self, result: Result<(), BackendError>) -> Self {
        self.switches.lock().unwrap().push_back(result);
        self
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }

    pub fn switch_requests(&self) -> Vec<String> {
        self.switch_requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn send_message(&self, text: &str, _user_id: &str) -> Result<Message, BackendError> {
        self.sent.lock().unwrap().push(text.to_string());
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        if let Some(gate) = &self.gate {
            gate.acquire().await.expect("gate closed").forget();
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        next_scripted(&self.replies).unwrap_or(Err(BackendError::Unavailable))
    }

    async fn fetch_agents(&self) -> Result<Vec<Agent>, BackendError> {
        self.agents
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn fetch_providers(&self) -> Result<ProviderSnapshot, BackendError> {
        self.provider_fetches.fetch_add(1, Ordering::SeqCst);
        next_scripted(&self.providers).unwrap_or(Err(BackendError::FetchFailed {
            resource: "providers",
            reason: "no script".to_string(),
        }))
    }

    async fn switch_provider(&self, provider: &str) -> Result<(), BackendError> {
        self.switch_requests
            .lock()
            .unwrap()
            .push(provider.to_string());
        next_scripted(&self.switches).unwrap_or(Ok(()))
    }

    async fn probe(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }
}

pub fn agent_reply(content: &str, agent_id: Option<&str>, timestamp: &str) -> Message {
    Message {
        id: format!("agent_{content}"),
        content: content.to_string(),
        sender: Sender::Agent {
            agent_id: agent_id.map(str::to_string),
            metadata: None,
        },
        timestamp: parse_timestamp(timestamp).expect("valid test timestamp"),
    }
}

pub fn provider(available: bool) -> ProviderStatus {
    ProviderStatus {
        name: None,
        available,
        models: Vec::new(),
        status: if available { "Available" } else { "No API Key" }.to_string(),
    }
}

pub fn snapshot(entries: &[(&str, bool)], default: &str) -> ProviderSnapshot {
    let providers: BTreeMap<String, ProviderStatus> = entries
        .iter()
        .map(|(key, available)| (key.to_string(), provider(*available)))
        .collect();
    ProviderSnapshot::new(providers, Some(default.to_string()))
}
