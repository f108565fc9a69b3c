//! Language-model provider status tracking.
//!
//! The tracker keeps the last good provider mapping reported by the backend.
//! Failed refreshes leave it untouched, and the default only changes after
//! the backend confirms a switch.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::core::backend::{Backend, BackendError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub available: bool,
    #[serde(default)]
    pub models: Vec<String>,
    #[serde(default)]
    pub status: String,
}

/// Provider mapping plus the backend's preferred provider.
///
/// Keys are kept sorted so equal backend states compare (and serialize)
/// identically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProviderSnapshot {
    providers: BTreeMap<String, ProviderStatus>,
    default: Option<String>,
}

impl ProviderSnapshot {
    /// `default` is dropped when empty or when it names a key missing from
    /// `providers`.
    pub fn new(providers: BTreeMap<String, ProviderStatus>, default: Option<String>) -> Self {
        let default = default.filter(|key| !key.is_empty()).and_then(|key| {
            if providers.contains_key(&key) {
                Some(key)
            } else {
                warn!(default = %key, "Backend default provider is not in the provider list");
                None
            }
        });
        Self { providers, default }
    }

    pub fn providers(&self) -> &BTreeMap<String, ProviderStatus> {
        &self.providers
    }

    pub fn get(&self, key: &str) -> Option<&ProviderStatus> {
        self.providers.get(key)
    }

    pub fn default_key(&self) -> Option<&str> {
        self.default.as_deref()
    }

    pub fn total(&self) -> usize {
        self.providers.len()
    }

    pub fn available_count(&self) -> usize {
        self.providers
            .values()
            .filter(|status| status.available)
            .count()
    }

    /// Key that should carry the "default" badge: the default, but only
    /// while it is available.
    pub fn badge_key(&self) -> Option<&str> {
        self.default_key()
            .filter(|key| self.get(key).is_some_and(|status| status.available))
    }

    /// Only known, available providers can be switched to.
    pub fn is_switchable(&self, key: &str) -> bool {
        self.get(key).is_some_and(|status| status.available)
    }

    fn set_default(&mut self, key: &str) {
        if self.providers.contains_key(key) {
            self.default = Some(key.to_string());
        }
    }
}

/// Result of a user choosing a provider.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectOutcome {
    Switched,
    /// Unknown or unavailable; the backend was not contacted.
    NotSwitchable,
    Failed(BackendError),
}

#[derive(Default)]
struct TrackerState {
    snapshot: ProviderSnapshot,
    loaded: bool,
}

pub struct ProviderTracker {
    backend: Arc<dyn Backend>,
    state: RwLock<TrackerState>,
}

impl ProviderTracker {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            state: RwLock::new(TrackerState::default()),
        }
    }

    /// Fetch the provider mapping. Returns whether the cache was updated;
    /// on failure the previous snapshot stays in place.
    pub async fn refresh(&self) -> bool {
        match self.backend.fetch_providers().await {
            Ok(snapshot) => {
                debug!(
                    providers = snapshot.total(),
                    available = snapshot.available_count(),
                    default = snapshot.default_key().unwrap_or("<none>"),
                    "Provider status refreshed"
                );
                let mut state = self.state.write().await;
                state.snapshot = snapshot;
                state.loaded = true;
                true
            }
            Err(err) => {
                warn!(error = %err, "Provider refresh failed; keeping cached status");
                false
            }
        }
    }

    /// Request a default-provider change. The cached default moves only
    /// after the backend confirms.
    pub async fn switch_provider(&self, key: &str) -> Result<(), BackendError> {
        self.backend.switch_provider(key).await?;
        self.state.write().await.snapshot.set_default(key);
        Ok(())
    }

    /// Switch in response to a user pick, refusing providers that are not
    /// known to be available.
    pub async fn select(&self, key: &str) -> SelectOutcome {
        if !self.state.read().await.snapshot.is_switchable(key) {
            debug!(provider = %key, "Ignoring selection of unavailable provider");
            return SelectOutcome::NotSwitchable;
        }
        match self.switch_provider(key).await {
            Ok(()) => SelectOutcome::Switched,
            Err(err) => {
                warn!(provider = %key, error = %err, "Provider switch failed");
                SelectOutcome::Failed(err)
            }
        }
    }

    pub async fn snapshot(&self) -> ProviderSnapshot {
        self.state.read().await.snapshot.clone()
    }

    /// False until the first successful refresh.
    pub async fn has_loaded(&self) -> bool {
        self.state.read().await.loaded
    }

    /// Refresh immediately and then every `interval` until the returned
    /// handle is stopped or dropped.
    pub fn start_polling(self: &Arc<Self>, interval: Duration) -> PollHandle {
        let token = CancellationToken::new();
        let tracker = Arc::clone(self);
        let cancel = token.clone();
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = ticker.tick() => {
                        tokio::select! {
                            _ = cancel.cancelled() => break,
                            _ = tracker.refresh() => {}
                        }
                    }
                }
            }
            debug!("Provider polling stopped");
        });
        PollHandle {
            token,
            task: Some(task),
        }
    }
}

/// Owns a running poll loop. Dropping it cancels the loop.
pub struct PollHandle {
    token: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl PollHandle {
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Cancel the loop and wait for it to exit.
    pub async fn stop(mut self) {
        self.token.cancel();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
