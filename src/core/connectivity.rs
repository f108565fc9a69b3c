//! Backend reachability tracking.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, info};

use crate::utils::url::{construct_api_url, HEALTH_ENDPOINT};

/// Caches the outcome of the most recent health probe.
///
/// Clones share the same flag, so the HTTP backend and the status display
/// always agree on the last known state.
#[derive(Clone)]
pub struct ConnectivityMonitor {
    client: reqwest::Client,
    health_url: String,
    available: Arc<AtomicBool>,
}

impl ConnectivityMonitor {
    /// Starts out unavailable until the first probe succeeds.
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            health_url: construct_api_url(base_url, HEALTH_ENDPOINT),
            available: Arc::new(AtomicBool::new(false)),
        }
    }

    /// `GET /health`; any 2xx counts as available. Network failures are
    /// absorbed and reported as `false`.
    pub async fn probe(&self) -> bool {
        let reachable = match self.client.get(&self.health_url).send().await {
            Ok(response) => {
                let ok = response.status().is_success();
                if !ok {
                    debug!(status = response.status().as_u16(), "Health probe returned error status");
                }
                ok
            }
            Err(err) => {
                debug!(error = %err, "Health probe failed");
                false
            }
        };

        let previous = self.available.swap(reachable, Ordering::SeqCst);
        if previous != reachable {
            info!(
                url = %self.health_url,
                available = reachable,
                "Backend availability changed"
            );
        }
        reachable
    }

    /// Last probe result, without probing.
    pub fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }
}
