use std::error::Error;
use std::sync::Arc;

use crate::core::backend::{Backend, HttpBackend};
use crate::core::config::Settings;
use crate::core::providers::{ProviderTracker, SelectOutcome};
use crate::ui::print_lines;
use crate::ui::status::render_provider_panel;

async fn loaded_tracker(
    settings: &Settings,
) -> Result<(Arc<dyn Backend>, ProviderTracker), Box<dyn Error>> {
    let backend: Arc<dyn Backend> = Arc::new(HttpBackend::new(&settings.base_url));
    let tracker = ProviderTracker::new(backend.clone());
    if !tracker.refresh().await {
        return Err(format!("Could not fetch provider status from {}", settings.base_url).into());
    }
    Ok((backend, tracker))
}

pub async fn list_providers(settings: &Settings) -> Result<(), Box<dyn Error>> {
    let (backend, tracker) = loaded_tracker(settings).await?;
    let connected = backend.probe().await;

    print_lines(
        &render_provider_panel(&tracker.snapshot().await, true, connected),
        settings.markup,
    )?;
    Ok(())
}

/// Switching is refused locally for unknown or unavailable providers.
pub async fn switch_provider(settings: &Settings, key: &str) -> Result<(), Box<dyn Error>> {
    let (_, tracker) = loaded_tracker(settings).await?;

    match tracker.select(key).await {
        SelectOutcome::Switched => {
            println!("✅ Default provider is now {key}");
            Ok(())
        }
        SelectOutcome::NotSwitchable => {
            let snapshot = tracker.snapshot().await;
            let available: Vec<&str> = snapshot
                .providers()
                .iter()
                .filter(|(_, status)| status.available)
                .map(|(key, _)| key.as_str())
                .collect();
            Err(format!(
                "{key} is not an available provider (available: {})",
                if available.is_empty() {
                    "none".to_string()
                } else {
                    available.join(", ")
                }
            )
            .into())
        }
        SelectOutcome::Failed(err) => Err(format!("Failed to switch to {key}: {err}").into()),
    }
}
