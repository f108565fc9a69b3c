//! One-shot "say" command

use std::error::Error;

use crate::core::agents::AgentRegistry;
use crate::core::backend::{Backend, HttpBackend};
use crate::core::config::Settings;
use crate::ui::print_lines;
use crate::ui::transcript::{render_message, MessageRenderConfig};

pub async fn run_say(settings: &Settings, prompt: Vec<String>) -> Result<(), Box<dyn Error>> {
    let prompt = prompt.join(" ");
    if prompt.trim().is_empty() {
        return Err("Usage: wayfarer say <prompt>".into());
    }

    let backend = HttpBackend::new(&settings.base_url);
    // Personas are cosmetic here; a missing agent list only loses names.
    let agents = AgentRegistry::new(backend.get_agents().await);

    let reply = backend
        .send_message(&prompt, &settings.user_id)
        .await
        .map_err(|err| format!("No reply from {}: {err}", settings.base_url))?;

    print_lines(
        &render_message(&reply, &agents, MessageRenderConfig::markup(settings.markup)),
        settings.markup,
    )?;
    Ok(())
}
