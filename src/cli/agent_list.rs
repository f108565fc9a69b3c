use std::error::Error;

use crate::core::agents::AgentRegistry;
use crate::core::backend::HttpBackend;
use crate::core::config::Settings;
use crate::ui::agents::render_agent_list;
use crate::ui::print_lines;

pub async fn list_agents(settings: &Settings) -> Result<(), Box<dyn Error>> {
    let backend = HttpBackend::new(&settings.base_url);
    let agents = AgentRegistry::load(&backend)
        .await
        .map_err(|err| format!("Could not load agents from {}: {err}", settings.base_url))?;

    print_lines(&render_agent_list(&agents), settings.markup)?;
    Ok(())
}
