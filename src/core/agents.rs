//! Agent persona definitions and the per-session registry.
//!
//! Agents are fetched once when a chat session starts and are immutable for
//! the rest of the session. Messages reference agents by id only; lookups that
//! fail fall back to a default persona rather than erroring.

use serde::{Deserialize, Serialize};

use crate::core::backend::{Backend, BackendError};
use crate::core::constants::{DEFAULT_PERSONA_COLOR, DEFAULT_PERSONA_NAME};

/// A persona the backend may attribute replies to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub specialization: Vec<String>,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub active: bool,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// Display identity for an agent message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Persona<'a> {
    pub name: &'a str,
    pub color: &'a str,
    /// False when the default persona stands in for an unknown agent.
    pub resolved: bool,
}

impl Persona<'static> {
    pub const DEFAULT: Persona<'static> = Persona {
        name: DEFAULT_PERSONA_NAME,
        color: DEFAULT_PERSONA_COLOR,
        resolved: false,
    };
}

#[derive(Debug, Clone, Default)]
pub struct AgentRegistry {
    agents: Vec<Agent>,
}

impl AgentRegistry {
    pub fn new(agents: Vec<Agent>) -> Self {
        Self { agents }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Fetch the agent list from the backend.
    ///
    /// Unlike [`Backend::get_agents`], failures are returned so the caller
    /// can decide what to tell the user.
    pub async fn load(backend: &dyn Backend) -> Result<Self, BackendError> {
        let agents = backend.fetch_agents().await?;
        tracing::debug!(count = agents.len(), "Loaded agent registry");
        Ok(Self::new(agents))
    }

    pub fn resolve(&self, id: &str) -> Option<&Agent> {
        self.agents.iter().find(|agent| agent.id == id)
    }

    pub fn persona_for(&self, agent_id: Option<&str>) -> Persona<'_> {
        match agent_id.and_then(|id| self.resolve(id)) {
            Some(agent) => Persona {
                name: &agent.name,
                color: if agent.color.is_empty() {
                    DEFAULT_PERSONA_COLOR
                } else {
                    &agent.color
                },
                resolved: true,
            },
            None => Persona::DEFAULT,
        }
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn active(&self) -> impl Iterator<Item = &Agent> {
        self.agents.iter().filter(|agent| agent.active)
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

#[cfg(test)]
pub(crate) fn sample_agent(id: &str, name: &str, active: bool) -> Agent {
    Agent {
        id: id.to_string(),
        name: name.to_string(),
        description: format!("{name} agent"),
        specialization: vec!["Travel".to_string()],
        color: "#059669".to_string(),
        active,
        kind: None,
        icon: None,
    }
}
