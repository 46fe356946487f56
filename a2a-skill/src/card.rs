use crate::registry::SkillRegistry;
use a2a_core::{AgentCapabilities, AgentCard, TransportKind};
use serde::{Deserialize, Serialize};

/// How this process presents itself to other agents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalAgentConfig {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_version")]
    pub version: String,
    /// Base URL the local agent is served at.
    pub url: String,
    #[serde(default = "default_bindings")]
    pub bindings: Vec<TransportKind>,
}

fn default_version() -> String {
    "1.0.0".to_string()
}

fn default_bindings() -> Vec<TransportKind> {
    vec![TransportKind::JsonRpc]
}

impl LocalAgentConfig {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            version: default_version(),
            url: url.into(),
            bindings: default_bindings(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_bindings(mut self, bindings: Vec<TransportKind>) -> Self {
        self.bindings = bindings;
        self
    }
}

/// Build the capability document for the local agent from its registered skills.
pub fn build_agent_card(registry: &SkillRegistry, config: &LocalAgentConfig) -> AgentCard {
    let summary = registry.describe();
    let description = [config.description.trim(), summary.as_str()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    let builder = config.bindings.iter().fold(AgentCard::builder(), |builder, kind| {
        builder.interface(config.url.clone(), *kind)
    });

    builder
        .name(config.name.clone())
        .description(description)
        .version(config.version.clone())
        .capabilities(AgentCapabilities { streaming: true, ..Default::default() })
        .default_input_modes(registry.default_input_modes())
        .default_output_modes(registry.default_output_modes())
        .skills(registry.list().into_iter().map(|descriptor| descriptor.to_agent_skill()).collect())
        .build()
}
