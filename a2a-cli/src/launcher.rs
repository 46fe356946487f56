//! Wires configuration into a running host and executes CLI commands.

use crate::cli::Commands;
use crate::config::HostConfig;
use crate::tools::RemoteAgentTools;
use a2a_client::{AgentDirectory, Delegator, HttpCardResolver, TransportRegistry};
use a2a_core::{AgentCard, TransportKind};
use a2a_skill::{SkillRegistry, build_agent_card};
use anyhow::Result;
use std::sync::Arc;
use tracing::info;

pub struct Launcher {
    config: HostConfig,
    tools: RemoteAgentTools,
    registry: SkillRegistry,
}

impl Launcher {
    /// Discover the configured remote agents and register the local skills.
    pub async fn from_config(config: HostConfig) -> Result<Self> {
        let http_client = reqwest::Client::new();
        let resolver =
            HttpCardResolver::new(http_client.clone()).with_timeout(config.delegation.card_fetch_timeout());
        let directory = AgentDirectory::build(&config.remote_agents, &resolver).await;

        let delegator = Delegator::new(Arc::new(directory), TransportRegistry::with_http_defaults(http_client))
            .with_timeout(config.delegation.timeout());
        let tools = RemoteAgentTools::new(Arc::new(delegator));

        let mut registry = SkillRegistry::new();
        tools.register_into(&mut registry)?;

        info!(
            agents = ?tools.delegator().directory().names(),
            skills = registry.len(),
            "Host agent ready"
        );
        Ok(Self { config, tools, registry })
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    pub fn tools(&self) -> &RemoteAgentTools {
        &self.tools
    }

    pub fn registry(&self) -> &SkillRegistry {
        &self.registry
    }

    pub fn agent_card(&self) -> AgentCard {
        build_agent_card(&self.registry, &self.config.agent)
    }

    /// Run one command and return what it prints.
    pub async fn run(&self, command: Commands) -> Result<String> {
        match command {
            Commands::Agents => Ok(self.list_agents()),
            Commands::Send { agent, task } => Ok(self.tools.send_message(&agent, &task).await),
            Commands::Skills => self.describe_skills(),
            Commands::Prompt => Ok(self.tools.system_prompt()),
        }
    }

    fn list_agents(&self) -> String {
        let directory = self.tools.delegator().directory();
        if directory.is_empty() {
            return "No remote agents available.".to_string();
        }
        directory
            .iter()
            .map(|(name, card)| {
                let bindings =
                    card.supported_bindings().iter().map(TransportKind::as_binding).collect::<Vec<_>>().join(", ");
                format!("{name}\t{}\t[{bindings}]\t{}", card.name, card.description)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn describe_skills(&self) -> Result<String> {
        let card = serde_json::to_string_pretty(&self.agent_card())?;
        Ok(format!(
            "{}\nDefault input modes: {}\nDefault output modes: {}\n\n{}",
            self.registry.describe(),
            self.registry.default_input_modes().join(", "),
            self.registry.default_output_modes().join(", "),
            card
        ))
    }
}
