//! Exposes delegation to a planner as a plain string-returning tool.

use a2a_client::{DelegationRequest, Delegator};
use a2a_core::DelegationError;
use a2a_skill::{SkillAction, SkillDescriptor, SkillError, SkillRegistry, SkillResult};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::info;

pub const SEND_MESSAGE_SKILL: &str = "send_message";

#[derive(Debug, Deserialize)]
struct SendMessageArgs {
    #[serde(rename = "agentName")]
    agent_name: String,
    task: String,
}

#[derive(Debug, Clone)]
pub struct RemoteAgentTools {
    delegator: Arc<Delegator>,
}

impl RemoteAgentTools {
    pub fn new(delegator: Arc<Delegator>) -> Self {
        Self { delegator }
    }

    pub fn delegator(&self) -> &Delegator {
        &self.delegator
    }

    /// Delegate `task` to `agent_name`. Failures come back as readable text
    /// so the planner can act on them.
    pub async fn send_message(&self, agent_name: &str, task: &str) -> String {
        info!(agent.name = agent_name, task, "Sending message to remote agent");

        match self.delegator.delegate(DelegationRequest::new(agent_name, task)).await {
            Ok(response) => response,
            Err(e @ DelegationError::AgentNotFound { .. }) => e.to_string(),
            Err(e) => format!("Error communicating with agent '{agent_name}': {e}"),
        }
    }

    /// Register `send_message` as a skill taking `{"agentName": ..., "task": ...}`.
    pub fn register_into(&self, registry: &mut SkillRegistry) -> SkillResult<()> {
        let descriptor = SkillDescriptor::new(
            SEND_MESSAGE_SKILL,
            SEND_MESSAGE_SKILL,
            "Sends a task to a remote agent. Provide the agent name and a self-contained task description.",
        )
        .with_input_modes(["text"])
        .with_output_modes(["text"])
        .with_tags(["delegation"])
        .with_input_schema(json!({
            "type": "object",
            "properties": {
                "agentName": {
                    "type": "string",
                    "description": "Name of the remote agent, as listed under available agents."
                },
                "task": {
                    "type": "string",
                    "description": "Self-contained description of the work for the remote agent."
                }
            },
            "required": ["agentName", "task"]
        }));

        let tools = self.clone();
        let action = SkillAction::new(move |args: Value| {
            let tools = tools.clone();
            async move {
                let args: SendMessageArgs = serde_json::from_value(args).map_err(|e| SkillError::Action {
                    skill: SEND_MESSAGE_SKILL.to_string(),
                    message: format!("invalid arguments: {e}"),
                })?;
                Ok(Value::String(tools.send_message(&args.agent_name, &args.task).await))
            }
        });

        registry.register(descriptor, action)
    }

    /// Routing instructions for a planner, listing the known agents.
    pub fn system_prompt(&self) -> String {
        format!(
            "You route user requests to specialised remote agents.\n\
             \n\
             - Use the `{SEND_MESSAGE_SKILL}` tool to hand a task to a remote agent.\n\
             - Remote agents do not see this conversation. Put every detail they need into the task.\n\
             - Contact the agents you need directly; do not ask the user which one to use.\n\
             - Show the user the remote agent's full answer.\n\
             - If a remote agent asks for confirmation the user has not given, ask the user.\n\
             - Answer only from tool results. If something is missing, ask the user.\n\
             \n\
             Available agents:\n\
             {}",
            self.delegator.directory().describe_all()
        )
    }
}
