use crate::transport::TransportKind;
use crate::types::TaskState;
use std::time::Duration;

/// Failure reported by a transport while sending a message or streaming events.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("unexpected HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("RPC error: {message} ({code})")]
    Rpc { code: i64, message: String },

    #[error("failed to decode event: {0}")]
    Decode(String),

    #[error("event stream error: {0}")]
    Stream(String),

    #[error("invalid endpoint '{url}': {reason}")]
    InvalidEndpoint { url: String, reason: String },

    #[error("no {0} transport is registered")]
    Unsupported(TransportKind),
}

/// Failure to obtain a remote agent's capability document.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CardError {
    #[error("invalid agent endpoint '{url}': {reason}")]
    InvalidEndpoint { url: String, reason: String },

    #[error("failed to fetch agent card from {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("failed to fetch agent card from {url}: HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("failed to parse agent card from {url}: {message}")]
    Parse { url: String, message: String },
}

/// Outcome of a failed delegation. Every variant names the agent involved.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DelegationError {
    #[error("Agent '{name}' not found. Available agents: {}", .known.join(", "))]
    AgentNotFound { name: String, known: Vec<String> },

    #[error(
        "Agent '{agent}' shares no transport with this client (advertised: {}; available: {})",
        join_kinds(.advertised),
        join_kinds(.available)
    )]
    NoCompatibleTransport {
        agent: String,
        advertised: Vec<TransportKind>,
        available: Vec<TransportKind>,
    },

    #[error("Agent '{agent}' did not complete the task within {}s", .timeout.as_secs_f64())]
    Timeout { agent: String, timeout: Duration },

    #[error(
        "Agent '{agent}' reported task {state}{}",
        .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default()
    )]
    RemoteTaskFailed { agent: String, state: TaskState, message: Option<String> },

    #[error("Transport error talking to agent '{agent}': {source}")]
    TransportError {
        agent: String,
        #[source]
        source: TransportError,
    },

    #[error("Delegation to agent '{agent}' failed: {message}")]
    DelegationFailed { agent: String, message: String },
}

impl DelegationError {
    /// The agent the failed delegation was addressed to.
    pub fn agent(&self) -> &str {
        match self {
            DelegationError::AgentNotFound { name, .. } => name,
            DelegationError::NoCompatibleTransport { agent, .. }
            | DelegationError::Timeout { agent, .. }
            | DelegationError::RemoteTaskFailed { agent, .. }
            | DelegationError::TransportError { agent, .. }
            | DelegationError::DelegationFailed { agent, .. } => agent,
        }
    }
}

fn join_kinds(kinds: &[TransportKind]) -> String {
    if kinds.is_empty() {
        return "none".to_string();
    }
    kinds.iter().map(TransportKind::as_binding).collect::<Vec<_>>().join(", ")
}
