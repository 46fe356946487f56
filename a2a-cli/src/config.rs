//! `host.toml` loading.
//!
//! ```toml
//! [agent]
//! name = "host-agent"
//! description = "Routes customer requests to specialist agents."
//! url = "http://localhost:8080/a2a"
//! bindings = ["JSONRPC", "HTTP+JSON"]
//!
//! [delegation]
//! timeout_secs = 60
//! card_fetch_timeout_secs = 10
//!
//! [remote_agents.orders]
//! endpoint = "http://localhost:9001"
//! health_url = "http://localhost:9001/actuator/health"
//!
//! [telemetry]
//! otlp_endpoint = "http://localhost:4317"
//! json_logs = true
//! ```

use a2a_client::RemoteAgentSetting;
use a2a_skill::LocalAgentConfig;
use a2a_telemetry::LogFormat;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_ENV_VAR: &str = "A2A_HOST_CONFIG";
pub const DEFAULT_SERVICE_NAME: &str = "a2a-host";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {details}")]
    Io { path: PathBuf, details: String },

    #[error("invalid TOML in {path}: {details}")]
    Toml { path: PathBuf, details: String },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostConfig {
    #[serde(default = "default_agent")]
    pub agent: LocalAgentConfig,
    #[serde(default)]
    pub delegation: DelegationConfig,
    #[serde(default)]
    pub remote_agents: BTreeMap<String, RemoteAgentSetting>,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegationConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_card_fetch_timeout_secs")]
    pub card_fetch_timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_service_name")]
    pub service_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub otlp_endpoint: Option<String>,
    #[serde(default)]
    pub json_logs: bool,
}

fn default_agent() -> LocalAgentConfig {
    LocalAgentConfig::new(DEFAULT_SERVICE_NAME, "http://localhost:8080")
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_card_fetch_timeout_secs() -> u64 {
    10
}

fn default_service_name() -> String {
    DEFAULT_SERVICE_NAME.to_string()
}

impl Default for DelegationConfig {
    fn default() -> Self {
        Self { timeout_secs: default_timeout_secs(), card_fetch_timeout_secs: default_card_fetch_timeout_secs() }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self { service_name: default_service_name(), otlp_endpoint: None, json_logs: false }
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            agent: default_agent(),
            delegation: DelegationConfig::default(),
            remote_agents: BTreeMap::new(),
            telemetry: TelemetryConfig::default(),
        }
    }
}

impl DelegationConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn card_fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.card_fetch_timeout_secs)
    }
}

impl TelemetryConfig {
    pub fn log_format(&self) -> LogFormat {
        if self.json_logs { LogFormat::Json } else { LogFormat::Text }
    }
}

impl HostConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io { path: path.to_path_buf(), details: e.to_string() })?;
        let config: HostConfig = toml::from_str(&content)
            .map_err(|e| ConfigError::Toml { path: path.to_path_buf(), details: e.to_string() })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.delegation.timeout_secs == 0 {
            return Err(ConfigError::Invalid("delegation.timeout_secs must be greater than zero".to_string()));
        }
        if self.delegation.card_fetch_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "delegation.card_fetch_timeout_secs must be greater than zero".to_string(),
            ));
        }
        if let Some((name, _)) = self.remote_agents.iter().find(|(_, setting)| setting.endpoint.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!("remote_agents.{name}.endpoint must not be empty")));
        }
        if self.agent.bindings.is_empty() {
            return Err(ConfigError::Invalid("agent.bindings must list at least one binding".to_string()));
        }
        Ok(())
    }
}
