//! # a2a-cli
//!
//! Host agent launcher.
//!
//! ## Overview
//!
//! - [`HostConfig`] - `host.toml` loading
//! - [`Launcher`] - Builds the directory, delegator and skill registry from config
//! - [`RemoteAgentTools`] - Delegation as a planner-facing tool
//!
//! ## Commands
//!
//! - `a2a-host agents` - List reachable remote agents
//! - `a2a-host send <agent> <task>` - Delegate one task
//! - `a2a-host skills` - Show the local agent card
//! - `a2a-host prompt` - Show the routing prompt

pub mod cli;
pub mod config;
pub mod launcher;
pub mod tools;

pub use config::{ConfigError, DelegationConfig, HostConfig, TelemetryConfig};
pub use launcher::Launcher;
pub use tools::RemoteAgentTools;
