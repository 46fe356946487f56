use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "a2a-host")]
#[command(about = "Host agent that delegates tasks to remote A2A agents", long_about = None)]
pub struct Cli {
    /// Path to the host configuration file
    #[arg(short, long, env = "A2A_HOST_CONFIG", default_value = "host.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the remote agents that could be reached
    Agents,

    /// Delegate a task to a remote agent and print its answer
    Send {
        /// Directory name of the remote agent
        agent: String,

        /// Task text
        task: String,
    },

    /// Print the local skill summary and agent card
    Skills,

    /// Print the routing prompt for a planner
    Prompt,
}
