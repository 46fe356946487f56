use a2a_cli::cli::Cli;
use a2a_cli::{HostConfig, Launcher};
use anyhow::{Context, Result};
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = HostConfig::load(&cli.config)
        .with_context(|| format!("loading host configuration from {}", cli.config.display()))?;

    let telemetry = a2a_telemetry::init_with_format(
        &config.telemetry.service_name,
        config.telemetry.log_format(),
        config.telemetry.otlp_endpoint.as_deref(),
    );
    if let Err(e) = telemetry {
        eprintln!("Failed to initialize telemetry: {}", e);
    }

    let launcher = Launcher::from_config(config).await?;
    let output = launcher.run(cli.command).await;
    a2a_telemetry::shutdown_telemetry();

    println!("{}", output?);
    Ok(())
}
