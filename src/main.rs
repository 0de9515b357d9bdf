// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Warehouse agent entry point - CLI, commands, and the protocol session.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tokio::sync::watch;
use tracing::{error, info, warn};

use warehouse_agent::config::{self, CliOptions, ResolvedConfig};
use warehouse_agent::engine::DecisionEngine;
use warehouse_agent::session::{SessionRunner, TerminationReason};
use warehouse_agent::telemetry::{init_telemetry, TelemetryConfig};
use warehouse_agent::transport::{self, PeerChannel};
use warehouse_agent::VERSION;

/// Task-assignment agent for the warehouse simulator.
#[derive(Parser)]
#[command(name = "warehouse-agent")]
#[command(author, version, about = "Task-assignment agent for the warehouse simulator", long_about = None)]
struct Cli {
    /// Config file to use instead of the workspace config
    #[arg(short, long, env = "WAREHOUSE_AGENT_CONFIG")]
    config: Option<PathBuf>,

    /// Connect to the simulator on this Unix socket instead of stdio
    #[arg(short, long, env = "WAREHOUSE_AGENT_SOCKET")]
    socket: Option<PathBuf>,

    /// Minimum battery percentage a robot needs to be assigned
    #[arg(long)]
    min_battery: Option<f64>,

    /// Seconds reported in wait decisions
    #[arg(long)]
    wait_estimate: Option<f64>,

    /// Log every protocol line sent and received
    #[arg(long)]
    log_messages: bool,

    /// Show verbose output
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Show debug output with source locations
    #[arg(long)]
    debug: bool,

    /// Show trace output (full payloads)
    #[arg(long)]
    trace: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Subcommands for warehouse-agent.
#[derive(Subcommand)]
enum Commands {
    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },

    /// Initialize a new configuration file
    Init,

    /// Show version information
    Version,
}

/// Config subcommand actions.
#[derive(Subcommand)]
enum ConfigAction {
    /// Show the merged configuration
    Show,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let _telemetry = init_telemetry(&TelemetryConfig::from_flags(
        cli.verbose,
        cli.debug,
        cli.trace,
    ))?;

    let cli_options = CliOptions {
        min_battery: cli.min_battery,
        wait_estimate_secs: cli.wait_estimate,
        log_messages: if cli.log_messages { Some(true) } else { None },
        socket_path: cli.socket,
    };

    let workspace_root = std::env::current_dir()?;

    if let Some(command) = cli.command {
        return handle_command(command, &workspace_root, cli.config, cli_options);
    }

    let config = config::load_config(&workspace_root, cli.config.as_deref(), cli_options)?;
    info!(
        version = VERSION,
        min_battery = config.min_battery,
        wait_estimate_secs = config.wait_estimate_secs,
        "Starting warehouse agent"
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Interrupt received, shutting down");
                let _ = shutdown_tx.send(true);
            }
            Err(err) => warn!(error = %err, "Could not listen for interrupt"),
        }
    });

    let reason = match config.socket_path.clone() {
        Some(path) => run_on_socket(&path, &config, shutdown_rx).await?,
        None => run_session(transport::stdio(), &config, shutdown_rx).await?,
    };

    if reason == TerminationReason::Shutdown {
        // A stdin read may still be parked on the blocking pool.
        std::process::exit(0);
    }
    Ok(())
}

fn handle_command(
    command: Commands,
    workspace_root: &std::path::Path,
    config_path: Option<PathBuf>,
    cli_options: CliOptions,
) -> anyhow::Result<()> {
    match command {
        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                let config =
                    config::load_config(workspace_root, config_path.as_deref(), cli_options)?;
                println!("{}", serde_json::to_string_pretty(&config)?);
            }
        },
        Commands::Init => {
            let path = config::init_config(workspace_root)?;
            println!("Created config file: {}", path.display());
        }
        Commands::Version => {
            println!("warehouse-agent {}", VERSION);
        }
    }
    Ok(())
}

#[cfg(unix)]
async fn run_on_socket(
    path: &std::path::Path,
    config: &ResolvedConfig,
    shutdown: watch::Receiver<bool>,
) -> anyhow::Result<TerminationReason> {
    info!(socket = %path.display(), "Connecting to simulator");
    let channel = transport::connect_unix(path).await.map_err(|e| {
        anyhow::anyhow!("Failed to connect to {}: {}", path.display(), e)
    })?;
    run_session(channel, config, shutdown).await
}

#[cfg(not(unix))]
async fn run_on_socket(
    path: &std::path::Path,
    _config: &ResolvedConfig,
    _shutdown: watch::Receiver<bool>,
) -> anyhow::Result<TerminationReason> {
    anyhow::bail!("Unix sockets are not supported on this platform: {}", path.display())
}

async fn run_session<C: PeerChannel>(
    channel: C,
    config: &ResolvedConfig,
    shutdown: watch::Receiver<bool>,
) -> anyhow::Result<TerminationReason> {
    let engine = DecisionEngine::new(config.engine_config());
    let result = SessionRunner::new(channel, engine)
        .with_message_logging(config.log_messages)
        .with_shutdown(shutdown)
        .run()
        .await;

    match result {
        Ok(summary) => Ok(summary.reason),
        Err(err) if err.is_disconnect() => {
            info!(error = %err, "Simulator disconnected");
            Ok(TerminationReason::ChannelClosed)
        }
        Err(err) => {
            error!(error = %err, "Session failed");
            Err(err.into())
        }
    }
}
