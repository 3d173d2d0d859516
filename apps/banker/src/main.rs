//! banker - deadlock-avoiding resource allocator
//!
//! Replays allocation scenarios against a shared pool and checks pool
//! manifests for safety.

mod cli;
mod display;
mod error;
mod logging;
mod runner;

use crate::cli::{Cli, Commands, GlobalArgs};
use crate::display::OutputRenderer;
use crate::error::CliError;
use banker_config::{Config, PoolManifest, Scenario};
use banker_events::EventReceiver;
use banker_resources::{is_safe, ResourcePool};
use clap::Parser;
use std::future::Future;
use std::process;
use tokio::select;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Configuration decides the log format, so it loads before tracing.
    let config = match load_config(&cli.global).await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    init_tracing(config.general.json_logs, cli.global.debug);

    if let Err(e) = run(cli.command, config).await {
        error!("Application error: {}", e);
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

/// Load configuration with precedence: file (or defaults), then
/// environment, then CLI flags.
async fn load_config(global: &GlobalArgs) -> Result<Config, CliError> {
    let mut config = Config::load_or_default(global.config.as_deref()).await?;
    config.merge_env()?;
    if global.json {
        config.general.json_logs = true;
    }
    Ok(config)
}

/// Main application logic
async fn run(command: Commands, mut config: Config) -> Result<(), CliError> {
    info!("Starting banker v{}", env!("CARGO_PKG_VERSION"));
    let renderer = OutputRenderer::new(config.general.json_logs);

    match command {
        Commands::Run {
            scenario,
            serial,
            no_monitor,
            grow,
        } => {
            if no_monitor {
                config.monitor.enabled = false;
            }
            if grow {
                config.growth.enabled = true;
            }

            let scenario = match scenario {
                Some(path) => Scenario::load_from_file(&path).await?,
                None => Scenario::classic(),
            };

            let (event_sender, event_receiver) = banker_events::channel();
            let summary = execute_with_events(
                runner::run_scenario(scenario, &config, serial, event_sender),
                event_receiver,
            )
            .await?;

            renderer.render_run(&summary);
            info!(
                granted = summary.granted(),
                steps = summary.outcomes.len(),
                "Scenario completed"
            );
        }

        Commands::Check { manifest } => {
            let manifest = match manifest {
                Some(path) => PoolManifest::load_from_file(&path).await?,
                None => PoolManifest::classic(),
            };

            let snapshot = ResourcePool::from_manifest(&manifest)?.snapshot().await;
            let report = is_safe(&snapshot.available, &snapshot.processes);
            renderer.render_check(&report, &snapshot);

            if !report.safe {
                return Err(CliError::UnsafeManifest {
                    blocked: report.blocked,
                });
            }
        }
    }

    Ok(())
}

/// Drive `command` while logging every event it emits
async fn execute_with_events<T>(
    command: impl Future<Output = Result<T, CliError>>,
    mut event_receiver: EventReceiver,
) -> Result<T, CliError> {
    let mut command = Box::pin(command);

    loop {
        select! {
            result = &mut command => {
                // Drain any remaining events
                while let Ok(message) = event_receiver.try_recv() {
                    logging::log_event_with_tracing(&message);
                }
                return result;
            }

            message = event_receiver.recv() => {
                match message {
                    Some(message) => logging::log_event_with_tracing(&message),
                    None => { /* Channel closed: keep waiting for command to finish */ }
                }
            }
        }
    }
}

/// Initialize tracing; logs go to stderr so stdout carries only results.
fn init_tracing(json_mode: bool, debug_enabled: bool) {
    let default_filter = if debug_enabled {
        "info,banker=debug,banker_resources=debug"
    } else {
        "warn,banker=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json_mode {
        builder.json().init();
    } else {
        builder.init();
    }
}
