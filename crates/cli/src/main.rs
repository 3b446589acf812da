//! Raiser CLI - command-line client for the Ticket Raiser API

mod commands;
mod config;
mod logging;
mod render;
mod state_dir;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use commands::Commands;
use config::CliConfig;
use raiser_http::TypedClientBuilder;
use raiser_session::{AuthContext, AuthService, FileSessionStore, RefreshCookieFile};
use state_dir::StateDir;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{Level, debug, error, info, warn};

#[derive(Parser)]
#[command(name = "raiser")]
#[command(about = "Command-line client for the Ticket Raiser API")]
#[command(version)]
struct Cli {
    /// Set logging level
    #[arg(short = 'l', long, global = true, default_value = "warn")]
    log_level: LogLevel,

    /// Configuration file (defaults to the platform config directory)
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    /// Directory for configuration and the stored session
    #[arg(short = 'd', long, global = true, env = "RAISER_STATE_DIR")]
    state_dir: Option<PathBuf>,

    /// Timeout for the whole command in seconds (0 = no timeout)
    #[arg(short = 't', long, global = true, default_value = "30")]
    timeout: u64,

    /// Also append logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init_logging(cli.log_level.into(), cli.log_file.as_deref())?;

    let state_dir = cli
        .state_dir
        .clone()
        .map_or_else(StateDir::new, StateDir::with_override);
    let config_path = cli.config.clone().unwrap_or_else(|| state_dir.config_path());
    let config = CliConfig::load(Some(&config_path))?;
    debug!(path = %config_path.display(), ?config, "Loaded configuration");

    // A state dir from the config file applies only when none was given on
    // the command line
    let state_dir = match (&cli.state_dir, &config.session.state_dir) {
        (None, Some(dir)) => StateDir::with_override(dir),
        _ => state_dir,
    };

    let (context, cookies) = build_context(&config, &state_dir)?;
    info!(base_url = %config.api.base_url, "Starting Raiser CLI");

    // Long-running commands end on Ctrl-C, not on the timeout
    let outcome = if cli.timeout == 0 || cli.command.is_long_running() {
        cli.command.execute(context.clone()).await
    } else {
        let timeout_duration = Duration::from_secs(cli.timeout);
        match tokio::time::timeout(timeout_duration, cli.command.execute(context.clone())).await {
            Ok(result) => result,
            Err(_) => {
                error!("Command timed out after {} seconds", cli.timeout);
                std::process::exit(1);
            }
        }
    };

    // Login, refresh and logout all change the cookie; save it either way
    if let Err(e) = cookies.persist(context.service().client()) {
        warn!(error = %e, "Failed to save refresh cookie");
    }

    if let Err(e) = outcome {
        error!("Command failed: {e:#}");
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }

    debug!("Command completed successfully");
    Ok(())
}

fn build_context(
    config: &CliConfig,
    state_dir: &StateDir,
) -> Result<(AuthContext, RefreshCookieFile)> {
    let client = TypedClientBuilder::new()
        .base_url(&config.api.base_url)
        .timeout(config.api.timeout())
        .build_public()
        .context("Failed to create API client")?;

    let store = FileSessionStore::in_dir(state_dir.data_dir());
    debug!(path = %store.path().display(), "Using session store");

    let cookies = RefreshCookieFile::in_dir(state_dir.data_dir());
    if let Err(e) = cookies.restore(&client) {
        warn!(error = %e, path = %cookies.path().display(), "Ignoring unreadable refresh cookie");
    }

    let context = AuthContext::new(AuthService::new(client, Arc::new(store)));
    Ok((context, cookies))
}

#[derive(Clone, Debug, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for Level {
    fn from(log_level: LogLevel) -> Self {
        match log_level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}
