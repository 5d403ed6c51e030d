//! Resolar Daemon - Background service that holds the session and talks to the notes service.

mod app;
mod auth;
mod ipc;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use resolar_config_and_utils::{init_logging, Config, Paths};

/// Resolar daemon command-line interface.
#[derive(Parser)]
#[command(name = "resolar-daemon")]
#[command(about = "Resolar daemon for authenticated page capture")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log level (trace, debug, info, warn, error). Defaults to the configured level.
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Base directory for runtime files (socket, logs, config). Defaults to ~/.resolar
    #[arg(long, global = true, env = "RESOLAR_HOME")]
    base_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the daemon
    Start {
        /// Run in foreground and mirror logs to stderr
        #[arg(short, long)]
        foreground: bool,
    },
    /// Stop the daemon
    Stop,
    /// Check daemon status
    Status,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let paths = Paths::resolve(cli.base_dir)?;
    let config = Config::load(&paths)?;

    // Default to start in foreground if no command given
    let command = cli.command.unwrap_or(Commands::Start { foreground: true });
    let foreground = matches!(command, Commands::Start { foreground: true });

    let level = cli.log_level.unwrap_or_else(|| config.log_level.clone());
    init_logging("daemon", &level, &paths, foreground);

    match command {
        Commands::Start { foreground } => {
            app::run_daemon(config, paths, foreground).await?;
        }
        Commands::Stop => {
            app::stop_daemon(&paths).await?;
        }
        Commands::Status => {
            app::check_status(&paths).await?;
        }
    }

    Ok(())
}
