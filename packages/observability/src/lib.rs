//! # Observability
//!
//! Logging setup shared by the Resolar daemon and CLI.
//!
//! Binaries call [`init_with_config`] once at startup and use the standard
//! `tracing` macros everywhere else. Log lines are written as JSONL to
//! `~/.resolar/logs/resolar.jsonl` (or a custom path), so they can be followed
//! with `tail -f ... | jq`. A compact stderr layer can be enabled for
//! foreground runs.
//!
//! ```rust,ignore
//! observability::init_with_config(observability::LogConfig {
//!     service_name: "daemon".into(),
//!     default_level: "debug".into(),
//!     also_stderr: true,
//!     ..Default::default()
//! });
//! tracing::info!("daemon ready");
//! ```

mod file;

pub use file::CentralLogWriter;

use std::io;
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Configuration for the logging system.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Name of the service (e.g., "daemon", "cli").
    /// Recorded on the startup line.
    pub service_name: String,

    /// Default log level filter (e.g., "debug", "info", "warn").
    /// Can be overridden by `RUST_LOG` environment variable.
    pub default_level: String,

    /// Optional custom log file path.
    /// Defaults to `~/.resolar/logs/resolar.jsonl`.
    pub log_path: Option<PathBuf>,

    /// Also emit logs to stderr for immediate feedback.
    pub also_stderr: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            service_name: "unknown".into(),
            default_level: "info".into(),
            log_path: None,
            also_stderr: false,
        }
    }
}

/// Default central log file location.
pub fn default_log_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".resolar").join("logs").join("resolar.jsonl"))
}

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Initialize logging with custom configuration.
///
/// If the log file cannot be opened, file output is skipped and logging
/// falls back to stderr only. Calling this twice is harmless: the second
/// installation attempt is ignored.
pub fn init_with_config(config: LogConfig) {
    let log_path = config.log_path.clone().or_else(default_log_path);

    let file_layer = log_path
        .as_ref()
        .and_then(|path| match CentralLogWriter::new(path) {
            Ok(writer) => Some(writer),
            Err(e) => {
                eprintln!("failed to open log file {}: {}", path.display(), e);
                None
            }
        })
        .map(|writer| {
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
                .with_target(true)
                .with_writer(writer)
                .with_filter(env_filter(&config.default_level))
        });

    // Without a file there is nowhere else to write, so force stderr on.
    let stderr_enabled = config.also_stderr || file_layer.is_none();
    let stderr_layer = stderr_enabled.then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_file(false)
            .with_line_number(false)
            .compact()
            .with_writer(io::stderr)
            .with_filter(env_filter(&config.default_level))
    });

    let installed = tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .try_init();

    if installed.is_ok() {
        tracing::info!(
            service = %config.service_name,
            log_path = ?log_path,
            "observability initialized"
        );
    }
}
