//! Logging initialization.
//!
//! Thin wrapper over the observability package so both binaries configure
//! tracing the same way.

use crate::Paths;
use observability::LogConfig;

/// Initialize logging for a service.
///
/// Writes JSONL to the log file under `paths`, filtered by `RUST_LOG` or the
/// provided default `level`. `also_stderr` mirrors output to stderr, which the
/// daemon enables when running in the foreground.
pub fn init_logging(service_name: &str, level: &str, paths: &Paths, also_stderr: bool) {
    observability::init_with_config(LogConfig {
        service_name: service_name.into(),
        default_level: level.into(),
        log_path: Some(paths.log_file()),
        also_stderr,
    });
}
