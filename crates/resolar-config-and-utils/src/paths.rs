//! File system paths.

use crate::{CoreError, CoreResult};
use std::path::PathBuf;

/// Manages file system paths for the daemon and CLI.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Base directory for runtime files (~/.resolar)
    base_dir: PathBuf,
}

impl Paths {
    /// Create a new Paths instance rooted at `~/.resolar`.
    pub fn new() -> CoreResult<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| CoreError::Path("Could not determine home directory".to_string()))?;

        Ok(Self {
            base_dir: home.join(".resolar"),
        })
    }

    /// Create a new Paths instance with a custom base directory.
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Resolve an optional override, falling back to `~/.resolar`.
    pub fn resolve(base_dir: Option<PathBuf>) -> CoreResult<Self> {
        match base_dir {
            Some(base) => Ok(Self::with_base_dir(base)),
            None => Self::new(),
        }
    }

    /// Get the base directory (~/.resolar).
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the config file path (~/.resolar/config.json).
    pub fn config_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the local storage file path (~/.resolar/storage.json).
    pub fn storage_file(&self) -> PathBuf {
        self.base_dir.join("storage.json")
    }

    /// Get the IPC socket path (~/.resolar/daemon.sock).
    pub fn socket_file(&self) -> PathBuf {
        self.base_dir.join("daemon.sock")
    }

    /// Get the PID file path (~/.resolar/daemon.pid).
    pub fn pid_file(&self) -> PathBuf {
        self.base_dir.join("daemon.pid")
    }

    /// Get the logs directory (~/.resolar/logs).
    pub fn logs_dir(&self) -> PathBuf {
        self.base_dir.join("logs")
    }

    /// Get the JSONL log file path (~/.resolar/logs/resolar.jsonl).
    pub fn log_file(&self) -> PathBuf {
        self.logs_dir().join("resolar.jsonl")
    }

    /// Ensure all required directories exist.
    pub fn ensure_dirs(&self) -> CoreResult<()> {
        std::fs::create_dir_all(&self.base_dir)?;
        std::fs::create_dir_all(self.logs_dir())?;
        Ok(())
    }
}
