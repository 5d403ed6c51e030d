//! Local storage for the Resolar daemon.
//!
//! This crate provides:
//! - **FileStorage**: a JSON file on disk, the default backend
//! - **MemoryStorage**: an in-process map for tests and ephemeral runs
//! - **CredentialsManager**: typed access to the credential record and the
//!   cached state that must be wiped together with it

mod credentials;
mod file;
mod keys;
mod memory;
mod traits;

pub use credentials::{CredentialsManager, LoginSecrets};
pub use file::FileStorage;
pub use keys::StorageKeys;
pub use memory::MemoryStorage;
pub use traits::LocalStorage;

use std::path::Path;
use thiserror::Error;

/// Error type for storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Backend-specific failure
    #[error("Platform storage error: {0}")]
    Platform(String),

    /// Encoding/decoding error
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Open a CredentialsManager backed by the storage file at `path`.
pub fn open_credentials_manager(path: &Path) -> StorageResult<CredentialsManager> {
    let storage = FileStorage::open(path)?;
    Ok(CredentialsManager::new(Box::new(storage)))
}
