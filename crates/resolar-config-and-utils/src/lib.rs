//! Configuration, paths, and logging setup shared by the Resolar binaries.

mod config;
mod error;
mod logging;
mod paths;

pub use config::{endpoint_keys, Config, DEFAULT_API_BASE_URL, DEFAULT_LOG_LEVEL};
pub use error::{CoreError, CoreResult};
pub use logging::init_logging;
pub use paths::Paths;
