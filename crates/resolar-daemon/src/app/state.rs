//! Daemon state definition.

use resolar_auth::HttpTransport;
use resolar_config_and_utils::{Config, Paths};
use resolar_dispatch::CommandDispatcher;
use resolar_storage::CredentialsManager;
use std::sync::Arc;

/// Shared daemon state (thread-safe).
#[derive(Clone)]
pub struct DaemonState {
    pub config: Arc<Config>,
    pub paths: Arc<Paths>,
    /// Runs every client command against the notes service.
    pub dispatcher: CommandDispatcher,
}

impl DaemonState {
    pub fn new(
        config: Config,
        paths: Paths,
        transport: Arc<dyn HttpTransport>,
        credentials: Arc<CredentialsManager>,
    ) -> Self {
        let config = Arc::new(config);
        let dispatcher = CommandDispatcher::new(transport, credentials, config.clone());
        Self {
            config,
            paths: Arc::new(paths),
            dispatcher,
        }
    }
}
