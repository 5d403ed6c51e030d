//! Handler registration for the IPC server.

use crate::app::DaemonState;
use crate::auth;
use crate::ipc::handlers;
use resolar_ipc::IpcServer;
use tracing::info;

/// Register all IPC handlers.
pub async fn register_handlers(server: &IpcServer, state: DaemonState) {
    handlers::health::register(server, state.clone()).await;
    auth::register_handlers(server, state.clone()).await;
    handlers::pages::register(server, state.clone()).await;
    handlers::subjects::register(server, state.clone()).await;
    handlers::highlights::register(server, state).await;

    info!("All IPC handlers registered");
}
