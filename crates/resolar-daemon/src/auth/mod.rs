//! Authentication handlers.

mod login;
mod logout;
mod status;

use crate::app::DaemonState;
use resolar_ipc::IpcServer;

/// Register all authentication handlers.
pub async fn register_handlers(server: &IpcServer, state: DaemonState) {
    status::register(server, state.clone()).await;
    logout::register(server, state.clone()).await;
    login::register(server, state).await;
}
