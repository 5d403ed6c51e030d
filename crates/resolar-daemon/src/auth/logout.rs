//! Authentication logout handler.

use crate::app::DaemonState;
use crate::ipc::respond;
use resolar_dispatch::Command;
use resolar_ipc::{IpcServer, Method};

/// Register the auth logout handler.
pub async fn register(server: &IpcServer, state: DaemonState) {
    let dispatcher = state.dispatcher;
    server
        .register_handler(Method::AuthLogout, move |req| {
            let dispatcher = dispatcher.clone();
            async move { respond(&req.id, dispatcher.execute(Command::Logout).await) }
        })
        .await;
}
