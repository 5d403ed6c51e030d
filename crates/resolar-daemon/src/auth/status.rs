//! Authentication status handler.

use crate::app::DaemonState;
use crate::ipc::respond;
use resolar_dispatch::Command;
use resolar_ipc::{IpcServer, Method};

/// Register the auth status handler.
pub async fn register(server: &IpcServer, state: DaemonState) {
    let dispatcher = state.dispatcher;
    server
        .register_handler(Method::AuthStatus, move |req| {
            let dispatcher = dispatcher.clone();
            async move { respond(&req.id, dispatcher.execute(Command::AuthStatus).await) }
        })
        .await;
}
