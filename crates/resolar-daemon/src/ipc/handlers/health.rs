//! Health and shutdown handlers.

use crate::app::DaemonState;
use resolar_ipc::{IpcServer, Method, Response};
use tracing::info;

/// Register health and shutdown handlers.
pub async fn register(server: &IpcServer, state: DaemonState) {
    server
        .register_handler(Method::Health, move |req| {
            let state = state.clone();
            async move {
                Response::success(
                    &req.id,
                    serde_json::json!({
                        "status": "ok",
                        "version": env!("CARGO_PKG_VERSION"),
                        "api_base_url": state.config.api_base_url,
                        "base_dir": state.paths.base_dir().display().to_string(),
                    }),
                )
            }
        })
        .await;

    let shutdown_tx = server.shutdown_sender();
    server
        .register_handler(Method::Shutdown, move |req| {
            let tx = shutdown_tx.clone();
            async move {
                info!("Shutdown requested over IPC");
                let _ = tx.send(());
                Response::success(&req.id, serde_json::json!({ "status": "shutting_down" }))
            }
        })
        .await;

    info!("Registered health handlers");
}
