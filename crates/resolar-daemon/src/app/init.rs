//! Daemon initialization.

use crate::app::DaemonState;
use crate::ipc::register_handlers;
use resolar_auth::ReqwestTransport;
use resolar_config_and_utils::{Config, Paths};
use resolar_ipc::{IpcClient, IpcServer, Method};
use resolar_storage::open_credentials_manager;
use std::sync::Arc;
use tracing::{info, warn};

/// Run the daemon until a shutdown request or Ctrl-C.
pub async fn run_daemon(
    config: Config,
    paths: Paths,
    foreground: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    // Singleton enforcement: check if daemon is already running
    let socket_path = paths.socket_file();
    if socket_path.exists() {
        let client = IpcClient::new(&socket_path.to_string_lossy());
        if client.call_method(Method::Health).await.is_ok() {
            return Err(
                "Daemon is already running. Use 'resolar-daemon stop' to stop it first.".into(),
            );
        }
        warn!(path = %socket_path.display(), "Removing stale socket file");
        let _ = std::fs::remove_file(&socket_path);
    }

    let pid_file = paths.pid_file();
    if pid_file.exists() {
        let _ = std::fs::remove_file(&pid_file);
    }

    info!(foreground, "Starting Resolar daemon");
    info!(api_base_url = %config.api_base_url, "Configuration loaded");

    paths.ensure_dirs()?;

    let pid = std::process::id();
    std::fs::write(&pid_file, pid.to_string())?;
    info!(pid = pid, "Daemon started");

    let credentials = Arc::new(open_credentials_manager(&paths.storage_file())?);
    info!(
        path = %paths.storage_file().display(),
        has_session = credentials.has_session()?,
        "Credential store opened"
    );

    let transport = Arc::new(ReqwestTransport::new());
    let state = DaemonState::new(config, paths.clone(), transport, credentials);

    let ipc_server = IpcServer::new(&socket_path.to_string_lossy());
    register_handlers(&ipc_server, state).await;

    let shutdown_tx = ipc_server.shutdown_sender();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupt received");
            let _ = shutdown_tx.send(());
        }
    });

    let result = ipc_server.run().await;

    let _ = std::fs::remove_file(&pid_file);
    info!("Daemon stopped");

    result?;
    Ok(())
}
