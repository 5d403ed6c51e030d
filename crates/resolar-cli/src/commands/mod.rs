//! CLI command implementations.
//!
//! Every command returns `Ok(true)` when the daemon reported success.

mod auth;
mod highlighting;
mod pages;
mod subjects;

pub use auth::{login, logout, status};
pub use highlighting::highlighting;
pub use pages::{submit_highlights, submit_page};
pub use subjects::{subjects_add, subjects_list, subjects_select};

use crate::output::outcome_from_response;
use anyhow::Result;
use resolar_config_and_utils::Paths;
use resolar_dispatch::Outcome;
use resolar_ipc::{IpcClient, Method};
use serde_json::Value;

/// Get the IPC client for communicating with the daemon.
fn get_ipc_client(paths: &Paths) -> IpcClient {
    IpcClient::new(&paths.socket_file().to_string_lossy())
}

/// Ensure the daemon is running, or fail with a hint.
async fn require_daemon(paths: &Paths) -> Result<IpcClient> {
    let client = get_ipc_client(paths);

    if !client.is_daemon_running().await {
        anyhow::bail!("Daemon is not running. Start it with 'resolar-daemon start'");
    }

    Ok(client)
}

/// Call a method and convert the response to an outcome.
async fn call(client: &IpcClient, method: Method, params: Value) -> Result<Outcome> {
    let response = client.call_method_with_params(method, params).await?;
    Ok(outcome_from_response(response))
}
