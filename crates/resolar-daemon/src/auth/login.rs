//! Authentication login handler.

use crate::app::DaemonState;
use crate::ipc::{parse_params, respond};
use resolar_dispatch::{Command, LoginParams};
use resolar_ipc::{error_codes, IpcServer, Method, Response};
use tracing::info;

/// Register the auth login handler.
pub async fn register(server: &IpcServer, state: DaemonState) {
    let dispatcher = state.dispatcher;
    server
        .register_handler(Method::AuthLogin, move |req| {
            let dispatcher = dispatcher.clone();
            async move {
                let params: LoginParams = match parse_params(&req) {
                    Ok(params) => params,
                    Err(response) => return response,
                };
                if params.username.is_empty() || params.password.is_empty() {
                    return Response::error(
                        &req.id,
                        error_codes::INVALID_PARAMS,
                        "username and password are required",
                    );
                }

                let username = params.username.clone();
                let response = respond(&req.id, dispatcher.execute(Command::Login(params)).await);
                if response.is_success() {
                    info!(username = %username, "Login via IPC succeeded");
                }
                response
            }
        })
        .await;
}
