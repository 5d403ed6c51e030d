//! Highlighting toggle handler.

use crate::app::DaemonState;
use crate::ipc::{parse_params, respond};
use resolar_dispatch::{Command, HighlightToggle};
use resolar_ipc::{IpcServer, Method};

pub async fn register(server: &IpcServer, state: DaemonState) {
    let dispatcher = state.dispatcher;
    server
        .register_handler(Method::HighlightsToggle, move |req| {
            let dispatcher = dispatcher.clone();
            async move {
                let toggle: HighlightToggle = match parse_params(&req) {
                    Ok(toggle) => toggle,
                    Err(response) => return response,
                };
                respond(
                    &req.id,
                    dispatcher.execute(Command::ToggleHighlighting(toggle)).await,
                )
            }
        })
        .await;
}
