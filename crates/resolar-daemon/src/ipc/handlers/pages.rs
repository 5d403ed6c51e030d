//! Page and highlight submission handlers.

use crate::app::DaemonState;
use crate::ipc::{parse_params, respond};
use resolar_dispatch::{Command, HighlightSubmission, PageSubmission};
use resolar_ipc::{IpcServer, Method};

pub async fn register(server: &IpcServer, state: DaemonState) {
    let dispatcher = state.dispatcher.clone();
    server
        .register_handler(Method::PagesSubmit, move |req| {
            let dispatcher = dispatcher.clone();
            async move {
                let page: PageSubmission = match parse_params(&req) {
                    Ok(page) => page,
                    Err(response) => return response,
                };
                respond(&req.id, dispatcher.execute(Command::SubmitData(page)).await)
            }
        })
        .await;

    let dispatcher = state.dispatcher;
    server
        .register_handler(Method::PagesSubmitHighlights, move |req| {
            let dispatcher = dispatcher.clone();
            async move {
                let highlights: HighlightSubmission = match parse_params(&req) {
                    Ok(highlights) => highlights,
                    Err(response) => return response,
                };
                respond(
                    &req.id,
                    dispatcher
                        .execute(Command::SubmitHighlightData(highlights))
                        .await,
                )
            }
        })
        .await;
}
