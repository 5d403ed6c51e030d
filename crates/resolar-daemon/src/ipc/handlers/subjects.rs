//! Subject listing, creation, and selection handlers.

use crate::app::DaemonState;
use crate::ipc::{parse_params, respond};
use resolar_dispatch::{Command, NewSubject, SubjectQuery, SubjectSelection};
use resolar_ipc::{IpcServer, Method};

pub async fn register(server: &IpcServer, state: DaemonState) {
    let dispatcher = state.dispatcher.clone();
    server
        .register_handler(Method::SubjectsList, move |req| {
            let dispatcher = dispatcher.clone();
            async move {
                let query: SubjectQuery = match parse_params(&req) {
                    Ok(query) => query,
                    Err(response) => return response,
                };
                respond(&req.id, dispatcher.execute(Command::GetSubjects(query)).await)
            }
        })
        .await;

    let dispatcher = state.dispatcher.clone();
    server
        .register_handler(Method::SubjectsAdd, move |req| {
            let dispatcher = dispatcher.clone();
            async move {
                let subject: NewSubject = match parse_params(&req) {
                    Ok(subject) => subject,
                    Err(response) => return response,
                };
                respond(&req.id, dispatcher.execute(Command::AddSubject(subject)).await)
            }
        })
        .await;

    let dispatcher = state.dispatcher;
    server
        .register_handler(Method::SubjectsSelect, move |req| {
            let dispatcher = dispatcher.clone();
            async move {
                let selection: SubjectSelection = match parse_params(&req) {
                    Ok(selection) => selection,
                    Err(response) => return response,
                };
                respond(
                    &req.id,
                    dispatcher.execute(Command::SelectSubject(selection)).await,
                )
            }
        })
        .await;
}
