//! Scripted transport for tests.

use crate::{ApiRequest, ApiResponse, HttpTransport, TransportError};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;

/// Answers requests from a queue in order and records every request sent.
/// An exhausted queue answers with `TransportError::Unavailable`.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<ApiResponse, String>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response.
    pub fn respond(&self, status: u16, body: &str) {
        self.responses
            .lock()
            .push_back(Ok(ApiResponse::new(status, body)));
    }

    /// Queue a transport failure.
    pub fn fail(&self, reason: &str) {
        self.responses.lock().push_back(Err(reason.to_string()));
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        self.requests.lock().push(request.clone());
        match self.responses.lock().pop_front() {
            Some(Ok(response)) => Ok(response),
            Some(Err(reason)) => Err(TransportError::Unavailable(reason)),
            None => Err(TransportError::Unavailable(format!(
                "no scripted response for {}",
                request.url
            ))),
        }
    }
}
