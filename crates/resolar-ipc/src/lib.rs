//! IPC layer between the Resolar daemon and its clients.
//!
//! This crate provides:
//! - Unix domain socket server
//! - JSON-RPC-like protocol, one JSON object per line
//! - Client for one-shot calls

mod error;
mod protocol;
mod server;

pub use error::{IpcError, IpcResult};
pub use protocol::{error_codes, ErrorInfo, Method, Request, Response};
pub use server::{HandlerFn, IpcClient, IpcServer};
