//! IPC handler wiring.

pub mod handlers;
mod register;
mod respond;

pub use register::register_handlers;
pub use respond::{parse_params, respond};
