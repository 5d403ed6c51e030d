//! Authentication for the Resolar daemon.
//!
//! - [`Authenticator`] logs in with username/password and stores the token.
//! - [`AuthenticatedClient`] sends requests with the stored token and
//!   recovers from one token expiry by logging in again.
//! - [`HttpTransport`] is the network seam; [`ReqwestTransport`] is the
//!   production implementation.

mod authenticator;
mod client;
mod error;
mod transport;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use authenticator::{Authenticator, LOGIN_FAILED_MESSAGE};
pub use client::AuthenticatedClient;
pub use error::{AuthError, AuthResult, MediationError};
pub use transport::{
    ApiRequest, ApiResponse, HttpMethod, HttpTransport, ReqwestTransport, TransportError,
    UNAUTHORIZED,
};
