//! Authenticated requests with one silent re-login on token expiry.

use crate::{ApiRequest, ApiResponse, Authenticator, HttpTransport, MediationError, UNAUTHORIZED};
use resolar_storage::CredentialsManager;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Attaches the stored bearer token to requests.
///
/// When the service answers 401 the client logs in again with the stored
/// username/password and retries the request once. A 401 on the retry is
/// handed back to the caller unchanged.
#[derive(Clone)]
pub struct AuthenticatedClient {
    transport: Arc<dyn HttpTransport>,
    credentials: Arc<CredentialsManager>,
    authenticator: Arc<Authenticator>,
}

impl AuthenticatedClient {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        credentials: Arc<CredentialsManager>,
        authenticator: Arc<Authenticator>,
    ) -> Self {
        Self {
            transport,
            credentials,
            authenticator,
        }
    }

    pub fn credentials(&self) -> &Arc<CredentialsManager> {
        &self.credentials
    }

    pub fn authenticator(&self) -> &Arc<Authenticator> {
        &self.authenticator
    }

    pub async fn request(&self, request: &ApiRequest) -> Result<ApiResponse, MediationError> {
        let mut retried = false;

        loop {
            let token = self
                .credentials
                .access_token()?
                .ok_or(MediationError::NoToken)?;

            let response = self.transport.send(&request.with_bearer(&token)).await?;

            if response.status != UNAUTHORIZED || retried {
                debug!(url = %request.url, status = response.status, retried, "Request completed");
                return Ok(response);
            }

            let secrets = self
                .credentials
                .login_secrets()?
                .ok_or(MediationError::NoCredentials)?;

            info!(url = %request.url, "Access token rejected, logging in again");
            if let Err(e) = self
                .authenticator
                .login(&secrets.username, &secrets.password)
                .await
            {
                warn!(error = %e, "Re-authentication failed, clearing session");
                self.credentials.clear_session()?;
                return Err(MediationError::SessionExpired);
            }

            retried = true;
        }
    }
}
