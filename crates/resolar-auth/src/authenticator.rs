//! Username/password login against the notes service.

use crate::{ApiRequest, ApiResponse, AuthError, AuthResult, HttpTransport};
use resolar_storage::CredentialsManager;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

/// Shown when a rejected login carries no readable body.
pub const LOGIN_FAILED_MESSAGE: &str = "로그인에 실패했습니다.";

/// Exchanges username/password for an access token and persists the result.
pub struct Authenticator {
    transport: Arc<dyn HttpTransport>,
    credentials: Arc<CredentialsManager>,
    login_url: String,
}

impl Authenticator {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        credentials: Arc<CredentialsManager>,
        login_url: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            credentials,
            login_url: login_url.into(),
        }
    }

    /// Log in and store `{accessToken, username, password}` in one write.
    ///
    /// Nothing is written unless the service returns a token.
    pub async fn login(&self, username: &str, password: &str) -> AuthResult<()> {
        let request = ApiRequest::post_json(
            &self.login_url,
            json!({ "username": username, "password": password }),
        )
        .with_header("accept", "*/*");

        let response = self.transport.send(&request).await?;

        if !response.is_success() {
            warn!(status = response.status, username = %username, "Login rejected");
            return Err(AuthError::Rejected(rejection_message(&response)));
        }

        let body: serde_json::Value = serde_json::from_str(&response.body)
            .map_err(|e| AuthError::InvalidResponse(e.to_string()))?;
        let token = body
            .get("accessToken")
            .and_then(|t| t.as_str())
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::MissingToken)?;

        self.credentials.store_login(token, username, password)?;
        info!(username = %username, "Login successful");
        Ok(())
    }
}

fn rejection_message(response: &ApiResponse) -> String {
    match serde_json::from_str::<serde_json::Value>(&response.body) {
        Ok(body) => body
            .get("message")
            .and_then(|m| m.as_str())
            .filter(|m| !m.is_empty())
            .map(String::from)
            .unwrap_or_else(|| format!("HTTP error! status: {}", response.status)),
        Err(_) => LOGIN_FAILED_MESSAGE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedTransport;
    use crate::HttpMethod;
    use resolar_storage::{LocalStorage, MemoryStorage, StorageKeys};

    const LOGIN_URL: &str = "https://svc/api/auth/login";

    fn setup() -> (Arc<ScriptedTransport>, Arc<MemoryStorage>, Authenticator) {
        let transport = Arc::new(ScriptedTransport::new());
        let storage = Arc::new(MemoryStorage::new());
        let credentials = Arc::new(CredentialsManager::new(Box::new(storage.clone())));
        let authenticator = Authenticator::new(transport.clone(), credentials, LOGIN_URL);
        (transport, storage, authenticator)
    }

    #[tokio::test]
    async fn test_login_persists_token_and_secrets() {
        let (transport, storage, authenticator) = setup();
        transport.respond(200, r#"{"accessToken":"tok-1"}"#);

        authenticator.login("alice", "pw").await.unwrap();

        assert_eq!(storage.get(StorageKeys::ACCESS_TOKEN).unwrap().as_deref(), Some("tok-1"));
        assert_eq!(storage.get(StorageKeys::USERNAME).unwrap().as_deref(), Some("alice"));
        assert_eq!(storage.get(StorageKeys::PASSWORD).unwrap().as_deref(), Some("pw"));

        let sent = transport.requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].method, HttpMethod::Post);
        assert_eq!(sent[0].url, LOGIN_URL);
        assert_eq!(sent[0].header("Content-Type"), Some("application/json"));
        assert_eq!(sent[0].header("accept"), Some("*/*"));
        assert_eq!(
            sent[0].body,
            Some(json!({"username": "alice", "password": "pw"}))
        );
    }

    #[tokio::test]
    async fn test_login_without_token_writes_nothing() {
        let (transport, storage, authenticator) = setup();
        transport.respond(200, r#"{"user":"alice"}"#);

        let err = authenticator.login("alice", "pw").await.unwrap_err();

        assert!(matches!(err, AuthError::MissingToken));
        assert_eq!(err.to_string(), "응답에 accessToken이 없습니다.");
        for key in [StorageKeys::ACCESS_TOKEN, StorageKeys::USERNAME, StorageKeys::PASSWORD] {
            assert_eq!(storage.get(key).unwrap(), None);
        }
    }

    #[tokio::test]
    async fn test_login_rejection_uses_service_message() {
        let (transport, storage, authenticator) = setup();
        transport.respond(401, r#"{"message":"Invalid password"}"#);

        let err = authenticator.login("alice", "wrong").await.unwrap_err();

        assert!(matches!(err, AuthError::Rejected(ref m) if m == "Invalid password"));
        assert_eq!(storage.get(StorageKeys::ACCESS_TOKEN).unwrap(), None);
    }

    #[tokio::test]
    async fn test_login_rejection_fallback_messages() {
        let (transport, _, authenticator) = setup();
        transport.respond(500, "upstream exploded");
        transport.respond(403, r#"{"code":17}"#);

        let not_json = authenticator.login("alice", "pw").await.unwrap_err();
        assert_eq!(not_json.to_string(), LOGIN_FAILED_MESSAGE);

        let no_message = authenticator.login("alice", "pw").await.unwrap_err();
        assert_eq!(no_message.to_string(), "HTTP error! status: 403");
    }

    #[tokio::test]
    async fn test_login_rejection_ignores_empty_message() {
        let (transport, storage, authenticator) = setup();
        transport.respond(400, r#"{"message":""}"#);

        let err = authenticator.login("alice", "pw").await.unwrap_err();

        assert_eq!(err.to_string(), "HTTP error! status: 400");
        assert_eq!(storage.get(StorageKeys::ACCESS_TOKEN).unwrap(), None);
    }

    #[tokio::test]
    async fn test_login_transport_failure() {
        let (transport, _, authenticator) = setup();
        transport.fail("connection refused");

        let err = authenticator.login("alice", "pw").await.unwrap_err();
        assert!(matches!(err, AuthError::Transport(_)));
    }
}
