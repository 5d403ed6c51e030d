//! Typed access to the credential record and the state that depends on it.

use crate::{LocalStorage, StorageError, StorageKeys, StorageResult};
use std::fmt;
use tracing::debug;

/// Username and password kept for silent re-login.
#[derive(Clone, PartialEq, Eq)]
pub struct LoginSecrets {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for LoginSecrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginSecrets")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// High-level API over a [`LocalStorage`] backend.
///
/// The access token, username, and password are written together by
/// [`store_login`](Self::store_login) and removed together, along with every
/// cached value derived from the session, by
/// [`clear_session`](Self::clear_session).
pub struct CredentialsManager {
    storage: Box<dyn LocalStorage>,
}

impl CredentialsManager {
    /// Create a new credentials manager with the given storage backend
    pub fn new(storage: Box<dyn LocalStorage>) -> Self {
        Self { storage }
    }

    // ==========================================
    // Credential record
    // ==========================================

    /// Current bearer token, if any.
    pub fn access_token(&self) -> StorageResult<Option<String>> {
        Ok(non_empty(self.storage.get(StorageKeys::ACCESS_TOKEN)?))
    }

    /// Stored username, if any.
    pub fn username(&self) -> StorageResult<Option<String>> {
        Ok(non_empty(self.storage.get(StorageKeys::USERNAME)?))
    }

    /// Username and password, only when both are present.
    pub fn login_secrets(&self) -> StorageResult<Option<LoginSecrets>> {
        let mut values = self
            .storage
            .get_many(&[StorageKeys::USERNAME, StorageKeys::PASSWORD])?;
        let username = non_empty(values.remove(StorageKeys::USERNAME));
        let password = non_empty(values.remove(StorageKeys::PASSWORD));
        Ok(match (username, password) {
            (Some(username), Some(password)) => Some(LoginSecrets { username, password }),
            _ => None,
        })
    }

    /// Persist a fresh token together with the secrets that produced it.
    pub fn store_login(
        &self,
        access_token: &str,
        username: &str,
        password: &str,
    ) -> StorageResult<()> {
        if access_token.is_empty() {
            return Err(StorageError::Encoding(
                "refusing to store an empty access token".to_string(),
            ));
        }
        self.storage.set_items(&[
            (StorageKeys::ACCESS_TOKEN, access_token),
            (StorageKeys::USERNAME, username),
            (StorageKeys::PASSWORD, password),
        ])
    }

    /// Whether a token is stored.
    pub fn has_session(&self) -> StorageResult<bool> {
        Ok(self.access_token()?.is_some())
    }

    /// Remove the credential record and all state derived from it.
    pub fn clear_session(&self) -> StorageResult<()> {
        let highlight_keys = self
            .storage
            .list_keys_with_prefix(StorageKeys::HIGHLIGHT_ENABLED_PREFIX)?;

        let mut keys: Vec<&str> = StorageKeys::SESSION_KEYS.to_vec();
        keys.extend(highlight_keys.iter().map(String::as_str));

        self.storage.remove(&keys)?;
        debug!(keys = keys.len(), "Cleared session state");
        Ok(())
    }

    // ==========================================
    // Subject cache
    // ==========================================

    /// Last subject listing, as returned by the service.
    pub fn cached_subjects(&self) -> StorageResult<Option<serde_json::Value>> {
        match self.storage.get(StorageKeys::CACHED_SUBJECTS)? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| StorageError::Encoding(e.to_string())),
            None => Ok(None),
        }
    }

    pub fn set_cached_subjects(&self, subjects: &serde_json::Value) -> StorageResult<()> {
        let raw =
            serde_json::to_string(subjects).map_err(|e| StorageError::Encoding(e.to_string()))?;
        self.storage.set(StorageKeys::CACHED_SUBJECTS, &raw)
    }

    pub fn clear_cached_subjects(&self) -> StorageResult<()> {
        self.storage.remove(&[StorageKeys::CACHED_SUBJECTS])
    }

    pub fn last_selected_subject_id(&self) -> StorageResult<Option<i64>> {
        match self.storage.get(StorageKeys::LAST_SELECTED_SUBJECT_ID)? {
            Some(raw) => raw
                .parse::<i64>()
                .map(Some)
                .map_err(|e| StorageError::Encoding(format!("lastSelectedSubjectId: {}", e))),
            None => Ok(None),
        }
    }

    /// Remember the selected subject; `None` forgets it.
    pub fn set_last_selected_subject_id(&self, subject_id: Option<i64>) -> StorageResult<()> {
        match subject_id {
            Some(id) => self
                .storage
                .set(StorageKeys::LAST_SELECTED_SUBJECT_ID, &id.to_string()),
            None => self.storage.remove(&[StorageKeys::LAST_SELECTED_SUBJECT_ID]),
        }
    }

    // ==========================================
    // Highlighting flags
    // ==========================================

    pub fn highlighting_enabled(&self, page: &str) -> StorageResult<bool> {
        Ok(self
            .storage
            .get(&StorageKeys::highlight_enabled(page))?
            .is_some_and(|v| v == "true"))
    }

    pub fn set_highlighting_enabled(&self, page: &str, enabled: bool) -> StorageResult<()> {
        self.storage.set(
            &StorageKeys::highlight_enabled(page),
            if enabled { "true" } else { "false" },
        )
    }
}
