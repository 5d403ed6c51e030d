//! Authentication error types.

use crate::TransportError;
use resolar_storage::StorageError;
use thiserror::Error;

/// Login failure.
#[derive(Error, Debug)]
pub enum AuthError {
    /// The service refused the credentials; carries its message.
    #[error("{0}")]
    Rejected(String),

    /// Successful status but no token in the body.
    #[error("응답에 accessToken이 없습니다.")]
    MissingToken,

    #[error("Invalid login response: {0}")]
    InvalidResponse(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Result type for login operations.
pub type AuthResult<T> = Result<T, AuthError>;

/// Failure of an authenticated request before a usable response was obtained.
#[derive(Error, Debug)]
pub enum MediationError {
    #[error("No access token found. Please log in.")]
    NoToken,

    /// Token expired and no stored username/password to log in again with.
    #[error("자동 재로그인을 위한 정보가 없습니다.")]
    NoCredentials,

    /// Token expired and logging in again failed. The session has been cleared.
    #[error("세션이 만료되었습니다. 다시 로그인해주세요.")]
    SessionExpired,

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl MediationError {
    /// Whether the user has to log in again before retrying.
    pub fn should_relogin(&self) -> bool {
        matches!(
            self,
            MediationError::NoToken | MediationError::NoCredentials | MediationError::SessionExpired
        )
    }
}
