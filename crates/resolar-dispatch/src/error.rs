//! Dispatch error types.

use resolar_auth::{AuthError, MediationError, TransportError};
use resolar_storage::StorageError;
use thiserror::Error;

/// Message for a page whose text could not be read.
pub const PAGE_CONTENT_UNAVAILABLE: &str = "페이지 내용을 가져올 수 없습니다.";

/// Message for a highlight submission with nothing selected.
pub const NO_HIGHLIGHTS_SELECTED: &str = "선택된 하이라이트가 없습니다.";

/// Why a command did not succeed.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("No access token found. Please log in.")]
    NoToken,

    #[error("자동 재로그인을 위한 정보가 없습니다.")]
    NoCredentials,

    #[error("세션이 만료되었습니다. 다시 로그인해주세요.")]
    SessionExpired,

    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The service answered with a status outside the endpoint's success set.
    #[error("{message}")]
    Http { status: u16, message: String },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Page text or highlights were missing.
    #[error("{0}")]
    ContentUnavailable(String),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Invalid parameters: {0}")]
    InvalidParams(String),
}

impl DispatchError {
    /// Whether the client must return to the logged-out state.
    pub fn should_relogin(&self) -> bool {
        matches!(
            self,
            DispatchError::NoToken | DispatchError::NoCredentials | DispatchError::SessionExpired
        )
    }
}

impl From<MediationError> for DispatchError {
    fn from(err: MediationError) -> Self {
        match err {
            MediationError::NoToken => DispatchError::NoToken,
            MediationError::NoCredentials => DispatchError::NoCredentials,
            MediationError::SessionExpired => DispatchError::SessionExpired,
            MediationError::Storage(e) => DispatchError::Storage(e),
            MediationError::Transport(e) => DispatchError::Transport(e),
        }
    }
}
