//! IPC protocol definitions.
//!
//! Uses a JSON-RPC-like protocol over Unix domain sockets.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// IPC method types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    // Daemon
    Health,
    Shutdown,

    // Authentication
    #[serde(rename = "auth.login")]
    AuthLogin,
    #[serde(rename = "auth.logout")]
    AuthLogout,
    #[serde(rename = "auth.status")]
    AuthStatus,

    // Page capture
    #[serde(rename = "pages.submit")]
    PagesSubmit,
    #[serde(rename = "pages.submit_highlights")]
    PagesSubmitHighlights,

    // Subjects
    #[serde(rename = "subjects.list")]
    SubjectsList,
    #[serde(rename = "subjects.add")]
    SubjectsAdd,
    #[serde(rename = "subjects.select")]
    SubjectsSelect,

    // Highlighting
    #[serde(rename = "highlights.toggle")]
    HighlightsToggle,
}

/// IPC request message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    /// Request ID for correlation.
    pub id: String,
    pub method: Method,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<serde_json::Value>,
}

impl Request {
    /// Create a new request with auto-generated ID.
    pub fn new(method: Method) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            method,
            params: None,
        }
    }

    pub fn with_params(method: Method, params: serde_json::Value) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            method,
            params: Some(params),
        }
    }

    /// Deserialize the params into a typed payload. Missing params are
    /// treated as an empty object.
    pub fn params_as<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        match &self.params {
            Some(params) => T::deserialize(params),
            None => serde_json::from_value(serde_json::json!({})),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// IPC response message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    /// Request ID for correlation.
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

/// Error information in a response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl ErrorInfo {
    /// Whether the daemon asked the client to log in again.
    pub fn should_relogin(&self) -> bool {
        self.data
            .as_ref()
            .and_then(|d| d.get("shouldRelogin"))
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }
}

impl Response {
    pub fn success(id: &str, result: serde_json::Value) -> Self {
        Self {
            id: id.to_string(),
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: &str, code: i32, message: &str) -> Self {
        Self {
            id: id.to_string(),
            result: None,
            error: Some(ErrorInfo {
                code,
                message: message.to_string(),
                data: None,
            }),
        }
    }

    pub fn error_with_data(id: &str, code: i32, message: &str, data: serde_json::Value) -> Self {
        Self {
            id: id.to_string(),
            result: None,
            error: Some(ErrorInfo {
                code,
                message: message.to_string(),
                data: Some(data),
            }),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

// Standard error codes
pub mod error_codes {
    pub const PARSE_ERROR: i32 = -32700;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;
    pub const NOT_AUTHENTICATED: i32 = -32001;
    /// The notes service answered with a non-success status.
    pub const HTTP_ERROR: i32 = -32004;
    /// Page content or highlights were missing or empty.
    pub const CONTENT_UNAVAILABLE: i32 = -32005;
}
