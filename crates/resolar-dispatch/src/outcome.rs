//! Uniform result shape returned for every command.

use crate::DispatchError;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// `{success, data?, error?, shouldRelogin?}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Outcome {
    pub success: bool,
    /// `Some(Value::Null)` is an empty service body; `None` means no data.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present_value"
    )]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub should_relogin: Option<bool>,
}

/// Keeps an explicit `null` as `Some(Value::Null)`.
fn present_value<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl Outcome {
    pub fn success(data: Option<Value>) -> Self {
        Self {
            success: true,
            data,
            error: None,
            should_relogin: None,
        }
    }

    pub fn failure(error: impl Into<String>, should_relogin: bool) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            should_relogin: should_relogin.then_some(true),
        }
    }

    pub fn should_relogin(&self) -> bool {
        self.should_relogin.unwrap_or(false)
    }
}

impl From<Result<Option<Value>, DispatchError>> for Outcome {
    fn from(result: Result<Option<Value>, DispatchError>) -> Self {
        match result {
            Ok(data) => Outcome::success(data),
            Err(e) => Outcome::failure(e.to_string(), e.should_relogin()),
        }
    }
}
