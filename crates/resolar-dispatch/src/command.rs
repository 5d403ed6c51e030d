//! Typed commands and their payloads.

use resolar_config_and_utils::endpoint_keys;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// A request from a client, tagged by `action`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Command {
    Login(LoginParams),
    Logout,
    AuthStatus,
    SubmitData(PageSubmission),
    SubmitHighlightData(HighlightSubmission),
    GetSubjects(SubjectQuery),
    AddSubject(NewSubject),
    SelectSubject(SubjectSelection),
    ToggleHighlighting(HighlightToggle),
}

impl Command {
    /// The wire name of the action, for logging.
    pub fn action(&self) -> &'static str {
        match self {
            Command::Login(_) => "login",
            Command::Logout => "logout",
            Command::AuthStatus => "authStatus",
            Command::SubmitData(_) => "submitData",
            Command::SubmitHighlightData(_) => "submitHighlightData",
            Command::GetSubjects(_) => "getSubjects",
            Command::AddSubject(_) => "addSubject",
            Command::SelectSubject(_) => "selectSubject",
            Command::ToggleHighlighting(_) => "toggleHighlighting",
        }
    }
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginParams {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for LoginParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginParams")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Sub-resource of `/pages` a submission goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageEndpoint {
    #[serde(rename = "pages")]
    Pages,
    #[serde(rename = "highlight")]
    Highlight,
    #[serde(rename = "highlight/large")]
    HighlightLarge,
}

impl PageEndpoint {
    pub fn path(self) -> &'static str {
        match self {
            PageEndpoint::Pages => "/pages",
            PageEndpoint::Highlight => "/pages/highlight",
            PageEndpoint::HighlightLarge => "/pages/highlight/large",
        }
    }

    /// Key into the configured success statuses.
    pub fn status_key(self) -> &'static str {
        match self {
            PageEndpoint::Pages => endpoint_keys::PAGES,
            PageEndpoint::Highlight => endpoint_keys::PAGES_HIGHLIGHT,
            PageEndpoint::HighlightLarge => endpoint_keys::PAGES_HIGHLIGHT_LARGE,
        }
    }
}

/// Full page text captured from a tab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSubmission {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_endpoint: Option<PageEndpoint>,
    /// Caller-supplied fields passed to the service untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PageSubmission {
    pub fn endpoint(&self) -> PageEndpoint {
        self.api_endpoint.unwrap_or(PageEndpoint::Pages)
    }

    pub fn has_content(&self) -> bool {
        !self.content.trim().is_empty()
    }

    /// JSON body for the service, without the routing field.
    pub fn service_body(&self) -> Value {
        service_body(self)
    }
}

/// Highlights the user selected on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightSubmission {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_endpoint: Option<PageEndpoint>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl HighlightSubmission {
    pub fn endpoint(&self) -> PageEndpoint {
        self.api_endpoint.unwrap_or(PageEndpoint::Highlight)
    }

    pub fn has_highlights(&self) -> bool {
        self.highlights.iter().any(|h| !h.trim().is_empty())
    }

    pub fn service_body(&self) -> Value {
        service_body(self)
    }
}

fn service_body<T: Serialize>(payload: &T) -> Value {
    let mut body = serde_json::to_value(payload).unwrap_or(Value::Null);
    if let Value::Object(map) = &mut body {
        map.remove("apiEndpoint");
    }
    body
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectQuery {
    /// Answer from the cached listing when one exists.
    #[serde(default)]
    pub prefer_cache: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSubject {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectSelection {
    /// `None` clears the selection.
    #[serde(default)]
    pub subject_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightToggle {
    pub page: String,
    pub enabled: bool,
}

/// A subject as listed by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: i64,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_command_tagging() {
        let command: Command = serde_json::from_value(json!({
            "action": "login",
            "username": "alice",
            "password": "pw"
        }))
        .unwrap();
        assert_eq!(
            command,
            Command::Login(LoginParams {
                username: "alice".into(),
                password: "pw".into()
            })
        );

        let logout: Command = serde_json::from_value(json!({"action": "logout"})).unwrap();
        assert_eq!(logout, Command::Logout);

        let subjects: Command = serde_json::from_value(json!({"action": "getSubjects"})).unwrap();
        assert_eq!(subjects, Command::GetSubjects(SubjectQuery::default()));
        assert_eq!(subjects.action(), "getSubjects");

        assert!(serde_json::from_value::<Command>(json!({"action": "screenshot"})).is_err());
    }

    #[test]
    fn test_page_submission_keeps_extra_fields() {
        let command: Command = serde_json::from_value(json!({
            "action": "submitData",
            "url": "https://example.com",
            "content": "hello",
            "subjectId": 3,
            "apiEndpoint": "highlight/large",
            "lang": "ko"
        }))
        .unwrap();

        let Command::SubmitData(page) = command else {
            panic!("expected submitData");
        };
        assert_eq!(page.endpoint(), PageEndpoint::HighlightLarge);
        assert_eq!(page.subject_id, Some(3));
        assert_eq!(page.extra.get("lang"), Some(&json!("ko")));
        assert!(!page.extra.contains_key("action"));

        let body = page.service_body();
        assert_eq!(body["lang"], "ko");
        assert_eq!(body["subjectId"], 3);
        assert!(body.get("apiEndpoint").is_none());
    }

    #[test]
    fn test_default_endpoints() {
        let page: PageSubmission =
            serde_json::from_value(json!({"url": "u", "content": "c"})).unwrap();
        assert_eq!(page.endpoint(), PageEndpoint::Pages);
        assert_eq!(page.endpoint().path(), "/pages");

        let highlights: HighlightSubmission =
            serde_json::from_value(json!({"url": "u", "highlights": ["a"]})).unwrap();
        assert_eq!(highlights.endpoint(), PageEndpoint::Highlight);
        assert_eq!(highlights.endpoint().status_key(), endpoint_keys::PAGES_HIGHLIGHT);
    }

    #[test]
    fn test_content_checks() {
        let blank: PageSubmission =
            serde_json::from_value(json!({"url": "u", "content": "  \n"})).unwrap();
        assert!(!blank.has_content());

        let empty_highlights: HighlightSubmission =
            serde_json::from_value(json!({"url": "u", "highlights": ["", " "]})).unwrap();
        assert!(!empty_highlights.has_highlights());
    }

    #[test]
    fn test_login_params_debug_redacts_password() {
        let params = LoginParams {
            username: "alice".into(),
            password: "hunter2".into(),
        };
        assert!(!format!("{:?}", params).contains("hunter2"));
    }
}
