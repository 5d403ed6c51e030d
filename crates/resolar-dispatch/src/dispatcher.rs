//! Routes commands to the notes service and classifies the responses.

use crate::{
    Command, DispatchError, HighlightSubmission, HighlightToggle, NewSubject, Outcome,
    PageSubmission, SubjectQuery, NO_HIGHLIGHTS_SELECTED, PAGE_CONTENT_UNAVAILABLE,
};
use resolar_auth::{
    ApiRequest, ApiResponse, AuthenticatedClient, Authenticator, HttpTransport, UNAUTHORIZED,
};
use resolar_config_and_utils::{endpoint_keys, Config};
use resolar_storage::CredentialsManager;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub type DispatchResult = Result<Option<Value>, DispatchError>;

/// Executes [`Command`]s on behalf of clients.
#[derive(Clone)]
pub struct CommandDispatcher {
    client: AuthenticatedClient,
    config: Arc<Config>,
}

impl CommandDispatcher {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        credentials: Arc<CredentialsManager>,
        config: Arc<Config>,
    ) -> Self {
        let authenticator = Arc::new(Authenticator::new(
            transport.clone(),
            credentials.clone(),
            config.endpoint_url("/auth/login"),
        ));
        let client = AuthenticatedClient::new(transport, credentials, authenticator);
        Self { client, config }
    }

    pub fn credentials(&self) -> &Arc<CredentialsManager> {
        self.client.credentials()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run a command and shape the result as an [`Outcome`].
    pub async fn dispatch(&self, command: Command) -> Outcome {
        self.execute(command).await.into()
    }

    /// Run a command, returning the success data or the typed failure.
    ///
    /// Any failure that requires a new login also wipes the stored session.
    pub async fn execute(&self, command: Command) -> DispatchResult {
        let action = command.action();
        debug!(action, "Dispatching command");

        let result = match command {
            Command::Login(params) => self.login(&params.username, &params.password).await,
            Command::Logout => self.logout(),
            Command::AuthStatus => self.auth_status(),
            Command::SubmitData(page) => self.submit_page(page).await,
            Command::SubmitHighlightData(highlights) => self.submit_highlights(highlights).await,
            Command::GetSubjects(query) => self.get_subjects(query).await,
            Command::AddSubject(subject) => self.add_subject(subject).await,
            Command::SelectSubject(selection) => self.select_subject(selection.subject_id),
            Command::ToggleHighlighting(toggle) => self.toggle_highlighting(toggle),
        };

        if let Err(e) = &result {
            if e.should_relogin() {
                if let Err(clear_err) = self.credentials().clear_session() {
                    warn!(error = %clear_err, "Failed to clear session");
                }
            }
            warn!(action, error = %e, relogin = e.should_relogin(), "Command failed");
        }

        result
    }

    async fn login(&self, username: &str, password: &str) -> DispatchResult {
        self.client.authenticator().login(username, password).await?;
        Ok(None)
    }

    fn logout(&self) -> DispatchResult {
        self.credentials().clear_session()?;
        info!("Logged out");
        Ok(None)
    }

    fn auth_status(&self) -> DispatchResult {
        let credentials = self.credentials();
        Ok(Some(json!({
            "loggedIn": credentials.has_session()?,
            "username": credentials.username()?,
        })))
    }

    async fn submit_page(&self, page: PageSubmission) -> DispatchResult {
        if !page.has_content() {
            return Err(DispatchError::ContentUnavailable(
                PAGE_CONTENT_UNAVAILABLE.to_string(),
            ));
        }
        let endpoint = page.endpoint();
        let request =
            ApiRequest::post_json(self.config.endpoint_url(endpoint.path()), page.service_body());
        let data = self.send(&request, endpoint.status_key()).await?;
        info!(url = %page.url, endpoint = endpoint.path(), "Page submitted");
        Ok(Some(data))
    }

    async fn submit_highlights(&self, highlights: HighlightSubmission) -> DispatchResult {
        if !highlights.has_highlights() {
            return Err(DispatchError::ContentUnavailable(
                NO_HIGHLIGHTS_SELECTED.to_string(),
            ));
        }
        let endpoint = highlights.endpoint();
        let request = ApiRequest::post_json(
            self.config.endpoint_url(endpoint.path()),
            highlights.service_body(),
        );
        let data = self.send(&request, endpoint.status_key()).await?;
        info!(
            url = %highlights.url,
            count = highlights.highlights.len(),
            "Highlights submitted"
        );
        Ok(Some(data))
    }

    async fn get_subjects(&self, query: SubjectQuery) -> DispatchResult {
        if query.prefer_cache {
            if let Some(cached) = self.credentials().cached_subjects()? {
                debug!("Answering subjects from cache");
                return Ok(Some(cached));
            }
        }

        let request = ApiRequest::get(self.config.endpoint_url("/subjects"));
        let subjects = self.send(&request, endpoint_keys::SUBJECTS_LIST).await?;
        if subjects.is_array() {
            self.credentials().set_cached_subjects(&subjects)?;
        }
        Ok(Some(subjects))
    }

    async fn add_subject(&self, subject: NewSubject) -> DispatchResult {
        let name = subject.name.trim();
        if name.is_empty() {
            return Err(DispatchError::InvalidParams(
                "subject name is required".to_string(),
            ));
        }

        let request =
            ApiRequest::post_json(self.config.endpoint_url("/subjects"), json!({ "name": name }));
        let created = self.send(&request, endpoint_keys::SUBJECTS_CREATE).await?;
        self.credentials().clear_cached_subjects()?;
        info!(name = %name, "Subject added");
        Ok(Some(created))
    }

    fn select_subject(&self, subject_id: Option<i64>) -> DispatchResult {
        self.credentials().set_last_selected_subject_id(subject_id)?;
        Ok(Some(json!({ "subjectId": subject_id })))
    }

    fn toggle_highlighting(&self, toggle: HighlightToggle) -> DispatchResult {
        if toggle.page.trim().is_empty() {
            return Err(DispatchError::InvalidParams("page is required".to_string()));
        }
        self.credentials()
            .set_highlighting_enabled(&toggle.page, toggle.enabled)?;
        Ok(Some(json!({ "page": toggle.page, "enabled": toggle.enabled })))
    }

    async fn send(&self, request: &ApiRequest, status_key: &str) -> Result<Value, DispatchError> {
        let response = self.client.request(request).await?;
        classify(&self.config, status_key, &response)
    }
}

/// Turn a raw service response into success data or an error.
///
/// Unreadable success bodies become `null`. A 401 reaching this point has
/// already survived one re-login, so the session is treated as expired.
pub fn classify(
    config: &Config,
    status_key: &str,
    response: &ApiResponse,
) -> Result<Value, DispatchError> {
    if config.is_success_status(status_key, response.status) {
        return Ok(response.json().unwrap_or(Value::Null));
    }
    if response.status == UNAUTHORIZED {
        return Err(DispatchError::SessionExpired);
    }
    let message = response
        .message()
        .unwrap_or_else(|| format!("HTTP {}", response.status));
    Err(DispatchError::Http {
        status: response.status,
        message,
    })
}
