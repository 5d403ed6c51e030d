//! Configuration management.

use crate::{CoreError, CoreResult, Paths};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use url::Url;

/// Default API base URL (can be overridden at compile time via RESOLAR_API_BASE_URL env var).
pub const DEFAULT_API_BASE_URL: &str = match option_env!("RESOLAR_API_BASE_URL") {
    Some(url) => url,
    None => "http://localhost:8080/api",
};

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Keys used in [`Config::endpoint_success_statuses`].
pub mod endpoint_keys {
    pub const PAGES: &str = "pages";
    pub const PAGES_HIGHLIGHT: &str = "pages.highlight";
    pub const PAGES_HIGHLIGHT_LARGE: &str = "pages.highlight.large";
    pub const SUBJECTS_LIST: &str = "subjects.list";
    pub const SUBJECTS_CREATE: &str = "subjects.create";
}

/// Main configuration shared by the daemon and CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Base URL of the notes service, e.g. `https://example.com/api`.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// HTTP statuses that count as success, per endpoint key.
    /// Endpoints without an entry accept any 2xx status.
    #[serde(default = "default_endpoint_success_statuses")]
    pub endpoint_success_statuses: BTreeMap<String, Vec<u16>>,
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_endpoint_success_statuses() -> BTreeMap<String, Vec<u16>> {
    // The subjects endpoint answers 200 when the subject already exists.
    BTreeMap::from([(endpoint_keys::SUBJECTS_CREATE.to_string(), vec![200, 201])])
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            api_base_url: default_api_base_url(),
            endpoint_success_statuses: default_endpoint_success_statuses(),
        }
    }
}

impl Config {
    /// Load configuration from the config file, falling back to defaults.
    /// Environment variables take precedence over the file.
    pub fn load(paths: &Paths) -> CoreResult<Self> {
        let config_path = paths.config_file();

        let mut config = if config_path.exists() {
            Self::load_from_file(&config_path)?
        } else {
            Self::default()
        };

        config.load_from_env();
        config.api_base_url()?;

        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a file.
    pub fn save(&self, paths: &Paths) -> CoreResult<()> {
        paths.ensure_dirs()?;
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(paths.config_file(), content)?;
        Ok(())
    }

    fn load_from_env(&mut self) {
        if let Ok(log_level) = std::env::var("RESOLAR_LOG_LEVEL") {
            self.log_level = log_level;
        }
        if let Ok(url) = std::env::var("RESOLAR_API_BASE_URL") {
            if !url.trim().is_empty() {
                self.api_base_url = url.trim().to_string();
            }
        }
    }

    /// Get the API base URL as a parsed URL.
    pub fn api_base_url(&self) -> CoreResult<Url> {
        let url = Url::parse(&self.api_base_url)?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(CoreError::Config(format!(
                "api_base_url must use http or https, got {}",
                other
            ))),
        }
    }

    /// Absolute URL for a service path such as `/pages`.
    pub fn endpoint_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Whether `status` counts as success for the endpoint identified by `key`.
    pub fn is_success_status(&self, key: &str, status: u16) -> bool {
        match self.endpoint_success_statuses.get(key) {
            Some(statuses) => statuses.contains(&status),
            None => (200..300).contains(&status),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(
            config.endpoint_success_statuses[endpoint_keys::SUBJECTS_CREATE],
            vec![200, 201]
        );
    }

    #[test]
    fn test_config_load_from_file_fills_missing_fields() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.json");
        std::fs::write(&config_path, r#"{ "log_level": "debug" }"#).unwrap();

        let config = Config::load_from_file(&config_path).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert!(config
            .endpoint_success_statuses
            .contains_key(endpoint_keys::SUBJECTS_CREATE));
    }

    #[test]
    fn test_config_save_and_load_roundtrip() {
        let dir = tempdir().unwrap();
        let paths = Paths::with_base_dir(dir.path().to_path_buf());

        let mut config = Config::default();
        config.api_base_url = "https://notes.example.com/api".to_string();
        config
            .endpoint_success_statuses
            .insert(endpoint_keys::PAGES.to_string(), vec![201]);
        config.save(&paths).unwrap();

        let loaded = Config::load_from_file(&paths.config_file()).unwrap();
        assert_eq!(loaded.api_base_url, "https://notes.example.com/api");
        assert_eq!(loaded.endpoint_success_statuses[endpoint_keys::PAGES], vec![201]);
    }

    #[test]
    fn test_endpoint_url_joins_single_slash() {
        let mut config = Config::default();
        config.api_base_url = "https://notes.example.com/api/".to_string();
        assert_eq!(
            config.endpoint_url("/pages/highlight"),
            "https://notes.example.com/api/pages/highlight"
        );
        assert_eq!(
            config.endpoint_url("subjects"),
            "https://notes.example.com/api/subjects"
        );
    }

    #[test]
    fn test_success_status_defaults_to_2xx() {
        let config = Config::default();
        assert!(config.is_success_status(endpoint_keys::PAGES, 200));
        assert!(config.is_success_status(endpoint_keys::PAGES, 204));
        assert!(!config.is_success_status(endpoint_keys::PAGES, 302));
        assert!(!config.is_success_status(endpoint_keys::PAGES, 400));
    }

    #[test]
    fn test_success_status_uses_configured_set() {
        let config = Config::default();
        assert!(config.is_success_status(endpoint_keys::SUBJECTS_CREATE, 200));
        assert!(config.is_success_status(endpoint_keys::SUBJECTS_CREATE, 201));
        assert!(!config.is_success_status(endpoint_keys::SUBJECTS_CREATE, 204));
    }

    #[test]
    fn test_config_invalid_url() {
        let mut config = Config::default();
        config.api_base_url = "not a valid url".to_string();
        assert!(config.api_base_url().is_err());

        config.api_base_url = "ftp://example.com".to_string();
        assert!(matches!(config.api_base_url(), Err(CoreError::Config(_))));
    }
}
