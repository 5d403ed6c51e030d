//! Storage key constants.
//!
//! Names match the ones the browser extension kept in local storage so an
//! exported storage file stays readable by both.

/// Storage keys used by the daemon
pub struct StorageKeys;

impl StorageKeys {
    /// Bearer token for authenticated calls
    pub const ACCESS_TOKEN: &'static str = "accessToken";

    /// Username retained for silent re-login
    pub const USERNAME: &'static str = "username";

    /// Password retained for silent re-login
    pub const PASSWORD: &'static str = "password";

    /// Last subject listing (JSON array)
    pub const CACHED_SUBJECTS: &'static str = "cachedSubjects";

    /// Subject the user picked most recently
    pub const LAST_SELECTED_SUBJECT_ID: &'static str = "lastSelectedSubjectId";

    /// Prefix for per-page highlighting flags
    pub const HIGHLIGHT_ENABLED_PREFIX: &'static str = "highlight-enabled-";

    /// Every fixed key that belongs to an authenticated session.
    pub const SESSION_KEYS: [&'static str; 5] = [
        Self::ACCESS_TOKEN,
        Self::USERNAME,
        Self::PASSWORD,
        Self::CACHED_SUBJECTS,
        Self::LAST_SELECTED_SUBJECT_ID,
    ];

    /// Key holding the highlighting flag for one page.
    pub fn highlight_enabled(page: &str) -> String {
        format!("{}{}", Self::HIGHLIGHT_ENABLED_PREFIX, page)
    }
}
