//! OAuth token storage and management.
//!
//! The token file is the only persisted state in the program: one read at
//! startup, one write after a refresh or re-authorization. A file that
//! cannot be read or parsed is treated as absent, which sends the caller
//! through the interactive flow instead of crashing.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{GoogleError, GoogleResult};

/// Information about an OAuth token set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenInfo {
    /// The access token for API requests.
    pub access_token: String,

    /// The refresh token for obtaining new access tokens.
    pub refresh_token: Option<String>,

    /// When the access token expires.
    pub expires_at: Option<DateTime<Utc>>,

    /// The OAuth scopes that were granted.
    pub scopes: Vec<String>,

    /// When the tokens were last refreshed.
    pub last_refresh: DateTime<Utc>,
}

impl TokenInfo {
    /// Creates a new token info from OAuth response data.
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: Option<String>,
        expires_in_secs: Option<i64>,
        scopes: Vec<String>,
    ) -> Self {
        let expires_at = expires_in_secs.map(|secs| {
            // Subtract a buffer to refresh before actual expiry
            Utc::now() + Duration::seconds(secs) - Duration::seconds(60)
        });

        Self {
            access_token: access_token.into(),
            refresh_token,
            expires_at,
            scopes,
            last_refresh: Utc::now(),
        }
    }

    /// Returns true if the access token is expired or about to expire.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => Utc::now() >= expires_at,
            // If no expiry is set, assume it's valid (some tokens don't expire)
            None => false,
        }
    }

    /// Returns true if the token has the required scopes.
    pub fn has_scopes(&self, required: &[String]) -> bool {
        required.iter().all(|scope| self.scopes.contains(scope))
    }

    /// Updates the access token after a refresh.
    pub fn update_access_token(
        &mut self,
        access_token: impl Into<String>,
        expires_in_secs: Option<i64>,
    ) {
        self.access_token = access_token.into();
        self.expires_at = expires_in_secs
            .map(|secs| Utc::now() + Duration::seconds(secs) - Duration::seconds(60));
        self.last_refresh = Utc::now();
    }
}

/// File-backed token persistence.
///
/// Tokens are stored as JSON. Writes go to a temp file first and are
/// renamed into place, then restricted to owner-only permissions on Unix.
#[derive(Debug)]
pub struct TokenStorage {
    /// Path to the token file.
    path: PathBuf,
}

impl TokenStorage {
    /// Creates a new token storage at the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Loads tokens from disk.
    ///
    /// Returns `None` when no token file exists, and also when the file is
    /// unreadable or corrupt - a broken token file must trigger
    /// re-authorization, never a failure.
    pub fn load(&self) -> Option<TokenInfo> {
        if !self.path.exists() {
            debug!("no token file at {:?}", self.path);
            return None;
        }

        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                warn!("failed to read token file {:?}: {}", self.path, e);
                return None;
            }
        };

        match serde_json::from_str(&content) {
            Ok(tokens) => {
                debug!("loaded tokens from {:?}", self.path);
                Some(tokens)
            }
            Err(e) => {
                warn!(
                    "token file {:?} is corrupt, ignoring it: {}",
                    self.path, e
                );
                None
            }
        }
    }

    /// Saves the given tokens to disk.
    pub fn save(&self, tokens: &TokenInfo) -> GoogleResult<()> {
        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                GoogleError::configuration(format!("failed to create token directory: {}", e))
            })?;
        }

        // Write to temp file first, then rename for atomicity
        let temp_path = self.path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(tokens)
            .map_err(|e| GoogleError::internal(format!("failed to serialize tokens: {}", e)))?;

        fs::write(&temp_path, &content).map_err(|e| {
            GoogleError::configuration(format!("failed to write token file: {}", e))
        })?;

        fs::rename(&temp_path, &self.path).map_err(|e| {
            GoogleError::configuration(format!("failed to rename token file: {}", e))
        })?;

        // Owner-only-readable; the intent, not enforced beyond this
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = fs::Permissions::from_mode(0o600);
            let _ = fs::set_permissions(&self.path, perms);
        }

        debug!("saved tokens to {:?}", self.path);
        Ok(())
    }

    /// Returns the token storage path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::atomic::{AtomicU64, Ordering};

    static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

    fn temp_path() -> PathBuf {
        let counter = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        let mut path = env::temp_dir();
        path.push(format!(
            "quickcal-test-tokens-{}-{}.json",
            std::process::id(),
            counter
        ));
        path
    }

    #[test]
    fn token_info_creation() {
        let token = TokenInfo::new(
            "access-token",
            Some("refresh-token".to_string()),
            Some(3600),
            vec!["scope1".to_string()],
        );

        assert_eq!(token.access_token, "access-token");
        assert_eq!(token.refresh_token, Some("refresh-token".to_string()));
        assert!(token.expires_at.is_some());
        assert!(!token.is_expired());
    }

    #[test]
    fn token_info_expired() {
        let mut token = TokenInfo::new("access", None, Some(3600), vec![]);
        // Force expiry in the past
        token.expires_at = Some(Utc::now() - Duration::hours(1));
        assert!(token.is_expired());
    }

    #[test]
    fn token_info_without_expiry_is_valid() {
        let token = TokenInfo::new("access", None, None, vec![]);
        assert!(!token.is_expired());
    }

    #[test]
    fn token_info_scope_check() {
        let token = TokenInfo::new(
            "access",
            None,
            None,
            vec!["scope1".to_string(), "scope2".to_string()],
        );

        assert!(token.has_scopes(&["scope1".to_string()]));
        assert!(token.has_scopes(&["scope1".to_string(), "scope2".to_string()]));
        assert!(!token.has_scopes(&["scope3".to_string()]));
    }

    #[test]
    fn token_info_refresh_updates_access_token() {
        let mut token = TokenInfo::new("old", Some("refresh".to_string()), Some(3600), vec![]);
        token.expires_at = Some(Utc::now() - Duration::hours(1));
        assert!(token.is_expired());

        token.update_access_token("new", Some(3600));
        assert_eq!(token.access_token, "new");
        assert!(!token.is_expired());
        assert_eq!(token.refresh_token, Some("refresh".to_string()));
    }

    #[test]
    fn storage_save_and_load() {
        let path = temp_path();
        let storage = TokenStorage::new(path.clone());

        let token = TokenInfo::new(
            "access-token",
            Some("refresh-token".to_string()),
            Some(3600),
            vec!["scope1".to_string()],
        );

        storage.save(&token).unwrap();
        assert!(path.exists());

        let loaded = TokenStorage::new(path.clone()).load().unwrap();
        assert_eq!(loaded.access_token, "access-token");
        assert_eq!(loaded.refresh_token, Some("refresh-token".to_string()));

        // Cleanup
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn storage_no_file() {
        let storage = TokenStorage::new(temp_path());
        assert!(storage.load().is_none());
    }

    #[test]
    fn storage_corrupt_file_treated_as_absent() {
        let path = temp_path();
        fs::write(&path, "{ not valid json").unwrap();

        let storage = TokenStorage::new(path.clone());
        assert!(storage.load().is_none());

        // Cleanup
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn storage_wrong_shape_treated_as_absent() {
        let path = temp_path();
        fs::write(&path, r#"{"unexpected": "shape"}"#).unwrap();

        let storage = TokenStorage::new(path.clone());
        assert!(storage.load().is_none());

        // Cleanup
        let _ = fs::remove_file(&path);
    }

    #[cfg(unix)]
    #[test]
    fn storage_restricts_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let path = temp_path();
        let storage = TokenStorage::new(path.clone());
        storage
            .save(&TokenInfo::new("access", None, None, vec![]))
            .unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);

        // Cleanup
        let _ = fs::remove_file(&path);
    }
}
