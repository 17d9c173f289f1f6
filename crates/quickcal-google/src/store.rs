//! Credential acquisition.
//!
//! [`CredentialStore`] decides how to produce a usable token: reuse the
//! stored one, refresh it, or go interactive. The decision itself is a pure
//! step ([`plan`]) over the stored token; the store then executes it and
//! persists any change. The acquired [`TokenInfo`] is returned by value and
//! threaded into the gateway by the caller - nothing process-wide holds it.

use tracing::{debug, info};

use crate::credentials::GoogleConfig;
use crate::error::GoogleResult;
use crate::oauth::OAuthClient;
use crate::tokens::{TokenInfo, TokenStorage};

/// The action `acquire` will take for a given stored token.
#[derive(Debug)]
enum AuthPlan {
    /// The stored token is usable as-is.
    UseStored(TokenInfo),
    /// The stored token is expired but refreshable.
    Refresh(TokenInfo, String),
    /// No usable token; run the interactive flow.
    Interactive,
}

/// Decides what to do with the stored token, if any.
///
/// Interactive is the fallback for: no token, missing scopes (the granted
/// set no longer covers what we request), or expired with no refresh token.
fn plan(stored: Option<TokenInfo>, required_scopes: &[String]) -> AuthPlan {
    let Some(tokens) = stored else {
        return AuthPlan::Interactive;
    };

    if !tokens.has_scopes(required_scopes) {
        info!("stored token is missing required scopes, re-authorizing");
        return AuthPlan::Interactive;
    }

    if !tokens.is_expired() {
        return AuthPlan::UseStored(tokens);
    }

    match tokens.refresh_token.clone() {
        Some(refresh_token) => AuthPlan::Refresh(tokens, refresh_token),
        None => AuthPlan::Interactive,
    }
}

/// Owns token persistence and the OAuth client, and produces credentials.
#[derive(Debug)]
pub struct CredentialStore {
    config: GoogleConfig,
    storage: TokenStorage,
    oauth: OAuthClient,
}

impl CredentialStore {
    /// Creates a credential store for the given configuration.
    pub fn new(config: GoogleConfig) -> GoogleResult<Self> {
        config.validate()?;

        let storage = TokenStorage::new(&config.token_path);
        let oauth = OAuthClient::new(config.credentials.clone(), config.timeout);

        Ok(Self {
            config,
            storage,
            oauth,
        })
    }

    /// Returns a usable credential, going interactive only when it must.
    ///
    /// A valid stored token is returned without any network traffic; an
    /// expired-but-refreshable one costs a single refresh request. Both
    /// paths leave the user alone. Every change is persisted before
    /// returning.
    pub async fn acquire(&self) -> GoogleResult<TokenInfo> {
        match plan(self.storage.load(), &self.config.scopes) {
            AuthPlan::UseStored(tokens) => {
                debug!("stored access token is still valid");
                Ok(tokens)
            }
            AuthPlan::Refresh(tokens, refresh_token) => {
                debug!("stored access token expired, refreshing");
                self.refresh(tokens, &refresh_token).await
            }
            AuthPlan::Interactive => self.authorize_interactive().await,
        }
    }

    /// Refreshes the access token and persists the result.
    async fn refresh(&self, mut tokens: TokenInfo, refresh_token: &str) -> GoogleResult<TokenInfo> {
        let (access_token, expires_in) = self.oauth.refresh_token(refresh_token).await?;
        tokens.update_access_token(access_token, expires_in);
        self.storage.save(&tokens)?;
        Ok(tokens)
    }

    /// Runs the interactive consent flow and persists the result.
    async fn authorize_interactive(&self) -> GoogleResult<TokenInfo> {
        let tokens = self
            .oauth
            .authorize(&self.config.scopes, self.config.loopback_port_range)
            .await?;
        self.storage.save(&tokens)?;
        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn scope() -> Vec<String> {
        vec![GoogleConfig::DEFAULT_SCOPE.to_string()]
    }

    fn valid_token() -> TokenInfo {
        TokenInfo::new("access", Some("refresh".to_string()), Some(3600), scope())
    }

    fn expired_token(refresh: Option<&str>) -> TokenInfo {
        let mut tokens = TokenInfo::new("access", refresh.map(String::from), Some(3600), scope());
        tokens.expires_at = Some(Utc::now() - Duration::hours(1));
        tokens
    }

    #[test]
    fn valid_token_is_used_without_prompting() {
        match plan(Some(valid_token()), &scope()) {
            AuthPlan::UseStored(tokens) => assert_eq!(tokens.access_token, "access"),
            other => panic!("expected UseStored, got {:?}", other),
        }
    }

    #[test]
    fn expired_token_with_refresh_token_plans_refresh() {
        match plan(Some(expired_token(Some("refresh"))), &scope()) {
            AuthPlan::Refresh(_, refresh_token) => assert_eq!(refresh_token, "refresh"),
            other => panic!("expected Refresh, got {:?}", other),
        }
    }

    #[test]
    fn expired_token_without_refresh_token_goes_interactive() {
        assert!(matches!(
            plan(Some(expired_token(None)), &scope()),
            AuthPlan::Interactive
        ));
    }

    #[test]
    fn missing_token_goes_interactive() {
        assert!(matches!(plan(None, &scope()), AuthPlan::Interactive));
    }

    #[test]
    fn token_with_narrower_scopes_goes_interactive() {
        // A token granted under a read-only scope cannot serve quick-add.
        let tokens = TokenInfo::new(
            "access",
            Some("refresh".to_string()),
            Some(3600),
            vec!["https://www.googleapis.com/auth/calendar.readonly".to_string()],
        );
        assert!(matches!(plan(Some(tokens), &scope()), AuthPlan::Interactive));
    }

    #[test]
    fn token_without_expiry_is_used() {
        let tokens = TokenInfo::new("access", None, None, scope());
        assert!(matches!(
            plan(Some(tokens), &scope()),
            AuthPlan::UseStored(_)
        ));
    }
}
