//! Command handlers.
//!
//! Each command follows the same shape: resolve configuration, acquire a
//! credential, construct the gateway, make one API call, render, print.

pub mod add;
pub mod next;
pub mod today;

use tracing::debug;

use quickcal_google::{CalendarClient, CredentialStore, GoogleConfig, OAuthCredentials};

use crate::cli::Cli;
use crate::config::ClientConfig;
use crate::error::ClientResult;

/// Builds the gateway configuration from CLI flags and config.toml.
///
/// Resolution order for each setting: CLI flag, then config.toml, then the
/// built-in default.
fn google_config(cli: &Cli, config: &ClientConfig) -> ClientResult<GoogleConfig> {
    let credentials_path = cli
        .credentials_file
        .clone()
        .or_else(|| config.google.credentials_file.clone())
        .unwrap_or_else(ClientConfig::default_credentials_path);

    let credentials = OAuthCredentials::from_file(&credentials_path)?;

    let mut google_config = GoogleConfig::new(credentials);

    if let Some(ref token_path) = config.google.token_path {
        google_config = google_config.with_token_path(token_path);
    }

    if let Some(calendar_id) = cli
        .calendar
        .clone()
        .or_else(|| config.google.calendar_id.clone())
    {
        google_config = google_config.with_calendar_id(calendar_id);
    }

    Ok(google_config)
}

/// Acquires a credential and returns a ready gateway plus the calendar id.
pub(crate) async fn connect(
    cli: &Cli,
    config: &ClientConfig,
) -> ClientResult<(CalendarClient, String)> {
    let google_config = google_config(cli, config)?;
    let calendar_id = google_config.calendar_id.clone();
    let timeout = google_config.timeout;
    debug!("operating on calendar {}", calendar_id);

    let store = CredentialStore::new(google_config)?;
    let tokens = store.acquire().await?;

    Ok((CalendarClient::new(&tokens.access_token, timeout), calendar_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::path::PathBuf;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    fn write_credentials(dir: &std::path::Path) -> PathBuf {
        let path = dir.join("credentials.json");
        std::fs::write(
            &path,
            r#"{
                "installed": {
                    "client_id": "test.apps.googleusercontent.com",
                    "client_secret": "secret"
                }
            }"#,
        )
        .unwrap();
        path
    }

    #[test]
    fn cli_flags_override_config() {
        let tmp = tempfile::tempdir().unwrap();
        let creds = write_credentials(tmp.path());

        let cli = cli(&[
            "quickcal",
            "--credentials-file",
            creds.to_str().unwrap(),
            "--calendar",
            "flag@example.com",
            "next",
        ]);

        let mut config = ClientConfig::default();
        config.google.calendar_id = Some("config@example.com".to_string());

        let google_config = google_config(&cli, &config).unwrap();
        assert_eq!(google_config.calendar_id, "flag@example.com");
    }

    #[test]
    fn config_supplies_calendar_and_token_path() {
        let tmp = tempfile::tempdir().unwrap();
        let creds = write_credentials(tmp.path());

        let cli = cli(&[
            "quickcal",
            "--credentials-file",
            creds.to_str().unwrap(),
            "next",
        ]);

        let mut config = ClientConfig::default();
        config.google.calendar_id = Some("config@example.com".to_string());
        config.google.token_path = Some(tmp.path().join("token.json"));

        let google_config = google_config(&cli, &config).unwrap();
        assert_eq!(google_config.calendar_id, "config@example.com");
        assert_eq!(google_config.token_path, tmp.path().join("token.json"));
    }

    #[test]
    fn calendar_defaults_to_primary() {
        let tmp = tempfile::tempdir().unwrap();
        let creds = write_credentials(tmp.path());

        let cli = cli(&[
            "quickcal",
            "--credentials-file",
            creds.to_str().unwrap(),
            "next",
        ]);

        let google_config = google_config(&cli, &ClientConfig::default()).unwrap();
        assert_eq!(google_config.calendar_id, "primary");
    }

    #[test]
    fn missing_credentials_file_is_a_config_error() {
        let cli = cli(&[
            "quickcal",
            "--credentials-file",
            "/nonexistent/credentials.json",
            "next",
        ]);

        let err = google_config(&cli, &ClientConfig::default()).unwrap_err();
        assert!(matches!(err, crate::error::ClientError::Config(_)));
    }
}
