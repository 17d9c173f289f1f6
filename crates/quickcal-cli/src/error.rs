//! Client error types.
//!
//! Errors bubble to `main` unaltered and are printed once with an
//! `Error:` prefix; the variant decides the process exit code.

use std::fmt;

use quickcal_google::GoogleError;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur in the client.
#[derive(Debug)]
pub enum ClientError {
    /// Configuration error (bad config file, missing credentials file).
    Config(String),
    /// Credential acquisition failed.
    Auth(String),
    /// A Calendar API call failed (transport or non-success response).
    Api(String),
    /// IO error.
    Io(std::io::Error),
}

impl ClientError {
    /// The process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => 2,
            Self::Auth(_) => 3,
            Self::Api(_) => 4,
            Self::Io(_) => 1,
        }
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "configuration error: {}", msg),
            Self::Auth(msg) => write!(f, "authentication error: {}", msg),
            Self::Api(msg) => write!(f, "API error: {}", msg),
            Self::Io(err) => write!(f, "IO error: {}", err),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<GoogleError> for ClientError {
    fn from(err: GoogleError) -> Self {
        use quickcal_google::GoogleErrorCode;

        let code = err.code();
        if code.is_auth() {
            Self::Auth(err.to_string())
        } else if code == GoogleErrorCode::ConfigurationError {
            Self::Config(err.to_string())
        } else {
            Self::Api(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_per_variant() {
        assert_eq!(ClientError::Config("x".into()).exit_code(), 2);
        assert_eq!(ClientError::Auth("x".into()).exit_code(), 3);
        assert_eq!(ClientError::Api("x".into()).exit_code(), 4);
        assert_eq!(
            ClientError::Io(std::io::Error::other("x")).exit_code(),
            1
        );
    }

    #[test]
    fn google_error_mapping() {
        let auth: ClientError = GoogleError::authentication("token expired").into();
        assert!(matches!(auth, ClientError::Auth(_)));

        let denied: ClientError = GoogleError::authorization("denied").into();
        assert!(matches!(denied, ClientError::Auth(_)));

        let config: ClientError = GoogleError::configuration("no credentials").into();
        assert!(matches!(config, ClientError::Config(_)));

        let network: ClientError = GoogleError::network("timeout").into();
        assert!(matches!(network, ClientError::Api(_)));

        let server: ClientError = GoogleError::server("500").into();
        assert!(matches!(server, ClientError::Api(_)));
    }

    #[test]
    fn display_includes_message() {
        let err = ClientError::Api("API error (503): busy".to_string());
        assert!(err.to_string().contains("503"));
    }
}
