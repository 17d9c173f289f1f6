//! OAuth credential store and Calendar API gateway.
//!
//! This crate owns everything that talks to Google:
//!
//! - [`CredentialStore`] - loads, refreshes, or interactively acquires an
//!   OAuth token
//! - [`CalendarClient`] - the three Calendar v3 operations (quick-add,
//!   list events)
//! - [`GoogleError`] - coded errors for auth and API failures
//!
//! # Authentication Flow
//!
//! 1. User provides their own OAuth client ID/secret (required by Google)
//! 2. The store reads the token file; a valid token is used as-is
//! 3. An expired token with a refresh token is refreshed in place
//! 4. Otherwise the store starts a loopback HTTP listener, opens the
//!    browser to Google's consent page with a PKCE challenge, and exchanges
//!    the returned code for tokens
//! 5. Tokens are persisted after any change
//!
//! # Example
//!
//! ```ignore
//! use quickcal_google::{CalendarClient, CredentialStore, GoogleConfig, OAuthCredentials};
//!
//! let credentials = OAuthCredentials::from_file("credentials.json")?;
//! let config = GoogleConfig::new(credentials);
//! let timeout = config.timeout;
//!
//! let store = CredentialStore::new(config)?;
//! let tokens = store.acquire().await?;
//!
//! let client = CalendarClient::new(&tokens.access_token, timeout);
//! let event = client.quick_add("primary", "Dinner at 7pm").await?;
//! ```

pub mod client;
pub mod credentials;
pub mod error;
pub mod oauth;
pub mod store;
pub mod tokens;

pub use client::CalendarClient;
pub use credentials::{GoogleConfig, OAuthCredentials};
pub use error::{GoogleError, GoogleErrorCode, GoogleResult};
pub use oauth::{OAuthClient, PkceFlow};
pub use store::CredentialStore;
pub use tokens::{TokenInfo, TokenStorage};
