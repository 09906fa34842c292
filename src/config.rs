//! Configuration Module
//!
//! Handles loading and managing proxy configuration from environment variables.

use std::env;
use std::fmt;
use std::time::Duration;

/// Default Dropbox endpoint for file content
pub const DEFAULT_CONTENT_URL: &str = "https://content.dropboxapi.com";

/// Default Dropbox endpoint for RPC and OAuth calls
pub const DEFAULT_API_URL: &str = "https://api.dropboxapi.com";

// == Dropbox Credentials ==
/// Credentials handed opaquely to the Dropbox client.
///
/// `Debug` redacts every secret so configuration can be logged.
#[derive(Clone, Default)]
pub struct DropboxCredentials {
    /// App key (`CLIENTID`)
    pub app_key: String,
    /// App secret (`CLIENTSECRET`)
    pub app_secret: String,
    /// OAuth2 access token (`TOKEN`)
    pub access_token: String,
    /// Optional long-lived refresh token (`REFRESH_TOKEN`)
    pub refresh_token: Option<String>,
}

impl DropboxCredentials {
    /// Loads credentials from `CLIENTID`, `CLIENTSECRET`, `TOKEN` and
    /// `REFRESH_TOKEN`. Missing values are left empty.
    pub fn from_env() -> Self {
        Self {
            app_key: env::var("CLIENTID").unwrap_or_default(),
            app_secret: env::var("CLIENTSECRET").unwrap_or_default(),
            access_token: env::var("TOKEN").unwrap_or_default(),
            refresh_token: env::var("REFRESH_TOKEN").ok().filter(|t| !t.is_empty()),
        }
    }

    /// True when a refresh can be attempted after a rejected access token.
    pub fn can_refresh(&self) -> bool {
        self.refresh_token.is_some() && !self.app_key.is_empty() && !self.app_secret.is_empty()
    }
}

impl fmt::Debug for DropboxCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn redact(value: &str) -> &'static str {
            if value.is_empty() {
                "<unset>"
            } else {
                "<redacted>"
            }
        }

        f.debug_struct("DropboxCredentials")
            .field("app_key", &redact(&self.app_key))
            .field("app_secret", &redact(&self.app_secret))
            .field("access_token", &redact(&self.access_token))
            .field(
                "refresh_token",
                &redact(self.refresh_token.as_deref().unwrap_or_default()),
            )
            .finish()
    }
}

/// Proxy configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries the cache can hold
    pub max_entries: usize,
    /// HTTP server port
    pub server_port: u16,
    /// Upper bound in seconds on a single backing-store fetch
    pub fetch_timeout_secs: u64,
    /// Base URL of the Dropbox content endpoint
    pub content_url: String,
    /// Base URL of the Dropbox API endpoint
    pub api_url: String,
    /// Dropbox credentials
    pub credentials: DropboxCredentials,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_ENTRIES` - Maximum cache entries (default: 1000)
    /// - `SERVER_PORT` - HTTP server port (default: 8080)
    /// - `FETCH_TIMEOUT_SECS` - Backing-store fetch timeout (default: 30)
    /// - `DROPBOX_CONTENT_URL` - Content endpoint (default: content.dropboxapi.com)
    /// - `DROPBOX_API_URL` - API endpoint (default: api.dropboxapi.com)
    /// - `CLIENTID`, `CLIENTSECRET`, `TOKEN`, `REFRESH_TOKEN` - Dropbox credentials
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_entries: parse_env("MAX_ENTRIES").unwrap_or(defaults.max_entries),
            server_port: parse_env("SERVER_PORT").unwrap_or(defaults.server_port),
            fetch_timeout_secs: parse_env("FETCH_TIMEOUT_SECS")
                .unwrap_or(defaults.fetch_timeout_secs),
            content_url: env::var("DROPBOX_CONTENT_URL").unwrap_or(defaults.content_url),
            api_url: env::var("DROPBOX_API_URL").unwrap_or(defaults.api_url),
            credentials: DropboxCredentials::from_env(),
        }
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: 1000,
            server_port: 8080,
            fetch_timeout_secs: 30,
            content_url: DEFAULT_CONTENT_URL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            credentials: DropboxCredentials::default(),
        }
    }
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}
