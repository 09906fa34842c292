//! Dropbox API Client
//!
//! Downloads original files and JPEG thumbnails through the Dropbox v2
//! content endpoints, refreshing the access token once when it is rejected.

use std::fmt::Write as _;
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use bytes::BytesMut;
use reqwest::{header, Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::config::{Config, DropboxCredentials};
use crate::fetch::{BackingStore, FetchError, FetchedBlob};
use crate::models::Variant;

/// Header carrying the JSON arguments of a content endpoint call
const API_ARG_HEADER: &str = "Dropbox-API-Arg";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Dropbox-backed implementation of `BackingStore`.
pub struct DropboxClient {
    http: Client,
    credentials: DropboxCredentials,
    /// Current access token, replaced on refresh
    access_token: RwLock<String>,
    content_url: String,
    api_url: String,
    request_timeout: Duration,
}

impl DropboxClient {
    /// Creates a client against explicit endpoints.
    ///
    /// # Arguments
    /// * `credentials` - App key/secret and tokens
    /// * `content_url` - Base URL of the content endpoint
    /// * `api_url` - Base URL of the API endpoint (token refresh)
    /// * `request_timeout` - Per-request HTTP timeout
    pub fn new(
        credentials: DropboxCredentials,
        content_url: impl Into<String>,
        api_url: impl Into<String>,
        request_timeout: Duration,
    ) -> Result<Self, FetchError> {
        let http = Client::builder()
            .timeout(request_timeout)
            .user_agent(concat!("thumb_proxy/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::Config(e.to_string()))?;

        Ok(Self {
            http,
            access_token: RwLock::new(credentials.access_token.clone()),
            credentials,
            content_url: content_url.into().trim_end_matches('/').to_string(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            request_timeout,
        })
    }

    /// Creates a client from the proxy configuration.
    pub fn from_config(config: &Config) -> Result<Self, FetchError> {
        Self::new(
            config.credentials.clone(),
            config.content_url.clone(),
            config.api_url.clone(),
            config.fetch_timeout(),
        )
    }

    fn current_token(&self) -> String {
        self.access_token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Exchanges the refresh token for a new access token.
    async fn refresh_access_token(&self) -> Result<(), FetchError> {
        let refresh_token = self.credentials.refresh_token.as_deref().ok_or_else(|| {
            FetchError::Config("no refresh token configured".to_string())
        })?;

        let url = format!("{}/oauth2/token", self.api_url);
        debug!(url = %url, "Refreshing Dropbox access token");

        let response = self
            .http
            .post(&url)
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
                ("client_id", self.credentials.app_key.as_str()),
                ("client_secret", self.credentials.app_secret.as_str()),
            ])
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            warn!(status, "Dropbox token refresh failed");
            return Err(FetchError::Unauthorized(format!(
                "token refresh failed ({}): {}",
                status, body
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| self.transport_error(e))?;
        *self
            .access_token
            .write()
            .unwrap_or_else(PoisonError::into_inner) = token.access_token;

        info!("Dropbox access token refreshed");
        Ok(())
    }

    async fn send(&self, url: &str, arg: &str) -> Result<Response, FetchError> {
        self.http
            .post(url)
            .bearer_auth(self.current_token())
            .header(API_ARG_HEADER, arg)
            .send()
            .await
            .map_err(|e| self.transport_error(e))
    }

    /// Drains a response into a blob, checking the declared length.
    async fn read_blob(&self, mut response: Response) -> Result<FetchedBlob, FetchError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::from_status(status.as_u16(), &body));
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let declared = response.content_length();

        // A body cut short surfaces as an error on a later chunk
        let mut body = BytesMut::with_capacity(declared.unwrap_or(0).min(1 << 20) as usize);
        loop {
            match response.chunk().await {
                Ok(Some(chunk)) => body.extend_from_slice(&chunk),
                Ok(None) => break,
                Err(err) => {
                    let received = body.len() as u64;
                    return Err(match declared {
                        Some(declared) if received < declared && !err.is_timeout() => {
                            FetchError::IncompleteBody { declared, received }
                        }
                        _ => self.transport_error(err),
                    });
                }
            }
        }
        let received = body.len() as u64;

        if let Some(declared) = declared {
            if declared != received {
                return Err(FetchError::IncompleteBody { declared, received });
            }
        }

        Ok(FetchedBlob {
            bytes: body.freeze(),
            length: received,
            content_type,
        })
    }

    fn transport_error(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout(self.request_timeout)
        } else {
            FetchError::Transport(err.to_string())
        }
    }

    fn endpoint(&self, path: &str, variant: Variant) -> (String, String) {
        match variant {
            Variant::Original => (
                format!("{}/2/files/download", self.content_url),
                header_safe_json(&json!({ "path": path })),
            ),
            Variant::Thumbnail(size) => (
                format!("{}/2/files/get_thumbnail", self.content_url),
                header_safe_json(&json!({
                    "path": path,
                    "format": "jpeg",
                    "size": size.dropbox_tag(),
                })),
            ),
        }
    }
}

#[async_trait]
impl BackingStore for DropboxClient {
    async fn fetch(&self, path: &str, variant: Variant) -> Result<FetchedBlob, FetchError> {
        let (url, arg) = self.endpoint(path, variant);
        debug!(path, %variant, url = %url, "Fetching from Dropbox");

        let mut response = self.send(&url, &arg).await?;

        if response.status() == StatusCode::UNAUTHORIZED && self.credentials.can_refresh() {
            warn!(path, "Dropbox rejected access token, refreshing");
            self.refresh_access_token().await?;
            response = self.send(&url, &arg).await?;
        }

        let blob = self.read_blob(response).await?;
        debug!(path, %variant, size = blob.length, "Fetched from Dropbox");
        Ok(blob)
    }
}

/// Serializes JSON for use as an HTTP header value.
///
/// Header values must be ASCII, so every other character is written as a
/// `\uXXXX` escape (surrogate pairs above the BMP).
fn header_safe_json(value: &serde_json::Value) -> String {
    let raw = value.to_string();
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if c.is_ascii() && c != '\u{7f}' {
            out.push(c);
        } else {
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units) {
                let _ = write!(out, "\\u{:04x}", unit);
            }
        }
    }
    out
}
