//! HTTP transport for the iland cloud API.
//!
//! [`Transport`] is the seam between the typed facade and the network. The
//! real implementation authenticates once with an OAuth2 password grant and
//! then issues plain bearer-authenticated GETs.

use crate::credentials::Credentials;
use crate::error::{Error, Result};
use log::debug;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

/// Default versioned API base URL.
pub const DEFAULT_API_URL: &str = "https://api.ilandcloud.com/v1";

/// Default OAuth2 token endpoint.
pub const DEFAULT_TOKEN_URL: &str =
    "https://console.ilandcloud.com/auth/realms/iland-core/protocol/openid-connect/token";

/// Media type the API expects on every request.
pub const API_MEDIA_TYPE: &str = "application/vnd.ilandcloud.api.v1.0+json";

/// Anti-XSSI prefix the API prepends to JSON bodies.
const XSSI_PREFIX: &str = ")]}'";

const HTTP_TIMEOUT_SECS: u64 = 60;

/// Performs a single GET against an API path and returns the parsed body.
pub trait Transport {
    /// `path` is relative to the API base (e.g. `/tasks/abc`); `query` pairs
    /// are sent in the given order.
    fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Value>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Value> {
        (**self).get(path, query)
    }
}

/// Base URLs used by [`HttpTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub api_url: String,
    pub token_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Endpoints {
            api_url: DEFAULT_API_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Blocking reqwest transport holding one access token for the invocation.
pub struct HttpTransport {
    client: Client,
    api_url: String,
    access_token: String,
}

impl HttpTransport {
    /// Builds the HTTP client and obtains an access token.
    pub fn connect(credentials: &Credentials, endpoints: &Endpoints) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .user_agent(format!(
                "{}/{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|e| Error::api(&endpoints.token_url, e))?;

        let access_token = fetch_token(&client, credentials, &endpoints.token_url)?;
        debug!("Authenticated as {}", credentials.username);

        Ok(HttpTransport {
            client,
            api_url: endpoints.api_url.trim_end_matches('/').to_string(),
            access_token,
        })
    }
}

fn fetch_token(client: &Client, credentials: &Credentials, token_url: &str) -> Result<String> {
    let form = [
        ("grant_type", "password"),
        ("client_id", credentials.client_id.as_str()),
        ("client_secret", credentials.client_secret.as_str()),
        ("username", credentials.username.as_str()),
        ("password", credentials.password.as_str()),
    ];

    let response = client
        .post(token_url)
        .form(&form)
        .send()
        .and_then(|r| r.error_for_status())
        .map_err(|e| Error::api(token_url, e))?;

    let token: TokenResponse = response.json().map_err(|e| Error::api(token_url, e))?;
    Ok(token.access_token)
}

impl Transport for HttpTransport {
    fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Value> {
        let url = format!("{}{}", self.api_url, path);

        let body = self
            .client
            .get(&url)
            .query(query)
            .header(AUTHORIZATION, format!("Bearer {}", self.access_token))
            .header(ACCEPT, API_MEDIA_TYPE)
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.text())
            .map_err(|e| Error::api(path, e))?;

        decode_body(&body).map_err(|e| Error::api(path, e))
    }
}

/// Parses an API response body, dropping the anti-XSSI prefix if present.
pub fn decode_body(body: &str) -> serde_json::Result<Value> {
    let trimmed = body.trim_start();
    let json = trimmed.strip_prefix(XSSI_PREFIX).unwrap_or(trimmed);
    serde_json::from_str(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_strips_prefix() {
        let value = decode_body(")]}'\n{\"uuid\":\"abc\"}").unwrap();
        assert_eq!(value, json!({"uuid": "abc"}));
    }

    #[test]
    fn test_decode_plain_json() {
        let value = decode_body("[1, 2, 3]").unwrap();
        assert_eq!(value, json!([1, 2, 3]));
    }

    #[test]
    fn test_decode_rejects_malformed() {
        assert!(decode_body(")]}'\n{oops").is_err());
    }

    #[test]
    fn test_default_endpoints() {
        let endpoints = Endpoints::default();
        assert_eq!(endpoints.api_url, DEFAULT_API_URL);
        assert!(endpoints.token_url.ends_with("/openid-connect/token"));
    }
}
