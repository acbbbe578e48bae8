//! Request-scoped upstream API client.

use axum::http::HeaderMap;
use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::config::UpstreamConfig;
use crate::http::request::X_REQUEST_ID;

/// Error talking to the upstream API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("upstream returned {status} for {path}")]
    Status { status: u16, path: String },

    #[error("invalid upstream url: {0}")]
    Url(#[from] url::ParseError),
}

/// HTTP client bound to the configured upstream API.
///
/// Built fresh per request on the server so cookies and the request ID
/// from the incoming request travel with every loader fetch.
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
    cookies: Option<String>,
    request_id: Option<String>,
}

impl ApiClient {
    /// Client with no request binding (client-side sessions, tests).
    pub fn new(config: &UpstreamConfig) -> Result<Self, ApiError> {
        Ok(Self {
            http: reqwest::Client::new(),
            base: Url::parse(&config.base_url())?,
            cookies: None,
            request_id: None,
        })
    }

    /// Client bound to one incoming request: forwards its cookies and
    /// request ID to the upstream.
    pub fn for_request(config: &UpstreamConfig, headers: &HeaderMap) -> Result<Self, ApiError> {
        let mut client = Self::new(config)?;
        client.cookies = headers
            .get(axum::http::header::COOKIE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        client.request_id = headers
            .get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        Ok(client)
    }

    /// GET a JSON document from the upstream.
    pub async fn get_json(&self, path: &str) -> Result<Value, ApiError> {
        let url = self.base.join(path)?;
        let mut request = self.http.get(url);
        if let Some(cookies) = &self.cookies {
            request = request.header(reqwest::header::COOKIE, cookies);
        }
        if let Some(id) = &self.request_id {
            request = request.header(X_REQUEST_ID, id);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(ApiError::Status {
                status: response.status().as_u16(),
                path: path.to_string(),
            });
        }
        Ok(response.json().await?)
    }
}
