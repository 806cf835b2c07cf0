use std::env;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("unexpected HTTP status {0}")]
    Http(u16),
    #[error("malformed response body: {0}")]
    Malformed(String),
    #[error("no API credentials configured")]
    Unconfigured,
}

/// A signed GET against the ticketing REST API, path relative to the
/// account base URL.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub path: String,
    pub query: Vec<(String, String)>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: Vec::new(),
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }
}

/// The injected request capability. The rest of the app only sees this
/// trait; tests substitute canned responses.
#[async_trait]
pub trait ZafClient: Send + Sync {
    /// Single attempt; returns the parsed JSON body or fails.
    async fn request(&self, request: ApiRequest) -> Result<Value, ApiError>;
}

#[derive(Debug, Clone)]
pub struct ZafConfig {
    pub base_url: String,
    pub token: Option<String>,
}

impl ZafConfig {
    /// Reads `ZD_BASE_URL` and `ZD_API_TOKEN`. With no token configured,
    /// fetches fail fast and the dashboard runs on simulated data.
    pub fn from_env() -> Self {
        let base_url = env::var("ZD_BASE_URL")
            .unwrap_or_else(|_| "https://example.zendesk.com".to_owned());
        let token = env::var("ZD_API_TOKEN").ok();

        if token.is_none() {
            log::warn!("ZD_API_TOKEN not set; live ticket data will be unavailable");
        }

        Self { base_url, token }
    }
}

pub struct HttpZafClient {
    config: ZafConfig,
    http: reqwest::Client,
}

impl HttpZafClient {
    pub fn new(config: ZafConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl ZafClient for HttpZafClient {
    async fn request(&self, request: ApiRequest) -> Result<Value, ApiError> {
        let token = self.config.token.as_ref().ok_or(ApiError::Unconfigured)?;
        let url = format!("{}{}", self.config.base_url, request.path);

        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .query(&request.query)
            .send()
            .await
            .map_err(|err| ApiError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Http(status.as_u16()));
        }

        response
            .json::<Value>()
            .await
            .map_err(|err| ApiError::Malformed(err.to_string()))
    }
}
