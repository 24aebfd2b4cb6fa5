//! HTTP access to the observation feed.

use std::time::Duration;

use tracing::instrument;

use crate::error::{ModelError, NetworkError, ReqwestErrorExt};

const FEED_URL: &str = "https://www.yartemp.ru/data.php";
const REQUEST_TIMEOUT_SECS: u64 = 10;
const USER_AGENT: &str = "yartemp/0.1.0";

/// Client for the observation feed.
pub struct FeedClient {
    client: reqwest::Client,
    url: String,
}

impl FeedClient {
    /// Client against the live feed.
    pub fn new() -> Result<Self, ModelError> {
        Self::with_url(FEED_URL)
    }

    /// Client against a caller-supplied URL (config override, mock servers).
    pub fn with_url(url: impl Into<String>) -> Result<Self, ModelError> {
        Self::with_options(url, Duration::from_secs(REQUEST_TIMEOUT_SECS))
    }

    /// Client with an explicit request timeout.
    pub fn with_options(url: impl Into<String>, timeout: Duration) -> Result<Self, ModelError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| {
                NetworkError::ConnectionFailed(format!("could not build HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// Fetch one raw observation line.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_raw(&self) -> Result<String, ModelError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| e.into_network_error())?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(NetworkError::ServerError {
                status: status.as_u16(),
                message,
            }
            .into());
        }

        let body = response
            .text()
            .await
            .map_err(|e| NetworkError::InvalidResponse(e.to_string()))?;

        tracing::debug!("Fetched {} bytes from the feed", body.len());
        Ok(body)
    }
}
