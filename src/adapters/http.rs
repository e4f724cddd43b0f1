use crate::domain::ports::{EnvelopeSource, Query};
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

pub const DEFAULT_BASE_URL: &str = "https://fantasysports.yahooapis.com/fantasy/v2";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_REQUEST_DELAY_MS: u64 = 500;

/// Live Fantasy Sports API client.
///
/// Every request carries the bearer token and `format=json`. Calls are
/// spaced at least `request_delay` apart so a season sweep stays under the
/// upstream rate limit.
pub struct HttpSource {
    client: Client,
    base_url: String,
    access_token: String,
    request_delay: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl HttpSource {
    pub fn new(
        base_url: impl Into<String>,
        access_token: impl Into<String>,
        timeout: Duration,
        request_delay: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
            request_delay,
            last_request: Mutex::new(None),
        })
    }

    pub fn url_for(&self, query: &Query) -> String {
        format!("{}/{}", self.base_url, query.resource_path())
    }

    async fn wait_turn(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.request_delay {
                tokio::time::sleep(self.request_delay - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }
}

#[async_trait]
impl EnvelopeSource for HttpSource {
    async fn fetch(&self, query: &Query) -> Result<Option<Value>> {
        self.wait_turn().await;

        let url = self.url_for(query);
        tracing::debug!("GET {}", url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.access_token)
            .query(&[("format", "json")])
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("{} returned {}: {}", query, status, body);
            return Ok(None);
        }

        let envelope: Value = response.json().await?;
        Ok(Some(envelope))
    }
}
