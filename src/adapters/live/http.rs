//! Live adapter for the `HttpFetcher` port using reqwest.

use std::time::Duration;

use reqwest::Client;

use crate::ports::http::{FetchFuture, HttpFetcher};

const USER_AGENT: &str = "compose-harvest/1.0";
const FETCH_TIMEOUT: Duration = Duration::from_secs(60);

/// Live HTTP fetcher backed by a shared reqwest client.
pub struct LiveHttpFetcher {
    client: Client,
}

impl LiveHttpFetcher {
    /// Creates a new live fetcher with the pipeline's user agent and
    /// per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new() -> Result<Self, String> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|e| format!("Failed to build HTTP client: {e}"))?;
        Ok(Self { client })
    }
}

impl HttpFetcher for LiveHttpFetcher {
    fn fetch(&self, url: &str) -> FetchFuture<'_> {
        let url = url.to_string();
        Box::pin(async move {
            let response = self
                .client
                .get(&url)
                .send()
                .await
                .map_err(|e| -> Box<dyn std::error::Error + Send + Sync> {
                    format!("Request to {url} failed: {e}").into()
                })?;

            let status = response.status();
            if !status.is_success() {
                return Err(format!("Request to {url} returned HTTP {}", status.as_u16()).into());
            }

            response.text().await.map_err(|e| -> Box<dyn std::error::Error + Send + Sync> {
                format!("Failed to read response body from {url}: {e}").into()
            })
        })
    }
}
