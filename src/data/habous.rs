//! HTTP client for the Ministry of Habous prayer times endpoint
//!
//! Fetches the raw HTML fragment for one city. The component is stateless
//! and performs no retries; a failed request surfaces immediately and retry
//! policy, if any, belongs to the caller.

use std::time::Duration;

use reqwest::Client;
use thiserror::Error;
use tracing::debug;

use super::City;

/// Base URL for the Habous prayer times endpoint
const HABOUS_BASE_URL: &str = "https://www.habous.gov.ma/prieres";

/// Bounded timeout for the whole request
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors that can occur when fetching the times page
#[derive(Debug, Error)]
pub enum FetchError {
    /// Timeout or connection failure reaching the remote source
    #[error("network error reaching prayer times source: {0}")]
    Network(#[from] reqwest::Error),

    /// The remote source answered with a non-success status
    #[error("prayer times source returned HTTP {status}")]
    RemoteService { status: u16 },
}

/// Client for fetching the daily times page from the Habous endpoint
#[derive(Debug, Clone)]
pub struct HabousClient {
    client: Client,
    base_url: String,
}

impl HabousClient {
    /// Create a new client with the production endpoint and a 10 s timeout.
    ///
    /// The Habous server presents an incomplete certificate chain, so
    /// certificate validation is disabled for this host (the original
    /// tooling around this endpoint does the same).
    pub fn new() -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .danger_accept_invalid_certs(true)
            .build()?;

        Ok(Self {
            client,
            base_url: HABOUS_BASE_URL.to_string(),
        })
    }

    /// Create a client pointed at a custom base URL.
    ///
    /// Useful for tests or a mirror of the endpoint.
    #[allow(dead_code)]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// URL of the daily times fragment for the given city
    fn city_url(&self, city: &City) -> String {
        format!("{}/horaire-api.php?ville={}", self.base_url, city.habous_id)
    }

    /// Fetch the raw HTML of today's times page for the given city.
    ///
    /// # Returns
    /// * `Ok(String)` - The page body
    /// * `Err(FetchError::Network)` - Timeout or connection failure
    /// * `Err(FetchError::RemoteService)` - Non-success HTTP status
    pub async fn fetch_html(&self, city: &City) -> Result<String, FetchError> {
        let url = self.city_url(city);
        debug!(city = city.id, %url, "fetching prayer times page");

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::RemoteService {
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}
