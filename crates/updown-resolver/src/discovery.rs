//! Discovery service REST client
//!
//! # Endpoints
//! - GET /markets/slug/{slug} - exact lookup for a guessed slug
//! - GET /search?q={query} - full-text search, markets grouped by event
//!
//! A 404 (or empty array) for a guessed slug is an expected miss, not an
//! error: most guesses point at windows the service has not indexed yet.

use anyhow::{Context, Result};
use reqwest::Client;
use tracing::{debug, info};

use crate::types::{MarketRecord, SearchResponse};
use crate::DISCOVERY_API_BASE;

/// Per-request timeout for discovery calls.
const REQUEST_TIMEOUT_SECS: u64 = 12;

/// Market discovery REST client.
#[derive(Clone)]
pub struct DiscoveryClient {
    client: Client,
    base_url: String,
}

impl DiscoveryClient {
    /// Create a new discovery client with the default base URL.
    pub fn new() -> Result<Self> {
        Self::with_base_url(DISCOVERY_API_BASE)
    }

    /// Create a new discovery client with a custom base URL.
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client, base_url: base_url.trim_end_matches('/').to_string() })
    }

    /// GET /markets/slug/{slug} - None on 404 or empty result, Err on
    /// anything else. The API answers slug lookups with an array; the
    /// first element wins.
    pub async fn get_market_by_slug(&self, slug: &str) -> Result<Option<MarketRecord>> {
        let url = format!("{}/markets/slug/{}", self.base_url, slug);
        debug!("GET {}", url);

        let response = self.client.get(&url).send().await.context("HTTP request failed")?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            debug!("No market for slug: {}", slug);
            return Ok(None);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("HTTP {} for {}: {}", status, url, body);
        }

        let markets: Vec<MarketRecord> =
            response.json().await.context("Failed to parse market array")?;
        Ok(markets.into_iter().next())
    }

    /// GET /search?q={query} - loose full-text search. Markets arrive
    /// grouped under events; the caller gets them flattened in response
    /// order.
    pub async fn search_markets(&self, query: &str) -> Result<Vec<MarketRecord>> {
        let url = format!("{}/search", self.base_url);
        debug!("GET {} q={:?}", url, query);

        let response = self
            .client
            .get(&url)
            .query(&[("q", query)])
            .send()
            .await
            .context("HTTP request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("HTTP {} for {}: {}", status, url, body);
        }

        let parsed: SearchResponse =
            response.json().await.context("Failed to parse search response")?;
        Ok(parsed.events.into_iter().flat_map(|e| e.markets).collect())
    }

    /// Connectivity probe against a cheap listing endpoint.
    pub async fn test_connectivity(&self) -> Result<()> {
        let url = format!("{}/markets?limit=1", self.base_url);
        let response = self.client.get(&url).send().await.context("Connection test failed")?;

        let status = response.status();
        info!("Discovery connectivity: HTTP {}", status);

        if !status.is_success() {
            anyhow::bail!("Discovery API returned HTTP {}", status);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        assert!(DiscoveryClient::new().is_ok());
    }

    #[test]
    fn test_custom_base_url_trims_slash() {
        let client = DiscoveryClient::with_base_url("https://example.com/").unwrap();
        assert_eq!(client.base_url, "https://example.com");
    }
}
