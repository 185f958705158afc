//! Pricing service REST client
//!
//! # Endpoints
//! - GET /midpoints?token_ids=a,b - batch midpoint lookup
//! - GET /midpoint?token_id=a - single-token midpoint
//!
//! Midpoints are probabilities in [0,1]. Anything non-numeric or out of
//! range counts as unavailable rather than an error: price availability
//! and market discovery fail independently.

use std::collections::HashMap;

use anyhow::{Context, Result};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info};

use crate::PRICING_API_BASE;

/// Per-request timeout for pricing calls.
const REQUEST_TIMEOUT_SECS: u64 = 12;

/// Accept decimal strings or bare numbers; reject anything outside [0,1].
pub fn parse_price(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        Value::Number(n) => n.as_f64()?,
        _ => return None,
    };
    if (0.0..=1.0).contains(&parsed) {
        Some(parsed)
    } else {
        None
    }
}

/// Pricing REST client.
#[derive(Clone)]
pub struct PricingClient {
    client: Client,
    base_url: String,
}

impl PricingClient {
    /// Create a new pricing client with the default base URL.
    pub fn new() -> Result<Self> {
        Self::with_base_url(PRICING_API_BASE)
    }

    /// Create a new pricing client with a custom base URL.
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client, base_url: base_url.trim_end_matches('/').to_string() })
    }

    /// GET /midpoints?token_ids=a,b - token id to midpoint in one call.
    /// Tokens the venue cannot price come back absent or unparseable and
    /// map to None.
    pub async fn get_midpoints(
        &self,
        token_ids: &[String],
    ) -> Result<HashMap<String, Option<f64>>> {
        let url = format!("{}/midpoints?token_ids={}", self.base_url, token_ids.join(","));
        debug!("GET {}", url);

        let response = self.client.get(&url).send().await.context("HTTP request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("HTTP {} for {}: {}", status, url, body);
        }

        let raw: HashMap<String, Value> =
            response.json().await.context("Failed to parse midpoints response")?;
        Ok(raw.into_iter().map(|(id, v)| (id, parse_price(&v))).collect())
    }

    /// GET /midpoint?token_id=a - Some(mid) or None when unpriceable.
    pub async fn get_midpoint(&self, token_id: &str) -> Result<Option<f64>> {
        let url = format!("{}/midpoint?token_id={}", self.base_url, token_id);
        debug!("GET {}", url);

        let response = self.client.get(&url).send().await.context("HTTP request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("HTTP {} for {}: {}", status, url, body);
        }

        let raw: Value = response.json().await.context("Failed to parse midpoint response")?;
        Ok(raw.get("mid").and_then(parse_price))
    }

    /// Connectivity probe. Even a 404 on the root means we connected.
    pub async fn test_connectivity(&self) -> Result<()> {
        let url = format!("{}/", self.base_url);
        let response = self.client.get(&url).send().await.context("Connection test failed")?;

        info!("Pricing connectivity: HTTP {}", response.status());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_price_decimal_string() {
        assert_eq!(parse_price(&json!("0.55")), Some(0.55));
        assert_eq!(parse_price(&json!(" 0.45 ")), Some(0.45));
    }

    #[test]
    fn test_parse_price_bare_number() {
        assert_eq!(parse_price(&json!(0.5)), Some(0.5));
        assert_eq!(parse_price(&json!(0)), Some(0.0));
        assert_eq!(parse_price(&json!(1)), Some(1.0));
    }

    #[test]
    fn test_parse_price_out_of_range() {
        assert_eq!(parse_price(&json!("1.5")), None);
        assert_eq!(parse_price(&json!(-0.1)), None);
    }

    #[test]
    fn test_parse_price_garbage() {
        assert_eq!(parse_price(&json!("n/a")), None);
        assert_eq!(parse_price(&json!(null)), None);
        assert_eq!(parse_price(&json!({"mid": "0.5"})), None);
    }

    #[test]
    fn test_custom_base_url_trims_slash() {
        let client = PricingClient::with_base_url("https://example.com/").unwrap();
        assert_eq!(client.base_url, "https://example.com");
    }
}
