//! Canonical "now" for window math
//!
//! The pricing venue exposes a `/time` endpoint; when it is reachable its
//! clock wins over the local one, since the venue's clock decides which
//! window a contract belongs to. Some deployments report seconds and some
//! milliseconds; magnitude decides which.

use anyhow::{Context, Result};
use reqwest::Client;
use tracing::{debug, info};

use crate::PRICING_API_BASE;

/// Epoch values above this are milliseconds, not seconds.
const MILLIS_THRESHOLD: i64 = 1_000_000_000_000;

/// Normalize a reported epoch value to seconds.
pub fn normalize_epoch_seconds(raw: i64) -> i64 {
    if raw > MILLIS_THRESHOLD {
        raw / 1000
    } else {
        raw
    }
}

/// Time-sync client for the venue clock.
#[derive(Clone)]
pub struct TimeClient {
    client: Client,
    base_url: String,
}

impl TimeClient {
    /// Create a new time client with the default base URL.
    pub fn new() -> Result<Self> {
        Self::with_base_url(PRICING_API_BASE)
    }

    /// Create a new time client with a custom base URL.
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(5))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client, base_url: base_url.trim_end_matches('/').to_string() })
    }

    /// GET /time - venue epoch time, normalized to seconds.
    /// The body is a bare number, possibly quoted.
    pub async fn server_time_seconds(&self) -> Result<i64> {
        let url = format!("{}/time", self.base_url);
        debug!("GET {}", url);

        let response = self.client.get(&url).send().await.context("HTTP request failed")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("HTTP {} for {}", status, url);
        }

        let body = response.text().await.context("Failed to read time response")?;
        let raw: f64 = body
            .trim()
            .trim_matches('"')
            .parse()
            .with_context(|| format!("Unparseable server time: {}", body))?;

        Ok(normalize_epoch_seconds(raw as i64))
    }

    /// Venue time when reachable, local wall clock otherwise.
    pub async fn now_seconds(&self) -> i64 {
        match self.server_time_seconds().await {
            Ok(ts) => ts,
            Err(e) => {
                debug!("Venue time unavailable, using local clock: {:#}", e);
                chrono::Utc::now().timestamp()
            }
        }
    }

    /// Connectivity probe.
    pub async fn test_connectivity(&self) -> Result<()> {
        let ts = self.server_time_seconds().await?;
        info!("Time endpoint OK: {}", ts);
        Ok(())
    }
}
