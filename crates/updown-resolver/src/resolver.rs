//! Resolution pipeline
//!
//! Sequences clock -> window -> candidates -> locate -> validate ->
//! (score) -> select -> prices, strictly in order. Misses and upstream
//! errors are absorbed into the per-call trail and the candidate loop
//! moves on; one bad response must not sink an otherwise resolvable
//! query. Only a catalog miss aborts before the network is touched.

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::candidates::{search_phrases, slug_candidates};
use crate::catalog::{lookup_asset, lookup_interval, Asset, CatalogError, Interval};
use crate::clock::TimeClient;
use crate::discovery::DiscoveryClient;
use crate::pricing::PricingClient;
use crate::score::score_record;
use crate::types::{MarketRecord, OutcomeToken, ResolutionResult, Trail};

/// How candidate markets are located upstream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LocateStrategy {
    /// Guess deterministic slugs and fetch each by identifier. First
    /// validated hit wins.
    Slug,
    /// Full-text search, accumulate validated hits, score once, pick the
    /// best.
    Search,
}

/// Resolver configuration. Chosen up front per resolver instance, never
/// switched per call.
#[derive(Clone, Debug)]
pub struct ResolverConfig {
    pub strategy: LocateStrategy,
    /// Also try the windows either side of the current one, to absorb
    /// indexing lag and boundary races.
    pub check_adjacent_windows: bool,
    /// Search strategy: stop issuing queries once this many validated
    /// hits have accumulated. An early-exit threshold, not a cap.
    pub min_search_hits: usize,
    /// Skip pricing calls entirely (discovery-only resolution).
    pub fetch_prices: bool,
    /// Prefer the venue clock over the local one.
    pub use_server_time: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            strategy: LocateStrategy::Slug,
            check_adjacent_windows: true,
            min_search_hits: 3,
            fetch_prices: true,
            use_server_time: true,
        }
    }
}

/// Why a record cannot back a resolution, or None when it can.
///
/// Absent flags pass: only an explicit closed/archived/inactive/no-book
/// marking rejects. Fewer than 2 usable token ids rejects outright; more
/// than 2 passes and the extraction step takes the first 2.
fn rejection_reason(market: &MarketRecord) -> Option<String> {
    if market.closed == Some(true) {
        return Some("market closed".to_string());
    }
    if market.archived == Some(true) {
        return Some("market archived".to_string());
    }
    if market.active == Some(false) {
        return Some("market inactive".to_string());
    }
    if market.enable_order_book == Some(false) {
        return Some("order book disabled".to_string());
    }
    let tokens = market.usable_token_ids().len();
    if tokens < 2 {
        return Some(format!("{} outcome tokens, need 2", tokens));
    }
    None
}

/// Map the chosen record's token ids to up/down sides.
///
/// Outcome labels win when both "up" and "down" parse out of them;
/// otherwise positional order (first = up) is assumed and the assumption
/// is recorded in the trail, since positional order is not guaranteed
/// upstream.
fn outcome_sides(market: &MarketRecord, trail: &mut Trail) -> (OutcomeToken, OutcomeToken) {
    let ids = market.usable_token_ids();
    if ids.len() > 2 {
        trail.note(format!(
            "{}: {} outcome tokens, using first 2",
            market.identifier(),
            ids.len()
        ));
    }

    let labels: Vec<String> = market.outcomes.iter().map(|o| o.trim().to_lowercase()).collect();
    let up_pos = labels.iter().position(|l| l == "up");
    let down_pos = labels.iter().position(|l| l == "down");

    let (up_idx, down_idx) = match (up_pos, down_pos) {
        (Some(u), Some(d)) if u != d && u < ids.len() && d < ids.len() => (u, d),
        _ => {
            trail.note(format!(
                "{}: no up/down outcome labels, assuming positional order",
                market.identifier()
            ));
            (0, 1)
        }
    };

    let up = OutcomeToken { token_id: ids[up_idx].to_string(), label: "Up".to_string(), price: None };
    let down =
        OutcomeToken { token_id: ids[down_idx].to_string(), label: "Down".to_string(), price: None };
    (up, down)
}

/// Resolves the current up/down contract for an (asset, interval) pair.
pub struct MarketResolver {
    discovery: DiscoveryClient,
    pricing: PricingClient,
    clock: TimeClient,
    config: ResolverConfig,
}

impl MarketResolver {
    /// Create a resolver with default configuration and endpoints.
    pub fn new() -> Result<Self> {
        Self::with_config(ResolverConfig::default())
    }

    /// Create a resolver with custom configuration and default endpoints.
    pub fn with_config(config: ResolverConfig) -> Result<Self> {
        Ok(Self {
            discovery: DiscoveryClient::new()?,
            pricing: PricingClient::new()?,
            clock: TimeClient::new()?,
            config,
        })
    }

    /// Wire the resolver to explicit clients (tests, self-hosted gateways).
    pub fn with_clients(
        discovery: DiscoveryClient,
        pricing: PricingClient,
        clock: TimeClient,
        config: ResolverConfig,
    ) -> Self {
        Self { discovery, pricing, clock, config }
    }

    /// Resolve the current contract for (asset, interval).
    ///
    /// Catalog misses fail fast as `Err`. Every network-dependent failure
    /// is an `Ok` result with `found = false` and a populated trail.
    pub async fn resolve(
        &self,
        asset: &str,
        interval: &str,
    ) -> Result<ResolutionResult, CatalogError> {
        let asset = lookup_asset(asset)?;
        let interval = lookup_interval(interval)?;

        let now = if self.config.use_server_time {
            self.clock.now_seconds().await
        } else {
            chrono::Utc::now().timestamp()
        };

        Ok(self.run(asset, interval, now).await)
    }

    /// Resolve against an explicit reference time instead of the clock.
    pub async fn resolve_at(
        &self,
        asset: &str,
        interval: &str,
        now: i64,
    ) -> Result<ResolutionResult, CatalogError> {
        let asset = lookup_asset(asset)?;
        let interval = lookup_interval(interval)?;
        Ok(self.run(asset, interval, now).await)
    }

    async fn run(&self, asset: &Asset, interval: &Interval, now: i64) -> ResolutionResult {
        info!("Resolving {}/{} at now={}", asset.symbol, interval.label, now);
        let mut trail = Trail::default();

        let located = match self.config.strategy {
            LocateStrategy::Slug => self.locate_by_slug(asset, interval, now, &mut trail).await,
            LocateStrategy::Search => self.locate_by_search(asset, interval, &mut trail).await,
        };

        let market = match located {
            Some(m) => m,
            None => {
                warn!(
                    "No market resolved for {}/{} after {} candidates",
                    asset.symbol,
                    interval.label,
                    trail.tried.len()
                );
                return ResolutionResult::not_found(trail);
            }
        };

        let (mut up, mut down) = outcome_sides(&market, &mut trail);

        if self.config.fetch_prices {
            let prices =
                self.fetch_prices(&[up.token_id.clone(), down.token_id.clone()], &mut trail).await;
            up.price = prices[0];
            down.price = prices[1];
        }

        info!(
            "Resolved {}: up={:?} down={:?}",
            market.identifier(),
            up.price,
            down.price
        );
        ResolutionResult::resolved(
            market.question.clone(),
            market.identifier().to_string(),
            up,
            down,
            trail,
        )
    }

    /// Deterministic strategy: fetch each guessed slug in priority order,
    /// short-circuit on the first validated hit.
    async fn locate_by_slug(
        &self,
        asset: &Asset,
        interval: &Interval,
        now: i64,
        trail: &mut Trail,
    ) -> Option<MarketRecord> {
        for slug in slug_candidates(asset, interval, now, self.config.check_adjacent_windows) {
            trail.tried(&slug);
            match self.discovery.get_market_by_slug(&slug).await {
                Ok(Some(market)) => {
                    if let Some(reason) = rejection_reason(&market) {
                        debug!("Rejecting {}: {}", slug, reason);
                        trail.note(format!("{}: {}", slug, reason));
                        continue;
                    }
                    info!("Validated candidate: {}", slug);
                    return Some(market);
                }
                Ok(None) => {
                    debug!("Slug not indexed: {}", slug);
                }
                Err(e) => {
                    warn!("Discovery error for {}: {:#}", slug, e);
                    trail.error(format!("{}: {:#}", slug, e));
                }
            }
        }
        None
    }

    /// Search strategy: queries accumulate validated hits until the
    /// early-exit threshold, then one scoring pass picks the winner. A
    /// strict greater-than keeps the earliest hit on ties.
    async fn locate_by_search(
        &self,
        asset: &Asset,
        interval: &Interval,
        trail: &mut Trail,
    ) -> Option<MarketRecord> {
        let mut validated: Vec<MarketRecord> = Vec::new();

        for query in search_phrases(asset, interval) {
            trail.tried(&query);
            match self.discovery.search_markets(&query).await {
                Ok(hits) => {
                    debug!("{} hits for {:?}", hits.len(), query);
                    for market in hits {
                        if validated.iter().any(|m| m.identifier() == market.identifier()) {
                            continue;
                        }
                        // Rejections stay out of the trail here: a single
                        // query can return dozens of unrelated markets.
                        if let Some(reason) = rejection_reason(&market) {
                            debug!("Rejecting {}: {}", market.identifier(), reason);
                            continue;
                        }
                        validated.push(market);
                    }
                }
                Err(e) => {
                    warn!("Search error for {:?}: {:#}", query, e);
                    trail.error(format!("{}: {:#}", query, e));
                }
            }
            if validated.len() >= self.config.min_search_hits {
                debug!("Early exit with {} validated hits", validated.len());
                break;
            }
        }

        let mut best: Option<(i32, MarketRecord)> = None;
        for market in validated {
            let score = score_record(&market, asset, interval);
            debug!("Score {} for {}", score, market.identifier());
            if best.as_ref().map_or(true, |(top, _)| score > *top) {
                best = Some((score, market));
            }
        }
        best.map(|(score, market)| {
            info!("Selected {} (score {})", market.identifier(), score);
            market
        })
    }

    /// Batch first, then a per-token fallback for whatever the batch call
    /// missed. Price failures degrade to None; the market itself stays
    /// resolved.
    async fn fetch_prices(&self, token_ids: &[String; 2], trail: &mut Trail) -> [Option<f64>; 2] {
        let mut prices: [Option<f64>; 2] = [None, None];

        match self.pricing.get_midpoints(token_ids).await {
            Ok(map) => {
                for (i, id) in token_ids.iter().enumerate() {
                    prices[i] = map.get(id).copied().flatten();
                }
            }
            Err(e) => {
                warn!("Batch midpoint call failed: {:#}", e);
                trail.error(format!("midpoints: {:#}", e));
            }
        }

        for (i, id) in token_ids.iter().enumerate() {
            if prices[i].is_some() {
                continue;
            }
            match self.pricing.get_midpoint(id).await {
                Ok(Some(p)) => prices[i] = Some(p),
                Ok(None) => trail.note(format!("no usable midpoint for token {}", id)),
                Err(e) => {
                    warn!("Midpoint call failed for {}: {:#}", id, e);
                    trail.error(format!("midpoint {}: {:#}", id, e));
                }
            }
        }

        prices
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(json: &str) -> MarketRecord {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_rejection_closed_archived_inactive() {
        let closed =
            record(r#"{"id": "1", "closed": true, "clobTokenIds": ["a", "b"]}"#);
        assert_eq!(rejection_reason(&closed).as_deref(), Some("market closed"));

        let archived =
            record(r#"{"id": "1", "archived": true, "clobTokenIds": ["a", "b"]}"#);
        assert_eq!(rejection_reason(&archived).as_deref(), Some("market archived"));

        let inactive =
            record(r#"{"id": "1", "active": false, "clobTokenIds": ["a", "b"]}"#);
        assert_eq!(rejection_reason(&inactive).as_deref(), Some("market inactive"));

        let no_book =
            record(r#"{"id": "1", "enableOrderBook": false, "clobTokenIds": ["a", "b"]}"#);
        assert_eq!(rejection_reason(&no_book).as_deref(), Some("order book disabled"));
    }

    #[test]
    fn test_absent_flags_pass() {
        let bare = record(r#"{"id": "1", "clobTokenIds": ["a", "b"]}"#);
        assert_eq!(rejection_reason(&bare), None);
    }

    #[test]
    fn test_rejection_on_token_count() {
        let none = record(r#"{"id": "1"}"#);
        assert_eq!(rejection_reason(&none).as_deref(), Some("0 outcome tokens, need 2"));

        let one = record(r#"{"id": "1", "clobTokenIds": "[\"a\"]"}"#);
        assert_eq!(rejection_reason(&one).as_deref(), Some("1 outcome tokens, need 2"));

        let three = record(r#"{"id": "1", "clobTokenIds": ["a", "b", "c"]}"#);
        assert_eq!(rejection_reason(&three), None);
    }

    #[test]
    fn test_outcome_sides_follow_labels() {
        let reversed = record(
            r#"{"id": "1", "clobTokenIds": ["first", "second"], "outcomes": ["Down", "Up"]}"#,
        );
        let mut trail = Trail::default();
        let (up, down) = outcome_sides(&reversed, &mut trail);
        assert_eq!(up.token_id, "second");
        assert_eq!(down.token_id, "first");
        assert!(trail.notes.is_empty());
    }

    #[test]
    fn test_outcome_sides_positional_fallback_is_noted() {
        let unlabeled = record(r#"{"id": "1", "clobTokenIds": ["first", "second"]}"#);
        let mut trail = Trail::default();
        let (up, down) = outcome_sides(&unlabeled, &mut trail);
        assert_eq!(up.token_id, "first");
        assert_eq!(down.token_id, "second");
        assert_eq!(trail.notes.len(), 1);
        assert!(trail.notes[0].contains("positional"));
    }

    #[test]
    fn test_outcome_sides_truncate_extra_tokens() {
        let wide = record(r#"{"id": "1", "clobTokenIds": ["a", "b", "c", "d"]}"#);
        let mut trail = Trail::default();
        let (up, down) = outcome_sides(&wide, &mut trail);
        assert_eq!(up.token_id, "a");
        assert_eq!(down.token_id, "b");
        assert!(trail.notes.iter().any(|n| n.contains("using first 2")));
    }

    #[test]
    fn test_default_config() {
        let config = ResolverConfig::default();
        assert_eq!(config.strategy, LocateStrategy::Slug);
        assert!(config.check_adjacent_windows);
        assert_eq!(config.min_search_hits, 3);
        assert!(config.fetch_prices);
    }
}
