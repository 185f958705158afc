//! Relevance scoring for search-strategy candidates
//!
//! Deterministic and explainable on purpose: a resolution that picked the
//! wrong contract must be reconstructible from its inputs alone. Scores
//! are additive over case-insensitive substring features of the question
//! text plus the identifier.

use crate::catalog::{Asset, Interval};
use crate::types::MarketRecord;

const ALIAS_WEIGHT: i32 = 5;
const DIRECTION_WEIGHT: i32 = 3;
const INTERVAL_WEIGHT: i32 = 2;

/// Directional wording used in contract titles. "up"/"down" alone also
/// match their combined forms, so the combined forms are listed for
/// readability, not necessity.
const DIRECTION_MARKERS: &[&str] = &["up or down", "higher or lower", "up", "down"];

/// Score a record against the requested asset and interval. Pure function
/// of (question, identifier, asset, interval).
pub fn score_record(record: &MarketRecord, asset: &Asset, interval: &Interval) -> i32 {
    let haystack = format!("{} {}", record.question, record.identifier()).to_lowercase();

    let mut score = 0;
    for alias in asset.aliases {
        if haystack.contains(alias) {
            score += ALIAS_WEIGHT;
        }
    }
    if DIRECTION_MARKERS.iter().any(|m| haystack.contains(m)) {
        score += DIRECTION_WEIGHT;
    }
    if haystack.contains(interval.label) || interval.phrases.iter().any(|p| haystack.contains(p)) {
        score += INTERVAL_WEIGHT;
    }
    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{lookup_asset, lookup_interval};

    fn record(question: &str, slug: &str) -> MarketRecord {
        serde_json::from_str(&format!(
            r#"{{"id": "1", "slug": "{}", "question": "{}"}}"#,
            slug, question
        ))
        .unwrap()
    }

    #[test]
    fn test_full_match_scores_all_features() {
        let btc = lookup_asset("btc").unwrap();
        let five = lookup_interval("5m").unwrap();

        // Both aliases + direction + interval phrase: 5 + 5 + 3 + 2.
        let r = record("Bitcoin Up or Down - 5 minute", "btc-up-or-down-5m-1700000100");
        assert_eq!(score_record(&r, btc, five), 15);
    }

    #[test]
    fn test_unrelated_record_scores_low() {
        let btc = lookup_asset("btc").unwrap();
        let five = lookup_interval("5m").unwrap();

        let r = record("Will the Fed cut rates in March", "fed-rates-march");
        assert_eq!(score_record(&r, btc, five), 0);
    }

    #[test]
    fn test_alias_weight_dominates_direction() {
        let eth = lookup_asset("eth").unwrap();
        let five = lookup_interval("5m").unwrap();

        let on_asset = record("Ethereum higher or lower", "x");
        let off_asset = record("Something up or down 5 minute", "y");
        assert!(score_record(&on_asset, eth, five) > score_record(&off_asset, eth, five));
    }

    #[test]
    fn test_scorer_is_pure() {
        let sol = lookup_asset("sol").unwrap();
        let hour = lookup_interval("1h").unwrap();

        let r = record("Solana Up or Down hourly", "sol-up-or-down-1h-1700000100");
        let first = score_record(&r, sol, hour);
        for _ in 0..3 {
            assert_eq!(score_record(&r, sol, hour), first);
        }
    }

    #[test]
    fn test_case_insensitive_matching() {
        let xrp = lookup_asset("xrp").unwrap();
        let fifteen = lookup_interval("15m").unwrap();

        let upper = record("RIPPLE UP OR DOWN", "XRP-UP-OR-DOWN-15M-1");
        let lower = record("ripple up or down", "xrp-up-or-down-15m-1");
        assert_eq!(score_record(&upper, xrp, fifteen), score_record(&lower, xrp, fifteen));
    }
}
