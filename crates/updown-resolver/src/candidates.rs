//! Candidate identifier generation
//!
//! The discovery service has no "current contract" endpoint, so the
//! contract for a window has to be guessed. Two shapes of guess exist:
//! deterministic slugs following the `{alias}-up-or-down-{label}-{start}`
//! naming convention, and free-text search phrases pairing an alias with
//! the directional wording used in market titles.

use crate::catalog::{Asset, Interval};
use crate::window::candidate_window_starts;

/// Fixed marker joining alias and interval label in guessed slugs.
const SLUG_MARKER: &str = "up-or-down";

/// Deterministic slug candidates, highest priority first.
///
/// Outer loop over window starts (current, previous, next), inner loop over
/// aliases with the primary alias first, so the list reads: most likely
/// window with most likely name down to least likely. Deduplicated while
/// preserving order.
pub fn slug_candidates(
    asset: &Asset,
    interval: &Interval,
    now: i64,
    include_adjacent: bool,
) -> Vec<String> {
    let mut slugs = Vec::new();
    for start in candidate_window_starts(now, interval.duration_secs, include_adjacent) {
        for alias in asset.aliases {
            let slug = format!("{}-{}-{}-{}", alias, SLUG_MARKER, interval.label, start);
            if !slugs.contains(&slug) {
                slugs.push(slug);
            }
        }
    }
    slugs
}

/// Full-text query phrases for the search strategy, highest priority first.
/// Only the primary alias is used; the search index already matches loosely
/// enough that secondary aliases add noise, not recall.
pub fn search_phrases(asset: &Asset, interval: &Interval) -> Vec<String> {
    let alias = asset.primary_alias();
    let phrase = interval.phrases[0];
    vec![
        format!("{} up or down {}", alias, phrase),
        format!("{} up or down", alias),
        format!("{} higher or lower {}", alias, phrase),
        format!("{} higher or lower", alias),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{lookup_asset, lookup_interval};

    #[test]
    fn test_slug_candidates_btc_5m() {
        let btc = lookup_asset("btc").unwrap();
        let five = lookup_interval("5m").unwrap();

        let slugs = slug_candidates(btc, five, 1_700_000_300, true);
        assert_eq!(
            slugs,
            vec![
                "btc-up-or-down-5m-1700000100",
                "bitcoin-up-or-down-5m-1700000100",
                "btc-up-or-down-5m-1699999800",
                "bitcoin-up-or-down-5m-1699999800",
                "btc-up-or-down-5m-1700000400",
                "bitcoin-up-or-down-5m-1700000400",
            ]
        );
    }

    #[test]
    fn test_slug_candidates_count_is_aliases_times_windows() {
        let eth = lookup_asset("eth").unwrap();
        let hour = lookup_interval("1h").unwrap();

        let slugs = slug_candidates(eth, hour, 1_700_000_300, true);
        assert_eq!(slugs.len(), eth.aliases.len() * 3);

        let current_only = slug_candidates(eth, hour, 1_700_000_300, false);
        assert_eq!(current_only.len(), eth.aliases.len());
    }

    #[test]
    fn test_slug_candidates_no_duplicates() {
        let sol = lookup_asset("sol").unwrap();
        let fifteen = lookup_interval("15m").unwrap();

        let slugs = slug_candidates(sol, fifteen, 1_700_000_300, true);
        let mut deduped = slugs.clone();
        deduped.dedup();
        assert_eq!(slugs, deduped);
    }

    #[test]
    fn test_search_phrases_lead_with_interval_qualified_form() {
        let btc = lookup_asset("btc").unwrap();
        let five = lookup_interval("5m").unwrap();

        let phrases = search_phrases(btc, five);
        assert_eq!(phrases[0], "btc up or down 5 minute");
        assert!(phrases.contains(&"btc higher or lower".to_string()));
        assert!(phrases.iter().all(|p| p.starts_with("btc")));
    }
}
