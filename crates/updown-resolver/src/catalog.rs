//! Static asset and interval catalog
//!
//! Assets and intervals are fixed, enumerable sets. Lookups fail before any
//! network call is made, so a typo'd symbol never burns a discovery round
//! trip.

use thiserror::Error;

/// Catalog lookup failure. The only error category surfaced as `Err` from
/// a resolution; everything network-shaped lands in the result trail.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("unknown asset: {0}")]
    UnknownAsset(String),
    #[error("unsupported interval: {0}")]
    UnsupportedInterval(String),
}

/// A tradeable asset: canonical symbol plus the alias strings market
/// creators use interchangeably in slugs and titles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Asset {
    pub symbol: &'static str,
    /// Symbol first, then common full names.
    pub aliases: &'static [&'static str],
}

impl Asset {
    pub fn primary_alias(&self) -> &'static str {
        self.aliases[0]
    }
}

/// A contract interval: short label, window duration, and the written-out
/// phrase variants seen in market titles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Interval {
    pub label: &'static str,
    /// Must evenly divide a day so epoch alignment is meaningful.
    pub duration_secs: i64,
    pub phrases: &'static [&'static str],
}

const ASSETS: &[Asset] = &[
    Asset { symbol: "btc", aliases: &["btc", "bitcoin"] },
    Asset { symbol: "eth", aliases: &["eth", "ethereum"] },
    Asset { symbol: "sol", aliases: &["sol", "solana"] },
    Asset { symbol: "xrp", aliases: &["xrp", "ripple"] },
];

const INTERVALS: &[Interval] = &[
    Interval { label: "5m", duration_secs: 300, phrases: &["5 minute", "5-minute", "five minute"] },
    Interval { label: "15m", duration_secs: 900, phrases: &["15 minute", "15-minute", "fifteen minute"] },
    Interval { label: "1h", duration_secs: 3600, phrases: &["1 hour", "hourly", "one hour"] },
];

/// Case-insensitive symbol lookup.
pub fn lookup_asset(symbol: &str) -> Result<&'static Asset, CatalogError> {
    let wanted = symbol.trim().to_lowercase();
    ASSETS
        .iter()
        .find(|a| a.symbol == wanted)
        .ok_or_else(|| CatalogError::UnknownAsset(symbol.to_string()))
}

/// Case-insensitive interval label lookup.
pub fn lookup_interval(label: &str) -> Result<&'static Interval, CatalogError> {
    let wanted = label.trim().to_lowercase();
    INTERVALS
        .iter()
        .find(|i| i.label == wanted)
        .ok_or_else(|| CatalogError::UnsupportedInterval(label.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_asset() {
        let btc = lookup_asset("btc").unwrap();
        assert_eq!(btc.symbol, "btc");
        assert_eq!(btc.aliases, &["btc", "bitcoin"]);
        assert_eq!(btc.primary_alias(), "btc");
    }

    #[test]
    fn test_lookup_asset_case_insensitive() {
        assert_eq!(lookup_asset("ETH").unwrap().symbol, "eth");
        assert_eq!(lookup_asset(" Sol ").unwrap().symbol, "sol");
    }

    #[test]
    fn test_lookup_asset_unknown() {
        assert_eq!(
            lookup_asset("doge"),
            Err(CatalogError::UnknownAsset("doge".to_string()))
        );
    }

    #[test]
    fn test_lookup_interval() {
        let five = lookup_interval("5m").unwrap();
        assert_eq!(five.duration_secs, 300);
        assert_eq!(lookup_interval("1H").unwrap().duration_secs, 3600);
    }

    #[test]
    fn test_lookup_interval_unsupported() {
        assert_eq!(
            lookup_interval("2m"),
            Err(CatalogError::UnsupportedInterval("2m".to_string()))
        );
    }

    #[test]
    fn test_durations_divide_a_day() {
        for interval in INTERVALS {
            assert_eq!(86_400 % interval.duration_secs, 0, "{}", interval.label);
        }
    }

    #[test]
    fn test_aliases_lead_with_symbol() {
        for asset in ASSETS {
            assert_eq!(asset.aliases[0], asset.symbol);
        }
    }
}
