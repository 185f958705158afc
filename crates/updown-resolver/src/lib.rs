//! Up/Down Market Resolver
//!
//! Resolves the short-lived, recurring "will asset X go up or down in the
//! next window" contract for an (asset, interval) pair, then returns the
//! contract's current implied probabilities.
//!
//! These contracts are not addressable by a stable identifier: the right
//! one for "now" rotates every window, its slug is guessed rather than
//! looked up, and the discovery index may trail real time by a window.
//! The pipeline absorbs all of that and reports what it tried either way.
//!
//! # Components
//! - `catalog`: static asset/interval catalog
//! - `window`: epoch-aligned window math
//! - `candidates`: slug and search-phrase generation
//! - `discovery`: market discovery REST client
//! - `pricing`: midpoint pricing REST client
//! - `clock`: venue time sync with local fallback
//! - `score`: relevance scoring for search hits
//! - `resolver`: the resolution pipeline

pub mod candidates;
pub mod catalog;
pub mod clock;
pub mod discovery;
pub mod pricing;
pub mod resolver;
pub mod score;
pub mod types;
pub mod window;

pub use catalog::CatalogError;
pub use resolver::{LocateStrategy, MarketResolver, ResolverConfig};
pub use types::{MarketRecord, OutcomeToken, ResolutionResult};

/// Market discovery REST API base URL
pub const DISCOVERY_API_BASE: &str = "https://gamma-api.polymarket.com";

/// Pricing REST API base URL (also serves the /time endpoint)
pub const PRICING_API_BASE: &str = "https://clob.polymarket.com";
