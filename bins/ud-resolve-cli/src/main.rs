//! Up/Down Market Resolver CLI
//!
//! Commands:
//! - `resolve`: resolve the current contract for an (asset, interval) pair
//! - `check`: probe discovery/pricing/time endpoint connectivity
//!
//! # Usage
//! ```bash
//! ud_resolve resolve --asset btc --interval 5m
//! ud_resolve resolve --asset eth --interval 15m --strategy search --out resolved.json
//! ud_resolve resolve --asset btc --interval 5m --asof 2026-08-05T12:00:00Z --skip-prices
//! ud_resolve check
//! ```

use anyhow::Result;
use chrono::DateTime;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::{error, info, warn};

use updown_resolver::clock::TimeClient;
use updown_resolver::discovery::DiscoveryClient;
use updown_resolver::pricing::PricingClient;
use updown_resolver::{
    LocateStrategy, MarketResolver, ResolverConfig, DISCOVERY_API_BASE, PRICING_API_BASE,
};

#[derive(Parser)]
#[command(name = "ud_resolve")]
#[command(about = "Up/Down market resolver CLI")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StrategyArg {
    /// Guess deterministic slugs, first validated hit wins
    Slug,
    /// Full-text search with relevance scoring
    Search,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the current contract for an asset/interval pair
    Resolve {
        /// Asset symbol (btc, eth, sol, xrp)
        #[arg(long)]
        asset: String,

        /// Interval label (5m, 15m, 1h)
        #[arg(long)]
        interval: String,

        /// Market location strategy
        #[arg(long, value_enum, default_value = "slug")]
        strategy: StrategyArg,

        /// Reference time (RFC 3339, default: venue clock, local fallback)
        #[arg(long)]
        asof: Option<String>,

        /// Output file for the result JSON (default: stdout)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Skip pricing calls, resolve the market only
        #[arg(long, default_value = "false")]
        skip_prices: bool,
    },

    /// Probe connectivity to the discovery, pricing, and time endpoints
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt().with_env_filter(env_filter).with_target(false).init();

    match cli.command {
        Commands::Resolve { asset, interval, strategy, asof, out, skip_prices } => {
            run_resolve(asset, interval, strategy, asof, out, skip_prices).await
        }
        Commands::Check => run_check().await,
    }
}

async fn run_resolve(
    asset: String,
    interval: String,
    strategy: StrategyArg,
    asof: Option<String>,
    out: Option<PathBuf>,
    skip_prices: bool,
) -> Result<()> {
    info!("=== Up/Down Market Resolver ===");
    info!("Discovery API: {}", DISCOVERY_API_BASE);
    info!("Pricing API: {}", PRICING_API_BASE);
    info!("Asset: {}  Interval: {}  Strategy: {:?}", asset, interval, strategy);
    info!("");

    let config = ResolverConfig {
        strategy: match strategy {
            StrategyArg::Slug => LocateStrategy::Slug,
            StrategyArg::Search => LocateStrategy::Search,
        },
        fetch_prices: !skip_prices,
        ..ResolverConfig::default()
    };
    let resolver = MarketResolver::with_config(config)?;

    let resolution = match asof {
        Some(ref s) => {
            let asof_time = DateTime::parse_from_rfc3339(s)
                .map_err(|e| anyhow::anyhow!("Invalid asof time '{}': {}", s, e))?;
            info!("Reference time (asof): {}", asof_time);
            resolver.resolve_at(&asset, &interval, asof_time.timestamp()).await
        }
        None => resolver.resolve(&asset, &interval).await,
    };

    let result = match resolution {
        Ok(r) => r,
        Err(e) => {
            error!("{}", e);
            error!("Supported assets: btc, eth, sol, xrp. Intervals: 5m, 15m, 1h.");
            anyhow::bail!("{}", e);
        }
    };

    if result.found {
        info!("");
        info!("=== Resolution SUCCESS ===");
        info!("Question: {}", result.question.as_deref().unwrap_or(""));
        info!("Market: {}", result.market_id.as_deref().unwrap_or(""));
        if let Some(up) = &result.up {
            info!("  {}: {} price={:?}", up.label, up.token_id, up.price);
        }
        if let Some(down) = &result.down {
            info!("  {}: {} price={:?}", down.label, down.token_id, down.price);
        }
        for note in &result.notes {
            info!("Note: {}", note);
        }
    } else {
        warn!("");
        warn!("=== Resolution MISS ===");
        warn!("Candidates tried ({}):", result.tried.len());
        for candidate in &result.tried {
            warn!("  {}", candidate);
        }
        if let Some(err) = &result.last_error {
            warn!("Last error: {}", err);
        }
    }

    let json_output = serde_json::to_string_pretty(&result)?;
    if let Some(out_path) = out {
        if let Some(parent) = out_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&out_path, &json_output).await?;
        info!("");
        info!("Output written to: {}", out_path.display());
    } else {
        println!();
        println!("{}", json_output);
    }

    if !result.found {
        anyhow::bail!("No market resolved");
    }

    Ok(())
}

async fn run_check() -> Result<()> {
    info!("=== Connectivity Check ===");
    info!("Discovery API: {}", DISCOVERY_API_BASE);
    info!("Pricing API: {}", PRICING_API_BASE);
    info!("");

    let mut failures = 0;

    match DiscoveryClient::new()?.test_connectivity().await {
        Ok(_) => info!("Discovery: OK"),
        Err(e) => {
            error!("Discovery: {}", e);
            failures += 1;
        }
    }

    match PricingClient::new()?.test_connectivity().await {
        Ok(_) => info!("Pricing: OK"),
        Err(e) => {
            error!("Pricing: {}", e);
            failures += 1;
        }
    }

    let time_client = TimeClient::new()?;
    match time_client.server_time_seconds().await {
        Ok(ts) => info!("Time endpoint: OK (venue now={})", ts),
        Err(e) => {
            // Not fatal: the resolver degrades to the local clock.
            warn!("Time endpoint unavailable ({}), local clock will be used", e);
        }
    }

    if failures > 0 {
        anyhow::bail!("{} endpoint(s) unreachable", failures);
    }
    info!("");
    info!("All endpoints reachable");
    Ok(())
}
