mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use cottage_scout::{search, HttpFetcher, SearchRequest, SiteConfig};
use futures::StreamExt;
use rust_decimal::Decimal;
use serde_json::json;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; stdout is reserved for results
    let default_level = if cli.debug {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &cli.base_url {
        Some(base_url) => SiteConfig::new(base_url.clone()),
        None => SiteConfig::default(),
    };
    config.timeout = Duration::from_secs(cli.timeout_secs);

    let mut request = SearchRequest::new(cli.start_date, cli.nights)
        .with_keywords(&cli.description_contains);
    if let Some(price_point) = cli.price_point {
        request = request.with_price_ceiling(Decimal::from(price_point));
    }

    info!(
        "Searching {} for {} nights from {}",
        config.base_url, request.nights, request.start_date
    );

    let fetcher = HttpFetcher::new(config.clone())?;
    let results = search(&fetcher, &config, &request);
    let mut results = std::pin::pin!(results.take(cli.limit.unwrap_or(usize::MAX)));

    let mut found = 0usize;
    while let Some(listing) = results.next().await {
        let listing = listing.context("Crawl aborted")?;
        let url = match config.resolve(&listing.identifier) {
            Ok(url) => url,
            Err(err) => {
                warn!("Skipping {}: {}", listing.identifier, err);
                continue;
            }
        };

        if cli.json {
            let line = json!({ "url": url.as_str(), "price": listing.price });
            println!("{}", serde_json::to_string(&line)?);
        } else {
            println!("{} {}", url, listing.price);
        }
        found += 1;
    }

    info!("✅ Found {} matching cottages", found);

    Ok(())
}
