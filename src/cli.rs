use chrono::NaiveDate;
use clap::Parser;
use cottage_scout::scrapers::types::DATE_FORMAT;
use regex::Regex;
use std::num::NonZeroU32;
use std::sync::LazyLock;
use url::Url;

static DATE_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d\d-\d\d-\d\d\d\d$").expect("hardcoded date pattern is valid"));

/// Find cottages to stay in using cottages4you.co.uk
#[derive(Parser, Debug)]
#[command(name = "cottage-scout", version, about)]
pub struct Cli {
    /// First night of the stay
    #[arg(long, value_name = "DD-MM-YYYY", value_parser = parse_start_date)]
    pub start_date: NaiveDate,

    /// The number of nights the cottage should be available for
    #[arg(long, default_value = "7")]
    pub nights: NonZeroU32,

    /// The most you want the cottage to cost for the stay
    #[arg(long, value_name = "GBP")]
    pub price_point: Option<u32>,

    /// Text the cottage description must include. Can be given multiple
    /// times; every string must be present for a cottage to be output.
    #[arg(long = "description-contains", value_name = "TEXT")]
    pub description_contains: Vec<String>,

    /// Stop after this many matching cottages
    #[arg(long)]
    pub limit: Option<usize>,

    /// Print one JSON object per cottage instead of "URL price"
    #[arg(long)]
    pub json: bool,

    /// Log every page fetched and every cottage skipped
    #[arg(long)]
    pub debug: bool,

    /// Site to crawl, for pointing at a mirror
    #[arg(long, value_name = "URL", hide = true)]
    pub base_url: Option<Url>,

    /// Per-request timeout
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,
}

fn parse_start_date(value: &str) -> Result<NaiveDate, String> {
    if !DATE_SHAPE.is_match(value) {
        return Err("Start date not in format DD-MM-YYYY".to_string());
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|e| format!("Start date '{value}' is not a real date: {e}"))
}
