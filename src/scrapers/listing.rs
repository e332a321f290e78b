use crate::error::{CrawlError, MalformedPriceError};
use crate::models::ListingSummary;
use crate::scrapers::query::{text_of, Query};
use crate::scrapers::types::PageHandle;
use regex::Regex;
use rust_decimal::Decimal;
use scraper::{ElementRef, Html};
use std::sync::LazyLock;
use tracing::debug;

const PROPERTY_INFO_CLASS: &str = "rst_propertyInfo";
const BASE_PRICE_CLASS: &str = "rst_basePrice";
const NOW_PRICE_CLASS: &str = "rst_spnNowPrice";
const PAGINATION_LINK_CLASS: &str = "PaginationLink";

/// Three digits, any single separator, two digits
static PRICE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]{3}).([0-9]{2})").expect("hardcoded price pattern is valid")
});

/// Everything extracted from one search results page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingPage {
    /// Listings in document order, one entry per identifier
    pub listings: Vec<ListingSummary>,
    pub next: PageHandle,
}

/// Parse a results page into its listings and the next page to fetch
///
/// Fails on the first listing whose price cannot be read: a missing price
/// means the page layout has changed and the crawl must not carry on blindly.
pub fn extract_listings(html: &str) -> Result<ListingPage, CrawlError> {
    let document = Html::parse_document(html);

    let property_info = Query::class(PROPERTY_INFO_CLASS)?;
    let link = Query::tag("a")?;
    let base_price = Query::class(BASE_PRICE_CLASS)?;
    let now_price = Query::class(NOW_PRICE_CLASS)?;

    let mut listings: Vec<ListingSummary> = Vec::new();
    for block in property_info.all(&document) {
        let anchor = link.first_in(block).ok_or_else(|| link.missing())?;
        let identifier = link.attr(anchor, "href")?.to_string();
        let price = block_price(block, &identifier, &base_price, &now_price)?;

        // Same listing twice on a page: keep its position, take the later price
        match listings.iter_mut().find(|l| l.identifier == identifier) {
            Some(existing) => existing.price = price,
            None => listings.push(ListingSummary::new(identifier, price)),
        }
    }

    let next = next_page(&document)?;
    debug!(
        "Extracted {} listings, next page: {:?}",
        listings.len(),
        next
    );

    Ok(ListingPage { listings, next })
}

/// Price of one property block, preferring the discounted "now" price
fn block_price(
    block: ElementRef<'_>,
    identifier: &str,
    base_price: &Query,
    now_price: &Query,
) -> Result<Decimal, MalformedPriceError> {
    let malformed = |text: String| MalformedPriceError {
        listing: identifier.to_string(),
        text,
    };

    let price_region = base_price
        .first_in(block)
        .ok_or_else(|| malformed(String::new()))?;
    let price_text = match now_price.first_in(price_region) {
        Some(discounted) => text_of(discounted),
        None => text_of(price_region),
    };

    parse_price(&price_text).ok_or_else(|| malformed(price_text.trim().to_string()))
}

/// First `DDD.DD` amount in `text`, whatever the separator
pub fn parse_price(text: &str) -> Option<Decimal> {
    let captures = PRICE_REGEX.captures(text)?;
    let pence: i64 = format!("{}{}", &captures[1], &captures[2]).parse().ok()?;
    Some(Decimal::new(pence, 2))
}

/// Target of the last pagination link whose text mentions "next"
fn next_page(document: &Html) -> Result<PageHandle, CrawlError> {
    let pagination = Query::tag_with_class("a", PAGINATION_LINK_CLASS)?;

    let mut next = None;
    for anchor in pagination.all(document) {
        if !text_of(anchor).to_lowercase().contains("next") {
            continue;
        }
        match anchor.value().attr("href") {
            Some(href) => next = Some(href.to_string()),
            None => debug!("Ignoring pagination link without href"),
        }
    }

    Ok(PageHandle::from(next))
}
