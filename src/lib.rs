//! Crawl cottages4you search results and keep the cottages that fit a budget
//! and a description.

pub mod error;
pub mod models;
pub mod scrapers;

pub use error::{CrawlError, ExtractionError, FetchError, MalformedPriceError};
pub use models::{ListingDetail, ListingSummary};
pub use scrapers::{
    crawl_listings, extract_detail, extract_listings, filter_listings, HttpFetcher, PageFetcher,
    PageHandle, SearchRequest, SiteConfig,
};

use futures::Stream;

/// Crawl every results page for `request` and yield the listings that match it
pub fn search<'a, F>(
    fetcher: &'a F,
    config: &SiteConfig,
    request: &'a SearchRequest,
) -> impl Stream<Item = Result<ListingSummary, CrawlError>> + 'a
where
    F: PageFetcher + ?Sized,
{
    let listings = crawl_listings(fetcher, config.first_page(request));
    filter_listings(listings, fetcher, request)
}
