use crate::error::CrawlError;
use crate::models::{ListingDetail, ListingSummary};
use crate::scrapers::detail::extract_detail;
use crate::scrapers::traits::PageFetcher;
use crate::scrapers::types::SearchRequest;
use futures::stream::{Stream, TryStreamExt};
use tracing::{debug, warn};

/// Keep only the listings that match `request`
///
/// The price check runs first and costs nothing. A listing's detail page is
/// fetched only when it is within budget and keywords were requested. A detail
/// page that fails to load or parse drops that listing alone; errors coming from
/// the crawl itself are passed through unchanged.
pub fn filter_listings<'a, S, F>(
    listings: S,
    fetcher: &'a F,
    request: &'a SearchRequest,
) -> impl Stream<Item = Result<ListingSummary, CrawlError>> + 'a
where
    S: Stream<Item = Result<ListingSummary, CrawlError>> + 'a,
    F: PageFetcher + ?Sized,
{
    listings.try_filter_map(move |listing| async move {
        let keep = matches_request(fetcher, request, &listing).await;
        Ok::<_, CrawlError>(keep.then_some(listing))
    })
}

async fn matches_request<F>(fetcher: &F, request: &SearchRequest, listing: &ListingSummary) -> bool
where
    F: PageFetcher + ?Sized,
{
    if !request.within_budget(listing.price) {
        debug!(
            "Skipping {}: £{} is over budget",
            listing.identifier, listing.price
        );
        return false;
    }

    if !request.needs_detail() {
        return true;
    }

    match fetch_detail(fetcher, &listing.identifier).await {
        Ok(detail) => {
            let matched = detail.contains_all(&request.required_keywords);
            if !matched {
                debug!("Skipping {}: description lacks keywords", listing.identifier);
            }
            matched
        }
        Err(err) => {
            warn!("Skipping {}: {}", listing.identifier, err);
            false
        }
    }
}

/// Fetch and parse one listing's detail page
pub async fn fetch_detail<F>(fetcher: &F, identifier: &str) -> Result<ListingDetail, CrawlError>
where
    F: PageFetcher + ?Sized,
{
    let html = fetcher.fetch(identifier).await?;
    Ok(extract_detail(&html)?)
}
