use crate::error::CrawlError;
use crate::models::ListingSummary;
use crate::scrapers::listing::extract_listings;
use crate::scrapers::traits::PageFetcher;
use crate::scrapers::types::PageHandle;
use futures::stream::{self, Stream, TryStreamExt};
use tracing::{debug, info};

/// Lazily crawl every results page starting from `first`
///
/// Pages are fetched one at a time and only when the consumer has drained the
/// previous page's listings, so taking one item fetches exactly one page.
/// The first fetch or price error is yielded and ends the stream; to restart,
/// call again with the same starting handle.
pub fn crawl_listings<'a, F>(
    fetcher: &'a F,
    first: PageHandle,
) -> impl Stream<Item = Result<ListingSummary, CrawlError>> + 'a
where
    F: PageFetcher + ?Sized,
{
    stream::try_unfold((first, 1usize), move |(handle, page_number)| {
        next_page(fetcher, handle, page_number)
    })
    .map_ok(|listings| stream::iter(listings.into_iter().map(Ok::<_, CrawlError>)))
    .try_flatten()
}

/// One transition of the crawl: fetch `handle`, hand back its listings and the next state
async fn next_page<F>(
    fetcher: &F,
    handle: PageHandle,
    page_number: usize,
) -> Result<Option<(Vec<ListingSummary>, (PageHandle, usize))>, CrawlError>
where
    F: PageFetcher + ?Sized,
{
    let path = match handle {
        PageHandle::Next(path) => path,
        PageHandle::Done => {
            debug!("No more result pages after page {}", page_number - 1);
            return Ok(None);
        }
    };

    debug!("Scraping results page {}: {}", page_number, path);
    let html = fetcher.fetch(&path).await?;
    let page = extract_listings(&html)?;
    info!(
        "Results page {}: {} listings",
        page_number,
        page.listings.len()
    );

    Ok(Some((page.listings, (page.next, page_number + 1))))
}
