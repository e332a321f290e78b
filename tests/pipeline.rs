use async_trait::async_trait;
use chrono::NaiveDate;
use cottage_scout::*;
use futures::StreamExt;
use reqwest::StatusCode;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::num::NonZeroU32;
use std::sync::Mutex;

/// Serves canned pages and records every path requested
#[derive(Default)]
struct ScriptedFetcher {
    pages: HashMap<String, String>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedFetcher {
    fn page(mut self, path: &str, html: String) -> Self {
        self.pages.insert(path.to_string(), html);
        self
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn fetch_count(&self, path: &str) -> usize {
        self.calls().iter().filter(|p| p.as_str() == path).count()
    }
}

#[async_trait]
impl PageFetcher for ScriptedFetcher {
    async fn fetch(&self, path: &str) -> Result<String, FetchError> {
        self.calls.lock().unwrap().push(path.to_string());
        self.pages
            .get(path)
            .cloned()
            .ok_or_else(|| FetchError::Status {
                url: path.to_string(),
                status: StatusCode::NOT_FOUND,
            })
    }
}

fn dec(amount: &str) -> Decimal {
    amount.parse().unwrap()
}

fn results_page(listings: &[(&str, &str)], next: Option<&str>) -> String {
    let blocks: String = listings
        .iter()
        .map(|(href, price)| {
            format!(
                r#"<div class="rst_propertyInfo"><a href="{href}">Cottage</a>
                   <span class="rst_basePrice">£{price} per week</span></div>"#
            )
        })
        .collect();
    let pagination = next
        .map(|href| format!(r#"<a class="PaginationLink" href="{href}">Next &raquo;</a>"#))
        .unwrap_or_default();
    format!("<html><body>{blocks}<div>{pagination}</div></body></html>")
}

fn detail_page(description: &str, features: &str) -> String {
    format!(
        r#"<html><body>
             <div class="propertydescriptionfull">{description}</div>
             <div class="propertyfeature">{features}</div>
           </body></html>"#
    )
}

/// P1 -> P2 -> P3 with 2/2/1 listings
fn three_pages() -> ScriptedFetcher {
    ScriptedFetcher::default()
        .page(
            "/p1",
            results_page(&[("/c/a", "250.00"), ("/c/b", "301.00")], Some("/p2")),
        )
        .page(
            "/p2",
            results_page(&[("/c/c", "199.50"), ("/c/d", "450.00")], Some("/p3")),
        )
        .page("/p3", results_page(&[("/c/e", "300.00")], None))
}

fn start() -> PageHandle {
    PageHandle::Next("/p1".to_string())
}

fn request() -> SearchRequest {
    SearchRequest::new(
        NaiveDate::from_ymd_opt(2026, 6, 5).unwrap(),
        NonZeroU32::new(7).unwrap(),
    )
}

async fn collect_ok<S>(stream: S) -> Vec<ListingSummary>
where
    S: futures::Stream<Item = Result<ListingSummary, CrawlError>>,
{
    stream
        .map(|item| item.expect("unexpected crawl error"))
        .collect()
        .await
}

#[tokio::test]
async fn test_crawl_yields_every_page_in_order() {
    let fetcher = three_pages();
    let listings = collect_ok(crawl_listings(&fetcher, start())).await;

    let identifiers: Vec<_> = listings.iter().map(|l| l.identifier.as_str()).collect();
    assert_eq!(identifiers, vec!["/c/a", "/c/b", "/c/c", "/c/d", "/c/e"]);
    assert_eq!(listings[2].price, dec("199.50"));
    assert_eq!(fetcher.calls(), vec!["/p1", "/p2", "/p3"]);
}

#[tokio::test]
async fn test_first_result_fetches_one_page() {
    let fetcher = three_pages();
    let first: Vec<_> = crawl_listings(&fetcher, start()).take(1).collect().await;

    assert_eq!(first.len(), 1);
    assert_eq!(fetcher.calls(), vec!["/p1"]);
}

#[tokio::test]
async fn test_draining_first_page_does_not_fetch_second() {
    let fetcher = three_pages();
    let mut stream = std::pin::pin!(crawl_listings(&fetcher, start()));

    assert!(stream.next().await.is_some());
    assert!(stream.next().await.is_some());
    assert_eq!(fetcher.calls().len(), 1);

    assert!(stream.next().await.is_some());
    assert_eq!(fetcher.calls().len(), 2);
}

#[tokio::test]
async fn test_done_handle_fetches_nothing() {
    let fetcher = three_pages();
    let items: Vec<_> = crawl_listings(&fetcher, PageHandle::Done).collect().await;

    assert!(items.is_empty());
    assert!(fetcher.calls().is_empty());
}

#[tokio::test]
async fn test_fetch_error_aborts_crawl() {
    let fetcher = ScriptedFetcher::default().page(
        "/p1",
        results_page(&[("/c/a", "250.00")], Some("/missing")),
    );
    let items: Vec<_> = crawl_listings(&fetcher, start()).collect().await;

    assert_eq!(items.len(), 2);
    assert!(items[0].is_ok());
    assert!(matches!(
        items[1],
        Err(CrawlError::Fetch(FetchError::Status { .. }))
    ));
    assert_eq!(fetcher.calls(), vec!["/p1", "/missing"]);
}

#[tokio::test]
async fn test_malformed_price_aborts_crawl() {
    let fetcher = ScriptedFetcher::default()
        .page("/p1", results_page(&[("/c/a", "250.00")], Some("/p2")))
        .page("/p2", results_page(&[("/c/b", "POA")], Some("/p3")))
        .page("/p3", results_page(&[("/c/c", "100.00")], None));
    let items: Vec<_> = crawl_listings(&fetcher, start()).collect().await;

    assert_eq!(items.len(), 2);
    assert!(matches!(items[1], Err(CrawlError::MalformedPrice(_))));
    assert_eq!(fetcher.fetch_count("/p3"), 0);
}

#[tokio::test]
async fn test_price_ceiling_skips_detail_fetch() {
    let fetcher = three_pages()
        .page("/c/a", detail_page("Detached barn", "Garden"))
        .page("/c/c", detail_page("Detached barn", "Garden"))
        .page("/c/e", detail_page("Detached barn", "Garden"));
    let request = request()
        .with_price_ceiling(dec("300"))
        .with_keywords(["detached"]);

    let listings = collect_ok(filter_listings(
        crawl_listings(&fetcher, start()),
        &fetcher,
        &request,
    ))
    .await;

    let identifiers: Vec<_> = listings.iter().map(|l| l.identifier.as_str()).collect();
    assert_eq!(identifiers, vec!["/c/a", "/c/c", "/c/e"]);
    assert_eq!(fetcher.fetch_count("/c/b"), 0);
    assert_eq!(fetcher.fetch_count("/c/d"), 0);
}

#[tokio::test]
async fn test_price_only_filter_never_fetches_details() {
    let fetcher = three_pages();
    let request = request().with_price_ceiling(dec("300"));

    let listings = collect_ok(filter_listings(
        crawl_listings(&fetcher, start()),
        &fetcher,
        &request,
    ))
    .await;

    assert_eq!(listings.len(), 3);
    assert_eq!(fetcher.calls(), vec!["/p1", "/p2", "/p3"]);
}

#[tokio::test]
async fn test_keywords_may_be_split_across_description_and_features() {
    let fetcher = ScriptedFetcher::default()
        .page(
            "/p1",
            results_page(&[("/c/a", "250.00"), ("/c/b", "260.00")], None),
        )
        .page("/c/a", detail_page("A DETACHED cottage", "Enclosed garden"))
        .page("/c/b", detail_page("A detached cottage", "Parking"));
    let request = request().with_keywords(["Detached", "garden"]);

    let listings = collect_ok(filter_listings(
        crawl_listings(&fetcher, start()),
        &fetcher,
        &request,
    ))
    .await;

    assert_eq!(listings, vec![ListingSummary::new("/c/a", dec("250.00"))]);
}

#[tokio::test]
async fn test_broken_detail_page_skips_only_that_listing() {
    let fetcher = ScriptedFetcher::default()
        .page(
            "/p1",
            results_page(
                &[("/c/gone", "250.00"), ("/c/bare", "260.00"), ("/c/ok", "270.00")],
                None,
            ),
        )
        .page("/c/bare", "<html><body>No description here</body></html>".to_string())
        .page("/c/ok", detail_page("Detached", "Garden"));
    let request = request().with_keywords(["detached"]);

    let items: Vec<_> = filter_listings(crawl_listings(&fetcher, start()), &fetcher, &request)
        .collect()
        .await;

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].as_ref().unwrap().identifier, "/c/ok");
}

#[tokio::test]
async fn test_crawl_errors_pass_through_filter() {
    let fetcher = ScriptedFetcher::default()
        .page("/p1", results_page(&[("/c/a", "250.00")], Some("/p2")))
        .page("/p2", results_page(&[("/c/b", "n/a")], None));
    let request = request();

    let items: Vec<_> = filter_listings(crawl_listings(&fetcher, start()), &fetcher, &request)
        .collect()
        .await;

    assert_eq!(items.len(), 2);
    assert!(matches!(items[1], Err(CrawlError::MalformedPrice(_))));
}

#[tokio::test]
async fn test_search_starts_from_request_url() {
    let config = SiteConfig::default();
    let request = request();
    let first = config.search_path(&request);
    let fetcher = ScriptedFetcher::default().page(
        &first,
        results_page(&[("/c/a", "250.00")], None),
    );

    let listings = collect_ok(search(&fetcher, &config, &request)).await;

    assert_eq!(listings.len(), 1);
    assert_eq!(fetcher.calls(), vec![first]);
}
