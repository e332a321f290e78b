use crate::error::FetchError;
use async_trait::async_trait;

/// Fetches pages of the listing site by site-relative path
///
/// The crawl and the filter only talk to the site through this trait, so tests
/// can substitute scripted pages for HTTP.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// GET the page at `path` and return its body
    async fn fetch(&self, path: &str) -> Result<String, FetchError>;
}
