//! Error types for fetching and extracting cottage listings
//!
//! Crawl-page failures are fatal to a crawl, detail-page failures are not.
//! Both flow through [`CrawlError`] so the pipeline streams share one item type.

use reqwest::StatusCode;

/// A page could not be fetched
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The site-relative path could not be joined onto the base authority
    #[error("Invalid page path '{path}': {source}")]
    InvalidUrl {
        path: String,
        #[source]
        source: url::ParseError,
    },

    /// A link carried its own scheme or host instead of a site-relative path
    #[error("Link '{path}' points outside {base}")]
    OffSite { path: String, base: String },

    /// The request did not complete within the configured timeout
    #[error("Timed out fetching {url}")]
    Timeout { url: String },

    /// Connection, TLS or body decoding failure
    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-2xx status
    #[error("{url} returned status {status}")]
    Status { url: String, status: StatusCode },
}

/// A listing's price text did not contain a `DDD.DD` amount
///
/// Raised for the whole page: a missing price means the page layout changed.
#[derive(Debug, thiserror::Error)]
#[error("No price found for listing '{listing}' in text '{text}'")]
pub struct MalformedPriceError {
    pub listing: String,
    pub text: String,
}

/// An element the extractors rely on is missing from a page
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("Failed to parse selector '{selector}': {error}")]
    InvalidSelector { selector: String, error: String },

    #[error("Required element '{selector}' not found")]
    MissingElement { selector: String },

    #[error("Element '{selector}' has no '{attr}' attribute")]
    MissingAttribute { selector: String, attr: String },
}

/// Any failure while crawling or filtering listings
#[derive(Debug, thiserror::Error)]
pub enum CrawlError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    MalformedPrice(#[from] MalformedPriceError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),
}
