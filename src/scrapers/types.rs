use crate::error::FetchError;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::num::NonZeroU32;
use std::time::Duration;
use url::Url;

/// Live site all listing paths are relative to
pub const DEFAULT_BASE_URL: &str = "http://www.cottages4you.co.uk";

/// Search results path; `{nights}` and `{start_date}` are substituted per request
pub const DEFAULT_SEARCH_TEMPLATE: &str = "/england?adult=2&child=0&infant=0&pets=0&partyprofile=1&nights={nights}&start={start_date}&sortorder=4&trvlperiod=1";

/// Date format the site (and the CLI) uses for the start date
pub const DATE_FORMAT: &str = "%d-%m-%Y";

/// Where and how to reach the listing site. Built once at startup.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Scheme and host every page path is joined onto
    pub base_url: Url,
    pub search_template: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl SiteConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            ..Self::default()
        }
    }

    /// Resolve a site-relative path found on a page under `base_url`
    ///
    /// Scheme, host and any path prefix of `base_url` are always kept. Links that
    /// bring their own scheme or host are rejected with `OffSite`.
    pub fn resolve(&self, path: &str) -> Result<Url, FetchError> {
        let off_site = || FetchError::OffSite {
            path: path.to_string(),
            base: self.base_url.to_string(),
        };
        if path.starts_with("//") || Url::parse(path).is_ok() {
            return Err(off_site());
        }

        let prefix = self.base_url.path().trim_end_matches('/');
        let relative = if path.starts_with('/') {
            format!("{prefix}{path}")
        } else {
            format!("{prefix}/{path}")
        };
        let url = self
            .base_url
            .join(&relative)
            .map_err(|source| FetchError::InvalidUrl {
                path: path.to_string(),
                source,
            })?;

        // "/\host" and similar still reach another authority through join
        if url.origin() != self.base_url.origin() {
            return Err(off_site());
        }
        Ok(url)
    }

    /// Site-relative path of the first results page for `request`
    pub fn search_path(&self, request: &SearchRequest) -> String {
        self.search_template
            .replace("{nights}", &request.nights.to_string())
            .replace(
                "{start_date}",
                &request.start_date.format(DATE_FORMAT).to_string(),
            )
    }

    /// Starting state of a crawl for `request`
    pub fn first_page(&self, request: &SearchRequest) -> PageHandle {
        PageHandle::Next(self.search_path(request))
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            search_template: DEFAULT_SEARCH_TEMPLATE.to_string(),
            timeout: Duration::from_secs(30),
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
        }
    }
}

/// What the user is looking for. Immutable for the duration of a crawl.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    /// First night of the stay
    pub start_date: NaiveDate,
    /// Length of the stay
    pub nights: NonZeroU32,
    /// Maximum price in GBP; `None` accepts any price
    pub price_ceiling: Option<Decimal>,
    /// Lowercased keywords that must all appear in a listing's description or features
    pub required_keywords: BTreeSet<String>,
}

impl SearchRequest {
    pub fn new(start_date: NaiveDate, nights: NonZeroU32) -> Self {
        Self {
            start_date,
            nights,
            price_ceiling: None,
            required_keywords: BTreeSet::new(),
        }
    }

    pub fn with_price_ceiling(mut self, ceiling: Decimal) -> Self {
        self.price_ceiling = Some(ceiling);
        self
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.required_keywords
            .extend(keywords.into_iter().map(|k| k.as_ref().to_lowercase()));
        self
    }

    /// Cheap check, needs no fetch
    pub fn within_budget(&self, price: Decimal) -> bool {
        self.price_ceiling.map_or(true, |ceiling| price <= ceiling)
    }

    pub fn needs_detail(&self) -> bool {
        !self.required_keywords.is_empty()
    }
}

/// The next results page to fetch, or the end of the crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageHandle {
    Next(String),
    Done,
}

impl From<Option<String>> for PageHandle {
    fn from(next: Option<String>) -> Self {
        next.map_or(PageHandle::Done, PageHandle::Next)
    }
}
