pub mod detail;
pub mod filter;
pub mod http;
pub mod listing;
pub mod pagination;
pub mod query;
pub mod traits;
pub mod types;

pub use detail::extract_detail;
pub use filter::{fetch_detail, filter_listings};
pub use http::HttpFetcher;
pub use listing::{extract_listings, ListingPage};
pub use pagination::crawl_listings;
pub use traits::PageFetcher;
pub use types::{PageHandle, SearchRequest, SiteConfig};
