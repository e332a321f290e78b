use crate::error::FetchError;
use crate::scrapers::traits::PageFetcher;
use crate::scrapers::types::SiteConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};
use url::{Host, Url};

/// Fetches pages from the live site over HTTP
pub struct HttpFetcher {
    client: Client,
    config: SiteConfig,
}

impl HttpFetcher {
    pub fn new(config: SiteConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str());
        // A mirror on this machine is never reached through a proxy
        if is_loopback(&config.base_url) {
            builder = builder.no_proxy();
        }
        let client = builder.build().context("Failed to create HTTP client")?;

        Ok(Self { client, config })
    }
}

fn is_loopback(url: &Url) -> bool {
    match url.host() {
        Some(Host::Ipv4(ip)) => ip.is_loopback(),
        Some(Host::Ipv6(ip)) => ip.is_loopback(),
        Some(Host::Domain(domain)) => domain == "localhost",
        None => false,
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, path: &str) -> Result<String, FetchError> {
        let url = self.config.resolve(path)?;
        debug!("Fetching URL: {}", url);

        let request_error = |source: reqwest::Error| {
            if source.is_timeout() {
                FetchError::Timeout {
                    url: url.to_string(),
                }
            } else {
                FetchError::Request {
                    url: url.to_string(),
                    source,
                }
            }
        };

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            warn!("{} returned status: {}", url, status);
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        let html = response.text().await.map_err(request_error)?;
        debug!("Downloaded {} bytes of HTML", html.len());

        Ok(html)
    }
}
