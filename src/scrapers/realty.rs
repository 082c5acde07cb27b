use crate::error::SourceError;
use crate::scrapers::cookies::{cookie_header, Cookies};
use crate::scrapers::traits::ListingsSource;
use crate::scrapers::types::{RawPage, SearchParams};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, COOKIE,
    UPGRADE_INSECURE_REQUESTS,
};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_BASE_URL: &str = "https://realty.yandex.ru/gate/react-page/get/";

const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:63.0) Gecko/20100101 Firefox/63.0";

/// Static request configuration, built once at startup
#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub base_url: String,
    pub cookies: Cookies,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            cookies: Cookies::new(),
        }
    }
}

/// Listings source backed by the realty search gate
pub struct RealtySource {
    client: Client,
    base_url: String,
}

impl RealtySource {
    /// Create a new source with the fixed browser-like headers and the given cookies
    pub fn new(config: SourceConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .default_headers(default_headers(&config.cookies)?)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url,
        })
    }
}

fn default_headers(cookies: &Cookies) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
    );
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static("ru-RU,ru;q=0.8,en-US;q=0.5,en;q=0.3"),
    );
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("max-age=0"));
    headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));

    if let Some(cookie) = cookie_header(cookies) {
        let value = HeaderValue::from_str(&cookie).context("Cookie file contains invalid characters")?;
        headers.insert(COOKIE, value);
    }

    Ok(headers)
}

/// Query string for one search page
fn page_query(params: &SearchParams, page: u32) -> Vec<(&'static str, String)> {
    vec![
        ("rgid", params.region_id.to_string()),
        ("type", params.transaction.to_string()),
        ("category", params.category.to_string()),
        ("page", page.to_string()),
        ("_format", "react".to_string()),
        ("_pageType", "search".to_string()),
        ("_providers", "react-search-data".to_string()),
    ]
}

#[async_trait]
impl ListingsSource for RealtySource {
    async fn fetch(&self, params: &SearchParams, page: u32) -> Result<RawPage, SourceError> {
        debug!(page, url = %self.base_url, "Fetching search page");

        let response = self
            .client
            .get(&self.base_url)
            .query(&page_query(params, page))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            // The body may still carry the `error` marker, so decode regardless.
            warn!(page, %status, "Search gate returned non-success status");
        }

        let body = response.bytes().await?;
        debug!(page, bytes = body.len(), "Downloaded search page");

        let value = serde_json::from_slice(&body)?;
        Ok(RawPage(value))
    }

    fn source_name(&self) -> &'static str {
        "realty"
    }
}
