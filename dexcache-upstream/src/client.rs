use std::time::Duration;

use crate::error::UpstreamError;
use crate::source::CatalogSource;
use crate::types::{EntryRef, ListingPayload, RawPayload};

pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for [`UpstreamClient`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// API root, without a trailing slash (e.g. `https://pokeapi.co/api/v2`).
    pub base_url: String,
    /// Per-request timeout, covering connect and body.
    pub timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// HTTP client for the upstream catalog API.
pub struct UpstreamClient {
    http: reqwest::Client,
    base_url: String,
}

impl UpstreamClient {
    pub fn new(options: &ClientOptions) -> Result<Self, UpstreamError> {
        let http = reqwest::Client::builder()
            .timeout(options.timeout)
            .user_agent(concat!("dexcache/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: options.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET a URL and return the body of a successful response.
    ///
    /// 404 maps to `NotFound`; any other non-success status, or a transport
    /// failure, maps to `Unavailable`.
    async fn get_text(&self, url: &str) -> Result<String, UpstreamError> {
        log::debug!("GET {}", url);

        let resp = self.http.get(url).send().await?;
        let status = resp.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(UpstreamError::NotFound(url.to_string()));
        }
        if !status.is_success() {
            return Err(UpstreamError::Unavailable(format!(
                "HTTP {} from {}",
                status.as_u16(),
                url
            )));
        }

        Ok(resp.text().await?)
    }
}

impl CatalogSource for UpstreamClient {
    fn source_url(&self) -> &str {
        &self.base_url
    }

    async fn fetch_entry(&self, id: i64) -> Result<RawPayload, UpstreamError> {
        let text = self
            .get_text(&format!("{}/pokemon/{}", self.base_url, id))
            .await?;
        RawPayload::parse(&text)
    }

    async fn fetch_page(&self, offset: u32, limit: u32) -> Result<Vec<EntryRef>, UpstreamError> {
        let text = self
            .get_text(&format!(
                "{}/pokemon?offset={}&limit={}",
                self.base_url, offset, limit
            ))
            .await?;
        let listing = ListingPayload::parse(&text)?;
        if listing.has_more() {
            log::debug!(
                "Listing has more references past offset {} ({} upstream in total)",
                offset.saturating_add(limit),
                listing
                    .count
                    .map_or_else(|| "unknown".to_string(), |n| n.to_string())
            );
        }
        listing.into_refs()
    }

    async fn fetch_by_url(&self, detail_url: &str) -> Result<RawPayload, UpstreamError> {
        let text = self.get_text(detail_url).await?;
        RawPayload::parse(&text)
    }
}
