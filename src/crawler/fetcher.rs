//! HTTP fetcher for the medal table page
//!
//! One bounded GET per call with a product-identifying User-Agent. There is
//! no retry here: a failed fetch is retried by the coordinator's next
//! scheduled cycle.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE, USER_AGENT},
    Client,
};
use std::time::Duration;
use url::Url;

use super::{FetchedPage, PageSource};
use crate::config::SourceConfig;
use crate::utils::error::FetchError;

/// Default User-Agent sent with every request
pub const DEFAULT_USER_AGENT: &str = concat!(
    "medalwatch/",
    env!("CARGO_PKG_VERSION"),
    " (+https://github.com/hephaex/medalwatch)"
);

/// Fetches the medal table page
#[derive(Debug, Clone)]
pub struct MedalFetcher {
    /// HTTP client with compression enabled
    client: Client,

    /// Value of the User-Agent header
    user_agent: String,

    /// Page fetched by [`PageSource::fetch_page`]
    url: String,

    /// Per-request timeout
    timeout: Duration,
}

impl MedalFetcher {
    /// Create a fetcher for `url`
    ///
    /// # Errors
    ///
    /// Returns `FetchError::InvalidUrl` if the URL does not parse, or
    /// `FetchError::Http` if the HTTP client cannot be created
    pub fn new(url: &str, user_agent: &str, timeout: Duration) -> Result<Self, FetchError> {
        Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{url}: {e}")))?;

        let client = Client::builder().gzip(true).build()?;

        Ok(Self {
            client,
            user_agent: user_agent.to_string(),
            url: url.to_string(),
            timeout,
        })
    }

    /// Create a fetcher from the `[source]` configuration section
    ///
    /// # Errors
    ///
    /// Same as [`MedalFetcher::new`]
    pub fn from_config(config: &SourceConfig) -> Result<Self, FetchError> {
        Self::new(&config.url, &config.user_agent, config.request_timeout())
    }

    /// Configured page URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch `url`, giving up after `timeout`
    ///
    /// # Errors
    ///
    /// - `FetchError::Timeout` when the request or body read exceeds `timeout`
    /// - `FetchError::Status` for any non-2xx response
    /// - `FetchError::Http` for DNS, connection and other transport failures
    pub async fn fetch(&self, url: &str, timeout: Duration) -> Result<FetchedPage, FetchError> {
        tracing::debug!(url = %url, timeout = ?timeout, "Fetching medal table");

        let response = self
            .client
            .get(url)
            .headers(self.build_headers())
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(e, timeout))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let body: Bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::from_reqwest(e, timeout))?;

        tracing::debug!(url = %url, bytes = body.len(), "Fetched medal table");

        Ok(FetchedPage { body, content_type })
    }

    /// Build HTTP headers for the request
    fn build_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();

        let user_agent = HeaderValue::from_str(&self.user_agent)
            .unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_USER_AGENT));
        headers.insert(USER_AGENT, user_agent);

        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml;q=0.9,*/*;q=0.8"),
        );

        headers
    }
}

#[async_trait]
impl PageSource for MedalFetcher {
    async fn fetch_page(&self) -> Result<FetchedPage, FetchError> {
        self.fetch(&self.url, self.timeout).await
    }
}
