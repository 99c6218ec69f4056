//! Page retrieval
//!
//! The coordinator depends on [`PageSource`] rather than on a concrete
//! HTTP client so that it can be driven by a canned page in tests.

pub mod fetcher;

pub use fetcher::{MedalFetcher, DEFAULT_USER_AGENT};

use async_trait::async_trait;
use bytes::Bytes;

use crate::utils::decode_html;
use crate::utils::error::FetchError;

/// Raw response body plus the header needed to decode it
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Response body as received
    pub body: Bytes,

    /// `Content-Type` header, if the server sent one
    pub content_type: Option<String>,
}

impl FetchedPage {
    /// Wrap an in-memory HTML document
    pub fn from_html(html: impl Into<String>) -> Self {
        Self {
            body: Bytes::from(html.into()),
            content_type: Some("text/html; charset=utf-8".to_string()),
        }
    }

    /// Decode the body to text
    pub fn text(&self) -> std::borrow::Cow<'_, str> {
        decode_html(&self.body, self.content_type.as_deref())
    }
}

/// Something that can produce the medal table page
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Retrieve the page once
    async fn fetch_page(&self) -> Result<FetchedPage, FetchError>;
}
