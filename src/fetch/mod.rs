//! Resource fetchers
//!
//! Two interchangeable implementations behind one contract: a stateless
//! HTTP fetcher and a managed headless-browser fetcher. Adapters hold a
//! boxed fetcher and never care which one they got.

mod browser;
mod http;

pub use browser::BrowserFetcher;
pub use http::HttpFetcher;

use async_trait::async_trait;

use crate::FetchResult;

/// Raw document returned by a fetch
#[derive(Debug, Clone)]
pub struct FetchedDocument {
    /// The URL that was requested
    pub url: String,
    /// Final URL after any redirects
    pub final_url: String,
    /// HTTP status code (synthetic 200 for browser navigations)
    pub status: u16,
    /// Document body
    pub body: String,
}

/// Contract for acquiring raw documents.
///
/// `open` acquires any long-lived resource the implementation needs (the
/// browser process); `close` releases it and must be safe to call on every
/// exit path, including after a failed `open`. The HTTP implementation
/// holds no such resource and uses the default no-ops.
#[async_trait]
pub trait Fetcher: Send {
    /// Acquires long-lived resources ahead of the first fetch.
    async fn open(&mut self) -> crate::Result<()> {
        Ok(())
    }

    /// Fetches one URL, classifying failures per the fetch error taxonomy.
    async fn fetch(&mut self, url: &str) -> FetchResult<FetchedDocument>;

    /// Releases anything `open` acquired. Idempotent.
    async fn close(&mut self) {}
}
