//! HTTP-mode fetcher
//!
//! Issues a single GET per page with a realistic browser-identifying
//! header set, classifies failures into the fetch error taxonomy, and
//! retries transient failures a bounded number of times with a fixed
//! inter-attempt delay.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::{Client, StatusCode};
use std::time::Duration;

use super::{FetchedDocument, Fetcher};
use crate::config::HttpSettings;
use crate::{FetchError, FetchErrorKind, FetchResult};

/// Browser-identifying User-Agent sent when no override is configured.
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Stateless HTTP fetcher backed by a shared reqwest client
pub struct HttpFetcher {
    client: Client,
    retry_attempts: u32,
    retry_delay: Duration,
}

impl HttpFetcher {
    /// Builds the fetcher from engine settings.
    ///
    /// The retry budget covers listing-page fetches; callers doing one-off
    /// detail fetches can construct with `retry_attempts = 0`.
    pub fn new(settings: &HttpSettings) -> crate::Result<Self> {
        let user_agent = settings
            .user_agent
            .clone()
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

        let client = Client::builder()
            .user_agent(user_agent)
            .default_headers(headers)
            .timeout(settings.request_timeout())
            .connect_timeout(settings.connect_timeout())
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self {
            client,
            retry_attempts: settings.retry_attempts,
            retry_delay: settings.retry_delay(),
        })
    }

    async fn attempt(&self, url: &str) -> FetchResult<FetchedDocument> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_transport_error(url, &e))?;

        let status = response.status();
        if let Some(error) = classify_status(url, status) {
            return Err(error);
        }

        let final_url = response.url().to_string();
        let body = response
            .text()
            .await
            .map_err(|e| classify_transport_error(url, &e))?;

        Ok(FetchedDocument {
            url: url.to_string(),
            final_url,
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&mut self, url: &str) -> FetchResult<FetchedDocument> {
        let mut last_error: Option<FetchError> = None;

        for attempt in 0..=self.retry_attempts {
            if attempt > 0 {
                tracing::debug!("Retry {} for {}", attempt, url);
                tokio::time::sleep(self.retry_delay).await;
            }

            match self.attempt(url).await {
                Ok(document) => return Ok(document),
                Err(error) => {
                    if !is_retryable(error.kind) {
                        return Err(error);
                    }
                    tracing::warn!("Transient fetch failure for {}: {}", url, error);
                    last_error = Some(error);
                }
            }
        }

        // Loop ran at least once, so an error is always recorded here
        Err(last_error.unwrap_or_else(|| {
            FetchError::new(FetchErrorKind::NetworkError, url, "retry budget exhausted")
        }))
    }
}

/// Maps a non-success status code onto the fetch error taxonomy.
/// Any 2xx is a success and maps to `None`.
fn classify_status(url: &str, status: StatusCode) -> Option<FetchError> {
    if status.is_success() {
        return None;
    }

    let kind = match status {
        StatusCode::NOT_FOUND => FetchErrorKind::NotFound,
        StatusCode::FORBIDDEN => FetchErrorKind::BlockedOrForbidden,
        StatusCode::TOO_MANY_REQUESTS => FetchErrorKind::RateLimited,
        s if s.is_server_error() => FetchErrorKind::UpstreamError,
        _ => FetchErrorKind::NetworkError,
    };

    Some(FetchError::new(
        kind,
        url,
        format!("HTTP {}", status.as_u16()),
    ))
}

/// Maps a reqwest transport error onto the fetch error taxonomy.
fn classify_transport_error(url: &str, error: &reqwest::Error) -> FetchError {
    let kind = if error.is_timeout() {
        FetchErrorKind::Timeout
    } else {
        FetchErrorKind::NetworkError
    };
    FetchError::new(kind, url, error.to_string())
}

/// Transient failures are worth another attempt; client-level rejections
/// (404/403) and rate limits are not.
fn is_retryable(kind: FetchErrorKind) -> bool {
    matches!(
        kind,
        FetchErrorKind::UpstreamError | FetchErrorKind::NetworkError | FetchErrorKind::Timeout
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_from_default_settings() {
        let settings = HttpSettings::default();
        assert!(HttpFetcher::new(&settings).is_ok());
    }

    #[test]
    fn test_classify_success_statuses() {
        assert!(classify_status("http://x", StatusCode::OK).is_none());
        assert!(classify_status("http://x", StatusCode::NO_CONTENT).is_none());
    }

    #[test]
    fn test_classify_error_statuses() {
        let cases = [
            (StatusCode::NOT_FOUND, FetchErrorKind::NotFound),
            (StatusCode::FORBIDDEN, FetchErrorKind::BlockedOrForbidden),
            (StatusCode::TOO_MANY_REQUESTS, FetchErrorKind::RateLimited),
            (StatusCode::INTERNAL_SERVER_ERROR, FetchErrorKind::UpstreamError),
            (StatusCode::BAD_GATEWAY, FetchErrorKind::UpstreamError),
            (StatusCode::BAD_REQUEST, FetchErrorKind::NetworkError),
        ];

        for (status, expected) in cases {
            let error = classify_status("http://x", status).unwrap();
            assert_eq!(error.kind, expected, "status {}", status);
            assert_eq!(error.url, "http://x");
        }
    }

    #[test]
    fn test_retryable_kinds() {
        assert!(is_retryable(FetchErrorKind::UpstreamError));
        assert!(is_retryable(FetchErrorKind::Timeout));
        assert!(is_retryable(FetchErrorKind::NetworkError));
        assert!(!is_retryable(FetchErrorKind::NotFound));
        assert!(!is_retryable(FetchErrorKind::BlockedOrForbidden));
        assert!(!is_retryable(FetchErrorKind::RateLimited));
    }
}
