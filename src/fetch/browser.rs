//! Browser-mode fetcher
//!
//! Owns one long-lived headless Chromium process per run plus one page per
//! fetch, driven over CDP. Navigation waits only until the structural DOM
//! is parsed, followed by a fixed settle delay and a bounded wait for the
//! target site's listing cards; a timed-out wait still returns the current
//! document so the extractor can decide whether anything rendered.

use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::network::SetUserAgentOverrideParams;
use chromiumoxide::cdp::browser_protocol::page::NavigateParams;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use super::{FetchedDocument, Fetcher};
use crate::config::BrowserSettings;
use crate::{FetchError, FetchErrorKind, FetchResult, ScrapeError};

/// User agent reported by browser pages.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// JavaScript to wait for the document to finish parsing.
const WAIT_FOR_READY_SCRIPT: &str = r#"
    new Promise((resolve) => {
        if (document.readyState === 'complete' || document.readyState === 'interactive') {
            resolve(document.readyState);
        } else {
            document.addEventListener('DOMContentLoaded', () => resolve(document.readyState));
            setTimeout(() => resolve('timeout'), 10000);
        }
    })
"#;

/// How often the bounded card wait re-checks the page.
const CARD_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Headless-browser fetcher holding the run's exclusive Chromium process
pub struct BrowserFetcher {
    settings: BrowserSettings,
    /// Listing-card selector alternatives for the target site, used as the
    /// render-completion signal after navigation
    wait_selectors: Vec<String>,
    browser: Option<Browser>,
}

impl BrowserFetcher {
    pub fn new(settings: &BrowserSettings, wait_selectors: Vec<String>) -> Self {
        Self {
            settings: settings.clone(),
            wait_selectors,
            browser: None,
        }
    }

    /// Launch the browser process if not already running.
    async fn ensure_browser(&mut self) -> crate::Result<()> {
        if self.browser.is_some() {
            return Ok(());
        }

        debug!("Launching browser (headless={})", self.settings.headless);

        let mut builder = BrowserConfig::builder();
        if !self.settings.headless {
            builder = builder.with_head();
        }

        builder = builder
            .arg("--disable-blink-features=AutomationControlled")
            .arg("--disable-dev-shm-usage")
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .arg("--disable-background-networking")
            .arg("--no-sandbox")
            .arg("--disable-gpu");

        for arg in &self.settings.chrome_args {
            builder = builder.arg(arg);
        }

        let config = builder.build().map_err(|e| ScrapeError::ResourceInit {
            message: format!("invalid browser config: {}", e),
        })?;

        let (browser, mut handler) = Browser::launch(config).await.map_err(|e| {
            ScrapeError::ResourceInit {
                message: e.to_string(),
            }
        })?;

        // Drive the CDP message loop until the browser goes away
        tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        self.browser = Some(browser);
        Ok(())
    }

    /// Inner fetch logic - page cleanup handled by the caller.
    async fn fetch_inner(&self, page: &Page, url: &str) -> FetchResult<FetchedDocument> {
        // Realistic user agent before any navigation
        page.execute(SetUserAgentOverrideParams::new(
            BROWSER_USER_AGENT.to_string(),
        ))
        .await
        .map_err(|e| cdp_error(url, e))?;

        self.navigate(page, url).await?;

        // Structural DOM first, then a fixed settle for client-side render
        self.wait_for_page_ready(page).await;
        tokio::time::sleep(self.settings.settle_delay()).await;

        self.wait_for_listing_cards(page, url).await;

        let final_url = page
            .url()
            .await
            .map_err(|e| cdp_error(url, e))?
            .map(|u| u.to_string())
            .unwrap_or_else(|| url.to_string());
        let body = page.content().await.map_err(|e| cdp_error(url, e))?;

        Ok(FetchedDocument {
            url: url.to_string(),
            final_url,
            status: 200,
            body,
        })
    }

    /// Navigate with a deadline; waits for the navigation to commit, not
    /// for network idle.
    async fn navigate(&self, page: &Page, url: &str) -> FetchResult<()> {
        let params = NavigateParams::builder().url(url).build().map_err(|e| {
            FetchError::new(FetchErrorKind::NetworkError, url, format!("invalid URL: {}", e))
        })?;

        let timeout = self.settings.navigation_timeout();
        tokio::time::timeout(timeout, page.execute(params))
            .await
            .map_err(|_| {
                FetchError::new(
                    FetchErrorKind::Timeout,
                    url,
                    format!("navigation exceeded {}ms", timeout.as_millis()),
                )
            })?
            .map_err(|e| cdp_error(url, e))?;

        Ok(())
    }

    /// Wait for the document to finish parsing, bounded by the navigation
    /// timeout. A failed check is logged and absorbed.
    async fn wait_for_page_ready(&self, page: &Page) {
        let result = tokio::time::timeout(
            self.settings.navigation_timeout(),
            page.evaluate(WAIT_FOR_READY_SCRIPT.to_string()),
        )
        .await;

        match result {
            Ok(Ok(evaluation)) => {
                let state: String = evaluation
                    .into_value()
                    .unwrap_or_else(|_| "unknown".to_string());
                debug!("Page ready state: {}", state);
            }
            Ok(Err(e)) => debug!("Could not check ready state: {}", e),
            Err(_) => warn!("Timeout waiting for page ready state"),
        }
    }

    /// Bounded wait for any listing-card selector to match. Timing out is
    /// not a failure: the current document is returned and an empty
    /// extraction downstream becomes the soft stop signal.
    async fn wait_for_listing_cards(&self, page: &Page, url: &str) {
        if self.wait_selectors.is_empty() {
            return;
        }

        let deadline = Instant::now() + self.settings.card_wait_timeout();
        loop {
            for selector in &self.wait_selectors {
                if page.find_element(selector.as_str()).await.is_ok() {
                    debug!("Listing cards visible via '{}'", selector);
                    return;
                }
            }

            if Instant::now() >= deadline {
                warn!(
                    "No listing card became visible within {}ms for {}",
                    self.settings.card_wait_timeout_ms, url
                );
                return;
            }

            tokio::time::sleep(CARD_POLL_INTERVAL).await;
        }
    }
}

#[async_trait]
impl Fetcher for BrowserFetcher {
    async fn open(&mut self) -> crate::Result<()> {
        self.ensure_browser().await
    }

    async fn fetch(&mut self, url: &str) -> FetchResult<FetchedDocument> {
        // Lazy acquisition backstop; the orchestrator normally opens first
        if self.browser.is_none() {
            self.ensure_browser().await.map_err(|e| {
                FetchError::new(FetchErrorKind::NetworkError, url, e.to_string())
            })?;
        }

        let Some(browser) = self.browser.as_ref() else {
            return Err(FetchError::new(
                FetchErrorKind::NetworkError,
                url,
                "browser not initialized",
            ));
        };
        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| cdp_error(url, e))?;

        // The page is closed on every path, success or failure
        let result = self.fetch_inner(&page, url).await;
        let _ = page.close().await;
        result
    }

    async fn close(&mut self) {
        if let Some(mut browser) = self.browser.take() {
            debug!("Releasing browser process");
            let _ = browser.close().await;
            let _ = browser.wait().await;
        }
    }
}

fn cdp_error(url: &str, error: impl std::fmt::Display) -> FetchError {
    FetchError::new(FetchErrorKind::NetworkError, url, error.to_string())
}
