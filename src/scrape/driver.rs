//! Sequential page loop
//!
//! The single pagination loop shared by `SiteAdapter::scrape` (neutral
//! options) and the orchestrator (configured pacing, progress observer and
//! error policy). Pages are processed strictly one at a time: target sites
//! rate-limit aggressively, and the browser fetcher must never be driven
//! from two pages concurrently.

use std::time::Duration;

use crate::model::{ListingFragment, ProgressEvent, ScrapeParams};
use crate::scrape::adapter::SiteAdapter;
use crate::FetchError;

/// Loop behavior knobs supplied by the caller
pub struct DriveOptions<'a> {
    /// Sleep between pages (never after the last)
    pub page_delay: Duration,
    /// Swallow per-page fetch errors and continue instead of aborting
    pub continue_on_error: bool,
    /// Synchronous observer invoked after each completed page
    pub progress: Option<&'a mut (dyn FnMut(ProgressEvent) + Send)>,
}

impl DriveOptions<'_> {
    /// No pacing, no observer, abort on first error: the raw end-to-end
    /// contract of `SiteAdapter::scrape`.
    pub fn neutral() -> Self {
        DriveOptions {
            page_delay: Duration::ZERO,
            continue_on_error: false,
            progress: None,
        }
    }
}

/// What the loop produced
pub struct DriveOutcome {
    /// Accumulated fragments in page-then-card order
    pub fragments: Vec<ListingFragment>,
    /// Pages actually requested (≤ max_pages under early stop or abort)
    pub pages_attempted: u32,
    /// True if pagination ended on the empty-page signal
    pub stopped_early: bool,
    /// Set when a fetch error aborted the run (`continue_on_error` off)
    pub aborted: Option<FetchError>,
}

/// Drives the adapter across pages 1..=max_pages.
///
/// Empty pages are the site's de facto end-of-results signal, not an
/// error: after the strategy's threshold of consecutive empty pages the
/// loop stops early and whatever was collected stands. Fetch errors are
/// recorded in the adapter's statistics by `fetch_page`; this loop only
/// decides whether to continue past them.
pub async fn drive(
    adapter: &mut SiteAdapter,
    params: &ScrapeParams,
    mut opts: DriveOptions<'_>,
) -> DriveOutcome {
    let threshold = adapter.strategy().empty_page_threshold();
    let mut fragments: Vec<ListingFragment> = Vec::new();
    let mut consecutive_empty = 0u32;
    let mut pages_attempted = 0u32;
    let mut stopped_early = false;

    for page in 1..=params.max_pages {
        if page > 1 && !opts.page_delay.is_zero() {
            tokio::time::sleep(opts.page_delay).await;
        }

        pages_attempted = page;

        match adapter.fetch_page(params, page).await {
            Ok(page_fragments) => {
                let page_was_empty = page_fragments.is_empty();
                fragments.extend(page_fragments);

                if let Some(observer) = opts.progress.as_deref_mut() {
                    observer(ProgressEvent {
                        current_page: page,
                        total_pages: params.max_pages,
                        cumulative_listings_found: fragments.len(),
                    });
                }

                if page_was_empty {
                    consecutive_empty += 1;
                    if consecutive_empty >= threshold {
                        tracing::info!(
                            "Stopping early at page {}: {} consecutive empty page(s)",
                            page,
                            consecutive_empty
                        );
                        stopped_early = true;
                        break;
                    }
                } else {
                    consecutive_empty = 0;
                }
            }
            Err(error) => {
                if opts.continue_on_error {
                    tracing::warn!("Continuing past page {} failure: {}", page, error);
                    continue;
                }
                tracing::error!("Aborting run at page {}: {}", page, error);
                return DriveOutcome {
                    fragments,
                    pages_attempted,
                    stopped_early: false,
                    aborted: Some(error),
                };
            }
        }
    }

    DriveOutcome {
        fragments,
        pages_attempted,
        stopped_early,
        aborted: None,
    }
}
