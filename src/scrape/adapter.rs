//! Site adapter: one fetcher + one extractor + one URL-builder behind a
//! uniform contract
//!
//! The four concrete adapters (two sites × two fetch strategies) are all
//! instances of `SiteAdapter` differing only in their injected parts; see
//! the registry in the parent module. Adapters are stateless between runs
//! apart from their resettable statistics counter.

use crate::extract::Extractor;
use crate::fetch::Fetcher;
use crate::model::{FetchStrategy, ListingFragment, RunErrorRecord, ScrapeParams, SourceSite};
use crate::scrape::driver::{drive, DriveOptions};
use crate::scrape::urls::UrlBuilder;
use crate::{FetchError, ParameterValidationError};

/// Cumulative fetch counters plus collected error records for one run.
/// Valid only after a completed or aborted run; reset between runs.
#[derive(Debug, Default, Clone)]
pub struct AdapterStats {
    pub requests_attempted: u64,
    pub requests_succeeded: u64,
    pub requests_failed: u64,
    pub errors: Vec<RunErrorRecord>,
}

impl AdapterStats {
    fn record_attempt(&mut self) {
        self.requests_attempted += 1;
    }

    fn record_success(&mut self) {
        self.requests_succeeded += 1;
    }

    fn record_failure(&mut self, page: u32, error: &FetchError) {
        self.requests_failed += 1;
        self.errors.push(RunErrorRecord::from_fetch_error(page, error));
    }

    pub fn reset(&mut self) {
        *self = AdapterStats::default();
    }
}

/// A scraper for one (site, fetch strategy) pair
pub struct SiteAdapter {
    site: SourceSite,
    strategy: FetchStrategy,
    fetcher: Box<dyn Fetcher>,
    extractor: Box<dyn Extractor>,
    urls: Box<dyn UrlBuilder>,
    stats: AdapterStats,
}

impl SiteAdapter {
    pub fn new(
        site: SourceSite,
        strategy: FetchStrategy,
        fetcher: Box<dyn Fetcher>,
        extractor: Box<dyn Extractor>,
        urls: Box<dyn UrlBuilder>,
    ) -> Self {
        Self {
            site,
            strategy,
            fetcher,
            extractor,
            urls,
            stats: AdapterStats::default(),
        }
    }

    pub fn site(&self) -> SourceSite {
        self.site
    }

    pub fn strategy(&self) -> FetchStrategy {
        self.strategy
    }

    /// Checks the run parameters against the required-field and page-bound
    /// rules, collecting every violation. Always called before `scrape`.
    pub fn validate_params(
        &self,
        params: &ScrapeParams,
    ) -> Result<(), ParameterValidationError> {
        let mut errors = Vec::new();

        if params.keyword.trim().is_empty() {
            errors.push("keyword must be a non-empty string".to_string());
        }
        if params.location.trim().is_empty() {
            errors.push("location must be a non-empty string".to_string());
        }

        let ceiling = self.site.max_pages_ceiling();
        if params.max_pages < 1 || params.max_pages > ceiling {
            errors.push(format!(
                "max_pages must be between 1 and {} for {}, got {}",
                ceiling, self.site, params.max_pages
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ParameterValidationError { errors })
        }
    }

    /// Absolute URL for one result page.
    pub fn page_url(&self, params: &ScrapeParams, page: u32) -> String {
        self.urls
            .page_url(&params.keyword, &params.location, page)
    }

    /// Acquires the fetcher's long-lived resources (the browser process in
    /// browser-mode; a no-op in HTTP-mode).
    pub async fn open(&mut self) -> crate::Result<()> {
        self.fetcher.open().await
    }

    /// Fetches and extracts one result page, updating the statistics
    /// counter. Extraction failures are absorbed as an empty fragment
    /// list; only the fetch itself can fail.
    pub async fn fetch_page(
        &mut self,
        params: &ScrapeParams,
        page: u32,
    ) -> crate::FetchResult<Vec<ListingFragment>> {
        let url = self.page_url(params, page);
        tracing::debug!("Fetching page {} of {}: {}", page, params.max_pages, url);

        self.stats.record_attempt();
        let document = match self.fetcher.fetch(&url).await {
            Ok(document) => document,
            Err(error) => {
                self.stats.record_failure(page, &error);
                return Err(error);
            }
        };
        self.stats.record_success();

        let fragments = self.extractor.extract(&document.body);
        tracing::debug!("Extracted {} fragments from page {}", fragments.len(), page);
        Ok(fragments)
    }

    /// Single end-to-end raw run across pages 1..=max_pages: sequential
    /// fetch+extract with the strategy's early-stop rule, no pacing delay,
    /// no progress events, aborting on the first fetch error. The
    /// orchestrator layers delays, progress, error policy and
    /// normalization on top of the same loop.
    pub async fn scrape(&mut self, params: &ScrapeParams) -> crate::Result<Vec<ListingFragment>> {
        self.validate_params(params)?;

        let outcome = drive(self, params, DriveOptions::neutral()).await;
        match outcome.aborted {
            Some(error) => Err(error.into()),
            None => Ok(outcome.fragments),
        }
    }

    /// Counters for the current/most recent run.
    pub fn stats(&self) -> &AdapterStats {
        &self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats.reset();
    }

    /// Releases fetcher resources. Must run on every exit path of a run.
    pub async fn close(&mut self) {
        self.fetcher.close().await;
    }
}
