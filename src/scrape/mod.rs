//! Scraper adapters
//!
//! Binds fetch strategy, site-specific extraction and URL construction
//! behind one uniform contract, and selects among the four concrete
//! combinations (two sites × two strategies) with a pure lookup — no
//! site-subclass hierarchies.

mod adapter;
pub(crate) mod driver;
mod urls;

pub use adapter::{AdapterStats, SiteAdapter};
pub use urls::{slugify, IndeedUrlBuilder, NaukriUrlBuilder, UrlBuilder};

use url::Url;

use crate::config::EngineConfig;
use crate::extract::{Extractor, IndeedExtractor, NaukriExtractor};
use crate::fetch::{BrowserFetcher, Fetcher, HttpFetcher};
use crate::model::{FetchStrategy, SourceSite};
use crate::ScrapeError;

/// Builds the adapter for a (site, strategy) pair.
///
/// Pure composition: the site picks the extractor and URL-builder, the
/// strategy picks the fetcher, and browser-mode borrows the extractor's
/// card selectors as its render-completion signal.
pub fn adapter_for(
    site: SourceSite,
    strategy: FetchStrategy,
    config: &EngineConfig,
) -> crate::Result<SiteAdapter> {
    let base = Url::parse(site.base_url())?;

    let extractor: Box<dyn Extractor> = match site {
        SourceSite::Indeed => Box::new(IndeedExtractor),
        SourceSite::Naukri => Box::new(NaukriExtractor),
    };

    let urls: Box<dyn UrlBuilder> = match site {
        SourceSite::Indeed => Box::new(IndeedUrlBuilder::new(base)),
        SourceSite::Naukri => Box::new(NaukriUrlBuilder::new(base)),
    };

    let fetcher: Box<dyn Fetcher> = match strategy {
        FetchStrategy::Http => Box::new(HttpFetcher::new(&config.http)?),
        FetchStrategy::Browser => {
            let wait_selectors = extractor
                .card_selectors()
                .iter()
                .map(|s| s.to_string())
                .collect();
            Box::new(BrowserFetcher::new(&config.browser, wait_selectors))
        }
    };

    Ok(SiteAdapter::new(site, strategy, fetcher, extractor, urls))
}

/// Resolves the target site from a URL's domain and builds the adapter.
/// An unrecognized domain is a configuration error, not a runtime one.
pub fn adapter_for_url(
    url: &str,
    strategy: FetchStrategy,
    config: &EngineConfig,
) -> crate::Result<SiteAdapter> {
    let site = SourceSite::for_url(url).ok_or_else(|| ScrapeError::UnknownSite {
        domain: Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_else(|| url.to_string()),
    })?;
    adapter_for(site, strategy, config)
}
