//! Core data model for scrape runs
//!
//! Everything here lives for the duration of a single run: raw fragments
//! produced by extractors, normalized listings produced by the pipeline,
//! the immutable run parameters, and the statistics/status types returned
//! to the caller.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

use crate::FetchErrorKind;

/// A supported target job site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceSite {
    Indeed,
    Naukri,
}

impl SourceSite {
    /// Base URL used for building search pages and resolving relative
    /// detail links.
    pub fn base_url(&self) -> &'static str {
        match self {
            SourceSite::Indeed => "https://in.indeed.com",
            SourceSite::Naukri => "https://www.naukri.com",
        }
    }

    /// Site-specific ceiling on how many result pages one run may request.
    pub fn max_pages_ceiling(&self) -> u32 {
        match self {
            SourceSite::Indeed => 20,
            SourceSite::Naukri => 15,
        }
    }

    /// Resolves a site from a URL's domain. Unrecognized domains yield
    /// `None`; the caller must treat that as a configuration error.
    pub fn for_url(url: &str) -> Option<Self> {
        let parsed = url::Url::parse(url).ok()?;
        let host = parsed.host_str()?.to_lowercase();
        Self::for_domain(&host)
    }

    /// Resolves a site from a bare domain, accepting country subdomains
    /// (e.g. `in.indeed.com`).
    pub fn for_domain(domain: &str) -> Option<Self> {
        let domain = domain.to_lowercase();
        if domain == "indeed.com" || domain.ends_with(".indeed.com") {
            Some(SourceSite::Indeed)
        } else if domain == "naukri.com" || domain.ends_with(".naukri.com") {
            Some(SourceSite::Naukri)
        } else {
            None
        }
    }
}

impl std::fmt::Display for SourceSite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceSite::Indeed => f.write_str("indeed"),
            SourceSite::Naukri => f.write_str("naukri"),
        }
    }
}

impl std::str::FromStr for SourceSite {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "indeed" => Ok(SourceSite::Indeed),
            "naukri" => Ok(SourceSite::Naukri),
            other => Err(format!("unknown site '{}', expected indeed|naukri", other)),
        }
    }
}

/// How raw documents are acquired
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchStrategy {
    /// Stateless HTTP request
    Http,
    /// Managed headless-browser navigation
    Browser,
}

impl FetchStrategy {
    /// How many consecutive empty pages signal end-of-results.
    ///
    /// Browser-mode already absorbs transient render failures internally,
    /// so a single empty page is treated as the stop signal there, while
    /// HTTP-mode waits for a confirming second empty page. The thresholds
    /// are deliberately not unified.
    pub fn empty_page_threshold(&self) -> u32 {
        match self {
            FetchStrategy::Http => 2,
            FetchStrategy::Browser => 1,
        }
    }
}

impl std::fmt::Display for FetchStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchStrategy::Http => f.write_str("http"),
            FetchStrategy::Browser => f.write_str("browser"),
        }
    }
}

impl std::str::FromStr for FetchStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "http" => Ok(FetchStrategy::Http),
            "browser" => Ok(FetchStrategy::Browser),
            other => Err(format!(
                "unknown fetch strategy '{}', expected http|browser",
                other
            )),
        }
    }
}

/// Raw extracted listing candidate, produced by an extractor and consumed
/// only by the pipeline. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingFragment {
    /// Site-native identifier, if the card exposed one
    pub external_id: Option<String>,
    pub title: Option<String>,
    pub organization: Option<String>,
    pub location_text: Option<String>,
    pub compensation_text: Option<String>,
    pub description_snippet: Option<String>,
    /// Link to the posting's detail page, possibly relative
    pub detail_url: Option<String>,
    pub source_site: SourceSite,
    pub extracted_at: DateTime<Utc>,
}

impl ListingFragment {
    /// Empty fragment stamped with its origin.
    pub fn new(source_site: SourceSite) -> Self {
        Self {
            external_id: None,
            title: None,
            organization: None,
            location_text: None,
            compensation_text: None,
            description_snippet: None,
            detail_url: None,
            source_site,
            extracted_at: Utc::now(),
        }
    }
}

/// A listing fragment after cleaning.
///
/// Invariant, enforced by the pipeline's validate stage: a normalized
/// listing has a non-empty `title` or `organization`, and a non-empty
/// `external_id` or `detail_url` (which is always absolute).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedListing {
    pub external_id: Option<String>,
    pub title: Option<String>,
    pub organization: Option<String>,
    pub location_text: Option<String>,
    pub compensation_text: Option<String>,
    pub description_snippet: Option<String>,
    pub detail_url: Option<String>,
    pub source_site: SourceSite,
    pub extracted_at: DateTime<Utc>,
}

// Lets callers merge listing sets and re-run the pipeline over them.
impl From<NormalizedListing> for ListingFragment {
    fn from(listing: NormalizedListing) -> Self {
        ListingFragment {
            external_id: listing.external_id,
            title: listing.title,
            organization: listing.organization,
            location_text: listing.location_text,
            compensation_text: listing.compensation_text,
            description_snippet: listing.description_snippet,
            detail_url: listing.detail_url,
            source_site: listing.source_site,
            extracted_at: listing.extracted_at,
        }
    }
}

/// Input contract for one scrape run, immutable for its duration
#[derive(Debug, Clone)]
pub struct ScrapeParams {
    /// Search keyword, e.g. "Software Engineer"
    pub keyword: String,
    /// Search location, e.g. "Bengaluru"
    pub location: String,
    /// Number of result pages to request, bounded by the site ceiling
    pub max_pages: u32,
}

/// Transient per-page signal delivered synchronously to the caller's
/// observer after each page completes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressEvent {
    pub current_page: u32,
    pub total_pages: u32,
    pub cumulative_listings_found: usize,
}

/// One recorded per-page failure
#[derive(Debug, Clone, Serialize)]
pub struct RunErrorRecord {
    pub page: u32,
    pub url: String,
    pub kind: FetchErrorKind,
    pub message: String,
    pub occurred_at: DateTime<Utc>,
}

impl RunErrorRecord {
    pub fn from_fetch_error(page: u32, error: &crate::FetchError) -> Self {
        Self {
            page,
            url: error.url.clone(),
            kind: error.kind,
            message: error.cause.clone(),
            occurred_at: Utc::now(),
        }
    }
}

/// Terminal outcome of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    /// Every requested page was processed without recorded errors
    Completed,
    /// The run finished but swallowed one or more per-page errors
    Partial,
    /// The run aborted on an unrecoverable error
    Failed,
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunStatus::Completed => f.write_str("completed"),
            RunStatus::Partial => f.write_str("partial"),
            RunStatus::Failed => f.write_str("failed"),
        }
    }
}

/// Counters and error records for one run
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunStatistics {
    pub requests_attempted: u64,
    pub requests_succeeded: u64,
    pub requests_failed: u64,
    /// Raw fragments accumulated before normalization
    pub fragments_extracted: usize,
    pub duplicates_removed: usize,
    pub invalid_dropped: usize,
    pub duration_ms: u64,
    pub errors: Vec<RunErrorRecord>,
}

impl RunStatistics {
    pub fn set_duration(&mut self, duration: Duration) {
        self.duration_ms = duration.as_millis() as u64;
    }
}

/// Final output of one scrape run
#[derive(Debug, Clone, Serialize)]
pub struct ScrapeRunResult {
    pub listings: Vec<NormalizedListing>,
    pub statistics: RunStatistics,
    pub status: RunStatus,
}
