//! Leadscout: a job-listing acquisition engine
//!
//! This crate implements the scraping core of a lead-collection application:
//! pluggable site adapters (two target sites, two fetch strategies), a run
//! orchestrator that drives them across paginated result sets, and a
//! normalization pipeline producing clean, deduplicated listings.

pub mod config;
pub mod extract;
pub mod fetch;
pub mod model;
pub mod pipeline;
pub mod run;
pub mod scrape;

use thiserror::Error;

/// Main error type for leadscout operations
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    InvalidParams(#[from] ParameterValidationError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Browser initialization failed: {message}")]
    ResourceInit { message: String },

    #[error("No adapter registered for domain: {domain}")]
    UnknownSite { domain: String },

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Caller-fixable parameter errors, raised before any network activity.
///
/// Collects every violation in one pass so the caller can surface all of
/// them at once instead of fixing them one at a time.
#[derive(Debug, Clone, Error)]
#[error("Invalid scrape parameters: {}", .errors.join("; "))]
pub struct ParameterValidationError {
    pub errors: Vec<String>,
}

/// Classification of a failed fetch attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchErrorKind {
    /// HTTP 404
    NotFound,
    /// HTTP 403 (or an explicit block page)
    BlockedOrForbidden,
    /// HTTP 429
    RateLimited,
    /// HTTP 5xx
    UpstreamError,
    /// Connection-level failure
    NetworkError,
    /// Request or navigation exceeded its deadline
    Timeout,
}

impl std::fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            FetchErrorKind::NotFound => "not found",
            FetchErrorKind::BlockedOrForbidden => "blocked or forbidden",
            FetchErrorKind::RateLimited => "rate limited",
            FetchErrorKind::UpstreamError => "upstream error",
            FetchErrorKind::NetworkError => "network error",
            FetchErrorKind::Timeout => "timeout",
        };
        f.write_str(label)
    }
}

/// A failed fetch of one page, carrying the classified kind and the cause
#[derive(Debug, Clone, Error)]
#[error("Fetch failed ({kind}) for {url}: {cause}")]
pub struct FetchError {
    pub kind: FetchErrorKind,
    pub url: String,
    pub cause: String,
}

impl FetchError {
    pub fn new(kind: FetchErrorKind, url: impl Into<String>, cause: impl Into<String>) -> Self {
        Self {
            kind,
            url: url.into(),
            cause: cause.into(),
        }
    }
}

/// Result type alias for leadscout operations
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for single-page fetch operations
pub type FetchResult<T> = std::result::Result<T, FetchError>;

// Re-export commonly used types
pub use config::EngineConfig;
pub use model::{
    FetchStrategy, ListingFragment, NormalizedListing, ProgressEvent, RunStatistics, RunStatus,
    ScrapeParams, ScrapeRunResult, SourceSite,
};
pub use run::JobOrchestrator;
pub use scrape::{adapter_for, adapter_for_url, SiteAdapter};
