use serde::Deserialize;
use std::time::Duration;

/// Engine settings: timeouts, retry budgets, and delays for both fetch
/// strategies plus run-level pacing. All sections and fields are optional
/// in the TOML file; absent values fall back to the defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    #[serde(default)]
    pub http: HttpSettings,
    #[serde(default)]
    pub browser: BrowserSettings,
    #[serde(default)]
    pub run: RunSettings,
}

/// HTTP-mode fetcher settings
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpSettings {
    /// Whole-request timeout (milliseconds)
    #[serde(rename = "request-timeout-ms", default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Connection-establishment timeout (milliseconds)
    #[serde(rename = "connect-timeout-ms", default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    /// Retry budget for listing-page fetches (additional attempts after
    /// the first)
    #[serde(rename = "retry-attempts", default = "default_retry_attempts")]
    pub retry_attempts: u32,

    /// Fixed delay between retry attempts (milliseconds)
    #[serde(rename = "retry-delay-ms", default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Override for the browser-identifying User-Agent header
    #[serde(rename = "user-agent", default)]
    pub user_agent: Option<String>,
}

/// Browser-mode fetcher settings
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BrowserSettings {
    /// Navigation deadline per page (milliseconds)
    #[serde(rename = "navigation-timeout-ms", default = "default_navigation_timeout_ms")]
    pub navigation_timeout_ms: u64,

    /// Fixed pause after the DOM is parsed, letting client-side rendering
    /// finish (milliseconds)
    #[serde(rename = "settle-delay-ms", default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,

    /// Bounded wait for a listing card to become visible (milliseconds)
    #[serde(rename = "card-wait-timeout-ms", default = "default_card_wait_timeout_ms")]
    pub card_wait_timeout_ms: u64,

    /// Run Chromium headless
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Extra Chromium command-line arguments
    #[serde(rename = "chrome-args", default)]
    pub chrome_args: Vec<String>,
}

/// Run-level pacing and error policy defaults
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunSettings {
    /// Sleep between result pages, to stay under per-site rate limits
    /// (milliseconds)
    #[serde(rename = "page-delay-ms", default = "default_page_delay_ms")]
    pub page_delay_ms: u64,

    /// Swallow per-page fetch errors and keep paginating instead of
    /// failing the whole run
    #[serde(rename = "continue-on-error", default)]
    pub continue_on_error: bool,
}

impl HttpSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

impl BrowserSettings {
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_timeout_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn card_wait_timeout(&self) -> Duration {
        Duration::from_millis(self.card_wait_timeout_ms)
    }
}

impl RunSettings {
    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            request_timeout_ms: default_request_timeout_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
            retry_attempts: default_retry_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
            user_agent: None,
        }
    }
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            navigation_timeout_ms: default_navigation_timeout_ms(),
            settle_delay_ms: default_settle_delay_ms(),
            card_wait_timeout_ms: default_card_wait_timeout_ms(),
            headless: default_headless(),
            chrome_args: Vec::new(),
        }
    }
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            page_delay_ms: default_page_delay_ms(),
            continue_on_error: false,
        }
    }
}

fn default_request_timeout_ms() -> u64 {
    30_000
}

fn default_connect_timeout_ms() -> u64 {
    10_000
}

fn default_retry_attempts() -> u32 {
    2
}

fn default_retry_delay_ms() -> u64 {
    3_000
}

fn default_navigation_timeout_ms() -> u64 {
    30_000
}

fn default_settle_delay_ms() -> u64 {
    1_000
}

fn default_card_wait_timeout_ms() -> u64 {
    8_000
}

fn default_headless() -> bool {
    true
}

fn default_page_delay_ms() -> u64 {
    2_000
}
