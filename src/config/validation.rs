use crate::config::types::{BrowserSettings, EngineConfig, HttpSettings, RunSettings};
use crate::ConfigError;

/// Validates the entire engine configuration
pub fn validate(config: &EngineConfig) -> Result<(), ConfigError> {
    validate_http_settings(&config.http)?;
    validate_browser_settings(&config.browser)?;
    validate_run_settings(&config.run)?;
    Ok(())
}

/// Validates HTTP-mode fetcher settings
fn validate_http_settings(settings: &HttpSettings) -> Result<(), ConfigError> {
    if settings.request_timeout_ms < 1_000 {
        return Err(ConfigError::Validation(format!(
            "request-timeout-ms must be >= 1000, got {}",
            settings.request_timeout_ms
        )));
    }

    if settings.connect_timeout_ms < 100 {
        return Err(ConfigError::Validation(format!(
            "connect-timeout-ms must be >= 100, got {}",
            settings.connect_timeout_ms
        )));
    }

    if settings.retry_attempts > 10 {
        return Err(ConfigError::Validation(format!(
            "retry-attempts must be <= 10, got {}",
            settings.retry_attempts
        )));
    }

    if let Some(ref agent) = settings.user_agent {
        if agent.trim().is_empty() {
            return Err(ConfigError::Validation(
                "user-agent override cannot be blank".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validates browser-mode fetcher settings
fn validate_browser_settings(settings: &BrowserSettings) -> Result<(), ConfigError> {
    if settings.navigation_timeout_ms < 1_000 {
        return Err(ConfigError::Validation(format!(
            "navigation-timeout-ms must be >= 1000, got {}",
            settings.navigation_timeout_ms
        )));
    }

    if settings.settle_delay_ms > 30_000 {
        return Err(ConfigError::Validation(format!(
            "settle-delay-ms must be <= 30000, got {}",
            settings.settle_delay_ms
        )));
    }

    if settings.card_wait_timeout_ms > 60_000 {
        return Err(ConfigError::Validation(format!(
            "card-wait-timeout-ms must be <= 60000, got {}",
            settings.card_wait_timeout_ms
        )));
    }

    Ok(())
}

/// Validates run-level pacing settings
fn validate_run_settings(settings: &RunSettings) -> Result<(), ConfigError> {
    if settings.page_delay_ms > 60_000 {
        return Err(ConfigError::Validation(format!(
            "page-delay-ms must be <= 60000, got {}",
            settings.page_delay_ms
        )));
    }

    Ok(())
}
