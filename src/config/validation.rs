use crate::config::types::{Config, HttpConfig, PacingConfig, SiteConfig, StoreConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_http_config(&config.http)?;
    validate_pacing_config(&config.pacing)?;
    validate_store_config(&config.store)?;
    Ok(())
}

/// Validates the source site configuration
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url must use http or https, got '{}'",
            config.base_url
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url has no host: '{}'",
            config.base_url
        )));
    }

    if config.total_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "total-pages must be >= 1, got {}",
            config.total_pages
        )));
    }

    if let Some(start) = config.start_page {
        if start < 1 || start > config.total_pages {
            return Err(ConfigError::Validation(format!(
                "start-page must be between 1 and {}, got {}",
                config.total_pages, start
            )));
        }
    }

    Ok(())
}

/// Validates request header configuration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if let Some(referer) = &config.referer {
        Url::parse(referer)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid referer: {}", e)))?;
    }

    if config.min_body_length < 1 {
        return Err(ConfigError::Validation(
            "min-body-length must be >= 1".to_string(),
        ));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "timeout-secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates pacing delays
fn validate_pacing_config(config: &PacingConfig) -> Result<(), ConfigError> {
    if config.item_delay_ms < 100 {
        return Err(ConfigError::Validation(format!(
            "item-delay-ms must be >= 100ms, got {}ms",
            config.item_delay_ms
        )));
    }

    if config.page_delay_ms < config.item_delay_ms {
        return Err(ConfigError::Validation(format!(
            "page-delay-ms ({}ms) must not be shorter than item-delay-ms ({}ms)",
            config.page_delay_ms, config.item_delay_ms
        )));
    }

    Ok(())
}

fn validate_store_config(config: &StoreConfig) -> Result<(), ConfigError> {
    match config.database_path.as_deref() {
        Some(path) if !path.trim().is_empty() => Ok(()),
        _ => Err(ConfigError::MissingStore),
    }
}
