use crate::config::types::{Config, CrawlerConfig, ExtractConfig, SinkConfig, UserAgentConfig};
use crate::ConfigError;
use scraper::Selector;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_extract_config(&config.extract)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_sink_config(&config.sink)?;
    Ok(())
}

/// Validates traversal bounds and the seed address
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    if config.timeout_ms < 1 {
        return Err(ConfigError::Validation(
            "timeout_ms must be >= 1ms".to_string(),
        ));
    }

    validate_http_url("seed-url", &config.seed_url)
}

/// Validates selectors, link pattern and record language
fn validate_extract_config(config: &ExtractConfig) -> Result<(), ConfigError> {
    validate_selector("title-selector", &config.title_selector)?;
    validate_selector("content-selector", &config.content_selector)?;

    if !config.link_prefix.starts_with('/') {
        return Err(ConfigError::Validation(format!(
            "link_prefix must be an absolute path starting with '/', got '{}'",
            config.link_prefix
        )));
    }

    if config.max_links_per_page < 1 {
        return Err(ConfigError::Validation(format!(
            "max_links_per_page must be >= 1, got {}",
            config.max_links_per_page
        )));
    }

    if config.language.trim().is_empty() {
        return Err(ConfigError::Validation(
            "language cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if config.crawler_version.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_version cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the sink endpoint and credential source
fn validate_sink_config(config: &SinkConfig) -> Result<(), ConfigError> {
    validate_http_url("endpoint", &config.endpoint)?;

    if config.api_key_env.is_empty() {
        return Err(ConfigError::Validation(
            "api_key_env cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_http_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", field, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' must use http or https",
            field, value
        )));
    }

    Ok(())
}

fn validate_selector(field: &str, selector: &str) -> Result<(), ConfigError> {
    Selector::parse(selector)
        .map(|_| ())
        .map_err(|e| ConfigError::InvalidSelector(format!("{} '{}': {:?}", field, selector, e)))
}
