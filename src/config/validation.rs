use crate::config::types::{Config, CrawlerConfig, InputConfig, OutputConfig, UserAgentConfig};
use crate::{ConfigError, ConfigResult};
use url::Url;

/// Upper bound for the page buffer capacity
const MAX_BUFFER_CAPACITY: usize = 1000;

/// Upper bound for the number of fetch workers
const MAX_FETCH_WORKERS: usize = 100;

/// Validates the entire configuration
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_input_config(&config.input)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> ConfigResult<()> {
    if config.max_concurrent_fetches < 1 || config.max_concurrent_fetches > MAX_BUFFER_CAPACITY {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_fetches must be between 1 and {}, got {}",
            MAX_BUFFER_CAPACITY, config.max_concurrent_fetches
        )));
    }

    if config.fetch_workers < 1 || config.fetch_workers > MAX_FETCH_WORKERS {
        return Err(ConfigError::Validation(format!(
            "fetch_workers must be between 1 and {}, got {}",
            MAX_FETCH_WORKERS, config.fetch_workers
        )));
    }

    if config.url_channel_capacity == Some(0) {
        return Err(ConfigError::Validation(
            "url_channel_capacity must be >= 1 when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> ConfigResult<()> {
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

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::Validation(format!("Invalid contact_url: {}", e)))?;

    Ok(())
}

/// Validates URL provider configuration
fn validate_input_config(config: &InputConfig) -> ConfigResult<()> {
    if config.path.is_empty() {
        return Err(ConfigError::Validation(
            "input path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> ConfigResult<()> {
    if config.results_path.is_empty() {
        return Err(ConfigError::Validation(
            "results_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}
