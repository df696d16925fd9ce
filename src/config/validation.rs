use crate::config::types::{Config, OutputConfig, UserAgentConfig, WarmupConfig};
use crate::ConfigError;
use url::Url;

/// Upper bound on the worker pool size
pub const MAX_PARALLELISM: usize = 256;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_warmup_config(&config.warmup)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates warm-up configuration
fn validate_warmup_config(config: &WarmupConfig) -> Result<(), ConfigError> {
    if config.sitemaps.is_empty() {
        return Err(ConfigError::Validation(
            "at least one sitemap URL is required".to_string(),
        ));
    }

    for sitemap in &config.sitemaps {
        validate_sitemap_url(sitemap)?;
    }

    if config.parallelism < 1 || config.parallelism > MAX_PARALLELISM {
        return Err(ConfigError::Validation(format!(
            "parallelism must be between 1 and {}, got {}",
            MAX_PARALLELISM, config.parallelism
        )));
    }

    if config.limit == Some(0) {
        return Err(ConfigError::Validation(
            "limit must be >= 1 when set".to_string(),
        ));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    Ok(())
}

/// Validates that a sitemap location is an absolute HTTP(S) URL
fn validate_sitemap_url(sitemap: &str) -> Result<(), ConfigError> {
    let url = Url::parse(sitemap)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid sitemap URL '{}': {}", sitemap, e)))?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::InvalidUrl(format!(
            "Sitemap URL '{}' must use http or https, got '{}'",
            sitemap, other
        ))),
    }
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.name.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent name cannot be empty".to_string(),
        ));
    }

    if config.name.chars().any(|c| c.is_whitespace() || c == '/') {
        return Err(ConfigError::Validation(format!(
            "user-agent name must not contain whitespace or '/', got '{}'",
            config.name
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if let Some(path) = &config.report_path {
        if path.is_empty() {
            return Err(ConfigError::Validation(
                "report-path cannot be empty".to_string(),
            ));
        }
    }

    Ok(())
}
