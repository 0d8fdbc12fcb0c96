use crate::config::types::{Config, FetchConfig, OutputConfig, PolicyConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_fetch_config(&config.fetch)?;
    validate_output_config(&config.output)?;
    validate_policy_config(&config.policy)?;
    Ok(())
}

/// Validates fetch configuration
fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs < 1 || config.timeout_secs > 300 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be between 1 and 300, got {}",
            config.timeout_secs
        )));
    }

    if config.connect_timeout_secs < 1 || config.connect_timeout_secs > config.timeout_secs {
        return Err(ConfigError::Validation(format!(
            "connect-timeout-secs must be between 1 and timeout-secs ({}), got {}",
            config.timeout_secs, config.connect_timeout_secs
        )));
    }

    if config.probe_timeout_secs < 1 || config.probe_timeout_secs > 60 {
        return Err(ConfigError::Validation(format!(
            "probe-timeout-secs must be between 1 and 60, got {}",
            config.probe_timeout_secs
        )));
    }

    if config.max_retries > 20 {
        return Err(ConfigError::Validation(format!(
            "max-retries must be <= 20, got {}",
            config.max_retries
        )));
    }

    if let Some(referer) = &config.referer {
        Url::parse(referer)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid referer '{}': {}", referer, e)))?;
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.output_dir.is_empty() {
        return Err(ConfigError::Validation(
            "output-dir cannot be empty".to_string(),
        ));
    }

    if config.links_subdir.is_empty() || config.links_subdir.contains(['/', '\\']) {
        return Err(ConfigError::Validation(format!(
            "links-subdir must be a plain directory name, got '{}'",
            config.links_subdir
        )));
    }

    Ok(())
}

/// Validates policy configuration
fn validate_policy_config(config: &PolicyConfig) -> Result<(), ConfigError> {
    for domain in &config.blocked_domains {
        validate_domain_entry(domain)?;
    }

    for phrase in &config.excluded_link_texts {
        if phrase.trim().is_empty() {
            return Err(ConfigError::Validation(
                "excluded-link-texts entries cannot be empty".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validates a single blocked-domain entry
///
/// Entries are bare hostnames ("example.com", "tracker.example.co.uk"),
/// not URLs or patterns.
fn validate_domain_entry(domain: &str) -> Result<(), ConfigError> {
    if domain.is_empty() {
        return Err(ConfigError::Validation(
            "blocked-domains entries cannot be empty".to_string(),
        ));
    }

    if domain.contains("://") || domain.contains('/') {
        return Err(ConfigError::Validation(format!(
            "blocked-domains entry '{}' must be a bare hostname, not a URL",
            domain
        )));
    }

    if domain.chars().any(char::is_whitespace) {
        return Err(ConfigError::Validation(format!(
            "blocked-domains entry '{}' contains whitespace",
            domain
        )));
    }

    Ok(())
}
