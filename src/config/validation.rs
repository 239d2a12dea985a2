use crate::config::types::{
    Config, CrawlerConfig, OutputConfig, TraversalConfig, UserAgentConfig, ALPHABET_PLACEHOLDER,
};
use crate::extract::PaginationIndex;
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_traversal_config(&config.traversal)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if !config.category_url.contains(ALPHABET_PLACEHOLDER) {
        return Err(ConfigError::Validation(format!(
            "category_url must contain the {} placeholder, got '{}'",
            ALPHABET_PLACEHOLDER, config.category_url
        )));
    }

    let url = Url::parse(&PaginationIndex::from_config(config).url_for('A'))
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid category_url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "category_url must use HTTP or HTTPS, got '{}'",
            url.scheme()
        )));
    }

    if config.max_retries < 1 {
        return Err(ConfigError::Validation(format!(
            "max_retries must be >= 1, got {}",
            config.max_retries
        )));
    }

    if config.page_load_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "page_load_timeout_secs must be >= 1, got {}",
            config.page_load_timeout_secs
        )));
    }

    Ok(())
}

/// Validates the alphabet range
fn validate_traversal_config(config: &TraversalConfig) -> Result<(), ConfigError> {
    if !config.final_letter.is_ascii_uppercase() {
        return Err(ConfigError::Validation(format!(
            "final_letter must be an uppercase letter A-Z, got '{}'",
            config.final_letter
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
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
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.resources_dir.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "resources_dir cannot be empty".to_string(),
        ));
    }

    if config.checkpoint_path.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "checkpoint_path cannot be empty".to_string(),
        ));
    }

    if config.file_prefix.is_empty() || config.file_prefix.contains(['/', '\\']) {
        return Err(ConfigError::Validation(format!(
            "file_prefix must be a non-empty file name, got '{}'",
            config.file_prefix
        )));
    }

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact_email cannot be empty".to_string(),
        ));
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !parts[1].contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
