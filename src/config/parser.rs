use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration from TOML text
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::PaginationIndex;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const VALID_CONFIG: &str = r#"
[crawler]
category-url = "https://www.indiacom.com/yellow-pages/?catalphabet={alphabet}"

[user-agent]
crawler-name = "TestCrawler"
crawler-version = "1.0"
contact-url = "https://example.com/about"
contact-email = "admin@example.com"

[output]
resources-dir = "./resources"
checkpoint-path = "./checkpoint.toml"
"#;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config_with_defaults() {
        let file = create_temp_config(VALID_CONFIG);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.max_retries, 3);
        assert_eq!(config.crawler.backoff_unit_ms, 4000);
        assert_eq!(config.crawler.page_load_timeout_secs, 20);
        assert_eq!(config.traversal.final_letter, 'Z');
        assert!(!config.traversal.include_final_letter);
        assert_eq!(config.output.file_prefix, "business");
        assert_eq!(config.user_agent.crawler_name, "TestCrawler");
    }

    #[test]
    fn test_category_url_substitution() {
        let config = parse_config(VALID_CONFIG).unwrap();
        assert_eq!(
            PaginationIndex::from_config(&config.crawler).url_for('K'),
            "https://www.indiacom.com/yellow-pages/?catalphabet=K"
        );
    }

    #[test]
    fn test_traversal_section_overrides() {
        let content = format!(
            "{}\n[traversal]\nfinal-letter = \"C\"\ninclude-final-letter = true\n",
            VALID_CONFIG
        );
        let config = parse_config(&content).unwrap();
        assert_eq!(config.traversal.last_visited_letter(), Some('C'));
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let content = VALID_CONFIG.replace("{alphabet}", "A");
        let result = parse_config(&content);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }
}
