use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Placeholder substituted with the category letter in `category-url`
pub const ALPHABET_PLACEHOLDER: &str = "{alphabet}";

/// Main configuration structure for the crawler
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub traversal: TraversalConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Category listing URL template, `{alphabet}` is replaced by the letter
    #[serde(rename = "category-url")]
    pub category_url: String,

    /// Retries after the first failed attempt before a fetch is abandoned
    #[serde(rename = "max-retries", default = "default_max_retries")]
    pub max_retries: u32,

    /// Backoff unit in milliseconds; attempt `n` waits `n` units
    #[serde(rename = "backoff-unit-ms", default = "default_backoff_unit_ms")]
    pub backoff_unit_ms: u64,

    /// Per-request timeout for page loads (seconds)
    #[serde(
        rename = "page-load-timeout-secs",
        default = "default_page_load_timeout_secs"
    )]
    pub page_load_timeout_secs: u64,
}

impl CrawlerConfig {
    pub fn backoff_unit(&self) -> Duration {
        Duration::from_millis(self.backoff_unit_ms)
    }

    pub fn page_load_timeout(&self) -> Duration {
        Duration::from_secs(self.page_load_timeout_secs)
    }
}

/// Alphabet traversal range
#[derive(Debug, Clone, Deserialize)]
pub struct TraversalConfig {
    /// Last letter of the traversal range
    #[serde(rename = "final-letter", default = "default_final_letter")]
    pub final_letter: char,

    /// Whether `final-letter` itself is crawled
    #[serde(rename = "include-final-letter", default)]
    pub include_final_letter: bool,
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self {
            final_letter: default_final_letter(),
            include_final_letter: false,
        }
    }
}

impl TraversalConfig {
    /// Returns the last letter that is actually visited
    ///
    /// `None` when the range is empty (final letter `A`, excluded).
    pub fn last_visited_letter(&self) -> Option<char> {
        if self.include_final_letter {
            Some(self.final_letter)
        } else {
            crate::state::previous_letter(self.final_letter)
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Formats the user agent string: `Name/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving the timestamped dump files
    #[serde(rename = "resources-dir")]
    pub resources_dir: PathBuf,

    /// Dump file name prefix
    #[serde(rename = "file-prefix", default = "default_file_prefix")]
    pub file_prefix: String,

    /// Path to the checkpoint file
    #[serde(rename = "checkpoint-path")]
    pub checkpoint_path: PathBuf,
}

fn default_max_retries() -> u32 {
    3
}

fn default_backoff_unit_ms() -> u64 {
    4000
}

fn default_page_load_timeout_secs() -> u64 {
    20
}

fn default_final_letter() -> char {
    'Z'
}

fn default_file_prefix() -> String {
    "business".to_string()
}
