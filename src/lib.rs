//! Indiacom Crawler: a resumable yellow-pages scraper
//!
//! This crate walks the indiacom.com business directory (alphabet → keyword →
//! page → listing → phone), writes one delimited row per listing and keeps a
//! checkpoint so an interrupted run continues from the last completed page.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod output;
pub mod state;
pub mod storage;

use thiserror::Error;

/// Main error type for crawler operations
#[derive(Debug, Error)]
pub enum CrawlerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch exhausted for {url} after {attempts} attempts")]
    FetchExhausted { url: String, attempts: u32 },

    #[error("Could not resolve keyword {ordinal} under '{letter}' ({url})")]
    CategoryResolutionFailed {
        letter: char,
        ordinal: usize,
        url: String,
    },

    #[error("Checkpoint unavailable: {0}")]
    PersistenceUnavailable(#[from] storage::StorageError),

    #[error("Output unavailable: {0}")]
    OutputUnavailable(#[from] output::OutputError),

    #[error("No checkpoint found at {path}; run with --reset to start a new crawl")]
    ConfigurationMissing { path: String },

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CrawlerError {
    /// Returns true for failures the crawl absorbs by skipping the owning unit
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::FetchExhausted { .. } | Self::CategoryResolutionFailed { .. }
        )
    }
}

impl From<crawler::FetchError> for CrawlerError {
    fn from(err: crawler::FetchError) -> Self {
        match err {
            crawler::FetchError::Exhausted { url, attempts, .. } => {
                Self::FetchExhausted { url, attempts }
            }
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for crawler operations
pub type Result<T> = std::result::Result<T, CrawlerError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlOrchestrator, HttpRenderer, RenderedPage, Renderer, ResilientFetcher};
pub use output::ListingRecord;
pub use state::{Checkpoint, CrawlState};
pub use storage::{CheckpointStore, TomlCheckpointStore};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_errors_are_recoverable() {
        let err = CrawlerError::FetchExhausted {
            url: "https://example.com/".to_string(),
            attempts: 4,
        };
        assert!(err.is_recoverable());

        let err = CrawlerError::CategoryResolutionFailed {
            letter: 'A',
            ordinal: 3,
            url: "https://example.com/kw".to_string(),
        };
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_persistence_errors_are_fatal() {
        let err = CrawlerError::ConfigurationMissing {
            path: "checkpoint.toml".to_string(),
        };
        assert!(!err.is_recoverable());

        let err: CrawlerError =
            storage::StorageError::Corrupt("bad letter".to_string()).into();
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_fetch_error_conversion() {
        let err: CrawlerError = crawler::FetchError::Exhausted {
            url: "https://example.com/a".to_string(),
            attempts: 4,
            last_error: "empty body".to_string(),
        }
        .into();
        assert!(matches!(err, CrawlerError::FetchExhausted { attempts: 4, .. }));
    }
}
