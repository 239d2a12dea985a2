//! Crawler module for fetching and traversing the directory
//!
//! This module contains the core crawling logic, including:
//! - The page rendering capability and its HTTP implementation
//! - Fetching with bounded linear backoff
//! - The resumable alphabet → keyword → page orchestrator

mod fetcher;
mod orchestrator;
mod renderer;

pub use fetcher::{FetchAttempt, FetchError, ResilientFetcher, DEFAULT_BACKOFF_UNIT, DEFAULT_MAX_RETRIES};
pub use orchestrator::{CrawlOrchestrator, CrawlStats};
pub use renderer::{HttpRenderer, RenderError, RenderedPage, Renderer};

use crate::config::Config;
use crate::extract::PaginationIndex;
use crate::output::open_output_file;
use crate::storage::{CheckpointStore, TomlCheckpointStore};
use crate::CrawlerError;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Reset the checkpoint (and create the output directory) if asked to
/// 2. Refuse to start without a checkpoint unless resetting
/// 3. Open a new timestamped dump file
/// 4. Build the HTTP renderer and resilient fetcher
/// 5. Walk the directory from the checkpoint onwards
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `reset` - Ignore previous progress and start from (`A`, 1, 1)
///
/// # Returns
///
/// * `Ok(CrawlStats)` - Crawl completed
/// * `Err(CrawlerError)` - Startup failed or persistence became unavailable
///
/// # Example
///
/// ```no_run
/// use indiacom_crawler::config::load_config;
/// use indiacom_crawler::crawler::crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("config.toml"))?;
/// let stats = crawl(config, false).await?;
/// println!("{} rows written", stats.records_written);
/// # Ok(())
/// # }
/// ```
pub async fn crawl(config: Config, reset: bool) -> Result<CrawlStats, CrawlerError> {
    let store = TomlCheckpointStore::new(config.output.checkpoint_path.clone());

    if reset {
        std::fs::create_dir_all(&config.output.resources_dir)?;
        if let Some(parent) = config.output.checkpoint_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
    } else if !store.exists() {
        return Err(CrawlerError::ConfigurationMissing {
            path: store.location(),
        });
    }

    let (_, sink) = open_output_file(&config.output.resources_dir, &config.output.file_prefix)?;

    let renderer = HttpRenderer::new(&config.user_agent, config.crawler.page_load_timeout())?;
    let fetcher = ResilientFetcher::from_config(renderer, &config.crawler);
    let index = PaginationIndex::from_config(&config.crawler);

    let mut orchestrator =
        CrawlOrchestrator::new(fetcher, index, store, sink, config.traversal.clone(), reset)?;
    orchestrator.run().await
}
