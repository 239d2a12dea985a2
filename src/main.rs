//! Indiacom Crawler main entry point
//!
//! This is the command-line interface for the indiacom yellow-pages crawler.

use clap::Parser;
use indiacom_crawler::config::{load_config, Config};
use indiacom_crawler::crawler::crawl;
use indiacom_crawler::output::OutputError;
use indiacom_crawler::storage::{CheckpointStore, TomlCheckpointStore};
use indiacom_crawler::CrawlerError;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Indiacom Crawler: a resumable yellow-pages scraper
///
/// Walks the business directory letter by letter, keyword by keyword and
/// page by page, writing one pipe-delimited row per listing. Progress is
/// checkpointed after every page so an interrupted run picks up where it
/// stopped.
#[derive(Parser, Debug)]
#[command(name = "indiacom-crawler")]
#[command(version = "1.0.0")]
#[command(about = "A resumable yellow-pages scraper", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Discard the checkpoint and start again from the letter A
    #[arg(long, visible_alias = "purge-history")]
    reset: bool,

    /// Validate config and show where the crawl would start without crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = match load_config(&cli.config) {
        Ok(config) => {
            tracing::info!("Configuration loaded successfully");
            config
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config, cli.reset)?;
    } else {
        handle_crawl(config, cli.reset).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("indiacom_crawler=info,warn"),
            1 => EnvFilter::new("indiacom_crawler=debug,info"),
            2 => EnvFilter::new("indiacom_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows the resume point
fn handle_dry_run(config: &Config, reset: bool) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Indiacom Crawler Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Category URL: {}", config.crawler.category_url);
    println!("  Max retries: {}", config.crawler.max_retries);
    println!("  Backoff unit: {}ms", config.crawler.backoff_unit_ms);
    println!(
        "  Page load timeout: {}s",
        config.crawler.page_load_timeout_secs
    );

    println!("\nTraversal:");
    match config.traversal.last_visited_letter() {
        Some(last) => println!("  Letters: A..={}", last),
        None => println!("  Letters: none"),
    }

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Directory: {}", config.output.resources_dir.display());
    println!("  File prefix: {}", config.output.file_prefix);
    println!("  Checkpoint: {}", config.output.checkpoint_path.display());

    let store = TomlCheckpointStore::new(config.output.checkpoint_path.clone());
    println!();
    if reset {
        println!("✓ Would reset the checkpoint and start at A, keyword 1, page 1");
    } else if store.exists() {
        let checkpoint = store.load()?;
        println!("✓ Would resume at {}", checkpoint);
    } else {
        println!("✗ No checkpoint found, re-run with --reset to start a new crawl");
    }

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, reset: bool) -> Result<(), Box<dyn std::error::Error>> {
    if reset {
        tracing::info!("Starting fresh crawl (ignoring previous progress)");
    } else {
        tracing::info!("Resuming crawl from the saved checkpoint");
    }

    match crawl(config, reset).await {
        Ok(stats) => {
            tracing::info!(
                "Crawl completed: {} pages crawled, {} pages skipped, {} keywords skipped, {} rows written",
                stats.pages_crawled,
                stats.pages_skipped,
                stats.keywords_skipped,
                stats.records_written
            );
            Ok(())
        }
        Err(CrawlerError::OutputUnavailable(OutputError::DirectoryMissing(_))) => {
            eprintln!("Output directory not found. Re-run the crawler with --reset");
            std::process::exit(1);
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
