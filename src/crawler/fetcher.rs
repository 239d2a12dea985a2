//! Resilient page fetcher
//!
//! Wraps a `Renderer` with a bounded linear backoff:
//!
//! | Attempt (0-indexed) | Delay before it |
//! |---------------------|-----------------|
//! | 0                   | none            |
//! | 1                   | 1 × unit        |
//! | 2                   | 2 × unit        |
//! | 3                   | 3 × unit        |
//!
//! An attempt fails if the renderer errors or the page comes back with an
//! empty `<body>`. Once the failure count exceeds the retry budget the fetch
//! gives up with `FetchError::Exhausted`; no renderer error ever escapes.

use crate::config::CrawlerConfig;
use crate::crawler::renderer::{RenderError, RenderedPage, Renderer};
use std::time::Duration;
use thiserror::Error;

/// Default number of retries after the first failed attempt
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default backoff unit
pub const DEFAULT_BACKOFF_UNIT: Duration = Duration::from_secs(4);

/// Errors returned by the fetcher
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Gave up on {url} after {attempts} attempts (last error: {last_error})")]
    Exhausted {
        url: String,
        attempts: u32,
        last_error: String,
    },
}

/// Retry bookkeeping for a single `fetch` call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchAttempt {
    count: u32,
}

impl FetchAttempt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of failed attempts so far
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Delay to wait before the next attempt
    pub fn delay(&self, unit: Duration) -> Duration {
        unit * self.count
    }

    pub fn record_failure(&mut self) {
        self.count += 1;
    }

    /// Returns true once more than `max_retries` attempts have failed
    pub fn is_exhausted(&self, max_retries: u32) -> bool {
        self.count > max_retries
    }
}

/// Why an attempt was rejected
#[derive(Debug, Error)]
enum AttemptFailure {
    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("page body is empty")]
    EmptyBody,
}

/// Fetcher that retries failed loads with linear backoff
pub struct ResilientFetcher<R> {
    renderer: R,
    max_retries: u32,
    backoff_unit: Duration,
}

impl<R: Renderer> ResilientFetcher<R> {
    /// Creates a fetcher with the default budget (3 retries, 4 s unit)
    pub fn new(renderer: R) -> Self {
        Self {
            renderer,
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_unit: DEFAULT_BACKOFF_UNIT,
        }
    }

    /// Creates a fetcher using the budget from the crawler configuration
    pub fn from_config(renderer: R, config: &CrawlerConfig) -> Self {
        Self::new(renderer)
            .with_max_retries(config.max_retries)
            .with_backoff_unit(config.backoff_unit())
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_backoff_unit(mut self, unit: Duration) -> Self {
        self.backoff_unit = unit;
        self
    }

    /// The wrapped renderer, for interactions that must not be retried
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Fetches `url`, retrying until it loads with a non-empty body
    ///
    /// # Returns
    ///
    /// * `Ok(RenderedPage)` - The loaded page
    /// * `Err(FetchError::Exhausted)` - Every attempt in the budget failed
    pub async fn fetch(&self, url: &str) -> Result<RenderedPage, FetchError> {
        let mut attempt = FetchAttempt::new();

        loop {
            let delay = attempt.delay(self.backoff_unit);
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            let failure = match self.renderer.load(url).await {
                Ok(page) if page.has_body_content() => return Ok(page),
                Ok(_) => AttemptFailure::EmptyBody,
                Err(e) => AttemptFailure::from(e),
            };

            attempt.record_failure();
            tracing::warn!(
                "Attempt {} for {} failed: {}",
                attempt.count(),
                url,
                failure
            );

            if attempt.is_exhausted(self.max_retries) {
                return Err(FetchError::Exhausted {
                    url: url.to_string(),
                    attempts: attempt.count(),
                    last_error: failure.to_string(),
                });
            }
        }
    }
}
