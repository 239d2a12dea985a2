//! Page rendering capability
//!
//! The crawl only needs two things from a browser-like client: load a URL and
//! hand back its document, and activate a control on a loaded page. `Renderer`
//! captures exactly that so the rest of the crate never touches the transport.

use crate::config::UserAgentConfig;
use crate::extract::resolve_link;
use lazy_static::lazy_static;
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;
use thiserror::Error;

lazy_static! {
    static ref BODY_CHILD: Selector = Selector::parse("body *").unwrap();
}

/// Errors raised by a single render attempt
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Invalid selector '{0}'")]
    InvalidSelector(String),
}

/// A loaded page and the URL it was finally served from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    pub url: String,
    pub html: String,
}

impl RenderedPage {
    pub fn new(url: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            html: html.into(),
        }
    }

    /// Parses the page into a queryable document
    pub fn document(&self) -> Html {
        Html::parse_document(&self.html)
    }

    /// Returns true if `<body>` has at least one element inside it
    ///
    /// Loads that silently fail tend to produce an empty body, so the fetcher
    /// treats a false result as a failed attempt.
    pub fn has_body_content(&self) -> bool {
        let document = self.document();
        let has_element = document.select(&BODY_CHILD).next().is_some();
        has_element
    }
}

/// Trait for page rendering clients (to allow mocking)
#[async_trait::async_trait]
pub trait Renderer: Send + Sync {
    /// Loads `url` and returns its document
    async fn load(&self, url: &str) -> Result<RenderedPage, RenderError>;

    /// Activates the first element matching `selector` on `page`
    ///
    /// Returns `Ok(None)` when no such element exists, otherwise the page as
    /// it looks after the interaction.
    async fn click(
        &self,
        page: &RenderedPage,
        selector: &str,
    ) -> Result<Option<RenderedPage>, RenderError>;
}

/// What activating a control would do
#[derive(Debug, PartialEq, Eq)]
enum Control {
    Missing,
    Link(String),
    Inert,
}

fn locate_control(page: &RenderedPage, selector: &str) -> Result<Control, RenderError> {
    let selector =
        Selector::parse(selector).map_err(|_| RenderError::InvalidSelector(selector.to_string()))?;
    let document = page.document();

    let Some(element) = document.select(&selector).next() else {
        return Ok(Control::Missing);
    };

    let target = url::Url::parse(&page.url).ok().and_then(|base| {
        element
            .value()
            .attr("href")
            .and_then(|href| resolve_link(href, &base))
    });

    Ok(match target {
        Some(href) => Control::Link(href),
        None => Control::Inert,
    })
}

/// Renderer backed by plain HTTP requests
///
/// Scripts are not executed, so clicking a control follows its `href` when it
/// has a navigable one and otherwise leaves the page as it is.
#[derive(Debug, Clone)]
pub struct HttpRenderer {
    client: Client,
}

impl HttpRenderer {
    /// Builds a renderer with the crawler's user agent and page-load timeout
    ///
    /// # Example
    ///
    /// ```no_run
    /// use indiacom_crawler::config::UserAgentConfig;
    /// use indiacom_crawler::crawler::HttpRenderer;
    /// use std::time::Duration;
    ///
    /// let config = UserAgentConfig {
    ///     crawler_name: "IndiacomCrawler".to_string(),
    ///     crawler_version: "1.0".to_string(),
    ///     contact_url: "https://example.com/about".to_string(),
    ///     contact_email: "admin@example.com".to_string(),
    /// };
    ///
    /// let renderer = HttpRenderer::new(&config, Duration::from_secs(20)).unwrap();
    /// ```
    pub fn new(config: &UserAgentConfig, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(config.header_value())
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl Renderer for HttpRenderer {
    async fn load(&self, url: &str) -> Result<RenderedPage, RenderError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| RenderError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RenderError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let final_url = response.url().to_string();
        let html = response.text().await.map_err(|source| RenderError::Http {
            url: url.to_string(),
            source,
        })?;

        Ok(RenderedPage::new(final_url, html))
    }

    async fn click(
        &self,
        page: &RenderedPage,
        selector: &str,
    ) -> Result<Option<RenderedPage>, RenderError> {
        match locate_control(page, selector)? {
            Control::Missing => Ok(None),
            Control::Link(href) => self.load(&href).await.map(Some),
            Control::Inert => Ok(Some(page.clone())),
        }
    }
}
