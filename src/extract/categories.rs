//! Keyword sub-categories of an alphabet letter
//!
//! The category listing for a letter is a list of `li.catlink` blocks, each
//! holding a link to the keyword and its displayed number of entries, e.g.
//! `<li class="catlink"><a href="/bakers/">Bakers</a> (45)</li>`.

use crate::config::CrawlerConfig;
use crate::crawler::{FetchError, RenderedPage, Renderer, ResilientFetcher};
use crate::extract::{element_text, resolve_link};
use lazy_static::lazy_static;
use regex::Regex;
use scraper::Selector;
use url::Url;

/// Listings shown per keyword page
pub const PAGE_SIZE: usize = 30;

lazy_static! {
    static ref CATEGORY_BLOCK: Selector = Selector::parse("li.catlink").unwrap();
    static ref CATEGORY_LINK: Selector = Selector::parse("a[href]").unwrap();
    static ref ENTRY_COUNT: Regex = Regex::new(r"\d+").unwrap();
}

/// A keyword sub-category under one letter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordCategory {
    pub alphabet: char,
    /// 1-based position in the letter's keyword list
    pub ordinal: usize,
    pub name: String,
    pub href: String,
    pub total_entries: usize,
    pub page_count: usize,
}

impl KeywordCategory {
    /// URL of the `page`-th listing page of this keyword
    pub fn page_url(&self, page: usize) -> String {
        match Url::parse(&self.href) {
            Ok(mut url) => {
                url.query_pairs_mut()
                    .append_pair("page", &page.to_string());
                url.to_string()
            }
            Err(_) => format!("{}?page={}", self.href, page),
        }
    }
}

/// Number of pages needed for `total_entries` listings, never less than one
pub fn page_count(total_entries: usize) -> usize {
    total_entries.div_ceil(PAGE_SIZE).max(1)
}

/// Resolves the keyword list of a letter
#[derive(Debug, Clone)]
pub struct PaginationIndex {
    category_url: String,
}

impl PaginationIndex {
    /// Creates an index from a URL template containing `{alphabet}`
    pub fn new(category_url: impl Into<String>) -> Self {
        Self {
            category_url: category_url.into(),
        }
    }

    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self::new(config.category_url.clone())
    }

    /// Category listing URL of `letter`
    pub fn url_for(&self, letter: char) -> String {
        self.category_url
            .replace(crate::config::ALPHABET_PLACEHOLDER, &letter.to_string())
    }

    /// Fetches the keyword list of `letter`, in document order
    pub async fn categories_for<R: Renderer>(
        &self,
        fetcher: &ResilientFetcher<R>,
        letter: char,
    ) -> Result<Vec<KeywordCategory>, FetchError> {
        let page = fetcher.fetch(&self.url_for(letter)).await?;
        let categories = parse_categories(&page, letter);
        tracing::info!(
            "Found {} keywords for alphabet {}",
            categories.len(),
            letter
        );
        Ok(categories)
    }
}

/// Parses the keyword blocks of a category listing page
///
/// Blocks without a usable link are skipped; ordinals count only the kept
/// blocks so they stay stable for the same page content.
pub fn parse_categories(page: &RenderedPage, letter: char) -> Vec<KeywordCategory> {
    let base = Url::parse(&page.url).ok();
    let document = page.document();

    let mut categories = Vec::new();
    for block in document.select(&CATEGORY_BLOCK) {
        let Some(link) = block.select(&CATEGORY_LINK).next() else {
            tracing::debug!("Skipping keyword block without a link");
            continue;
        };

        let href = link
            .value()
            .attr("href")
            .and_then(|href| base.as_ref().and_then(|base| resolve_link(href, base)));
        let Some(href) = href else {
            tracing::debug!("Skipping keyword block with an unusable link");
            continue;
        };

        let block_text = block.text().collect::<String>();
        let total_entries = ENTRY_COUNT
            .find(&block_text)
            .and_then(|m| m.as_str().parse::<usize>().ok())
            .unwrap_or(0);

        categories.push(KeywordCategory {
            alphabet: letter,
            ordinal: categories.len() + 1,
            name: element_text(link).unwrap_or_default(),
            href,
            total_entries,
            page_count: page_count(total_entries),
        });
    }

    categories
}
