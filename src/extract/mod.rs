//! Extraction of structured data from directory pages
//!
//! This module turns rendered pages into values:
//! - `categories`: keyword sub-categories of a letter and their page counts
//! - `listing`: business listing blocks on a keyword page
//! - `phone`: phone numbers on a business detail page

mod categories;
mod listing;
mod phone;

pub use categories::{page_count, parse_categories, KeywordCategory, PaginationIndex, PAGE_SIZE};
pub use listing::{ListingCandidate, ListingExtractor, NOT_FOUND};
pub use phone::{dedupe, sanitize, PhoneExtractor, REVEALED_PHONE, REVEAL_CONTROL};

use scraper::ElementRef;
use url::Url;

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - fragment-only links
/// - Non-HTTP(S) URLs after resolution
pub fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) => {
            if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
                Some(absolute_url.to_string())
            } else {
                None
            }
        }
        Err(_) => None,
    }
}

/// Visible text of an element with runs of whitespace collapsed
///
/// Returns None when the element has no text at all.
pub(crate) fn element_text(element: ElementRef<'_>) -> Option<String> {
    let text = element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ");

    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
