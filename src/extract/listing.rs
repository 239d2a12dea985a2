//! Business listing blocks on a keyword page

use crate::crawler::RenderedPage;
use crate::extract::{element_text, resolve_link};
use lazy_static::lazy_static;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Placeholder for a field the page does not provide
pub const NOT_FOUND: &str = "Not Found";

lazy_static! {
    static ref LISTING_BLOCK: Selector = Selector::parse("div.b_listing").unwrap();
    static ref BUSINESS_NAME: Selector = Selector::parse("div.b_name").unwrap();
    static ref BUSINESS_ADDRESS: Selector = Selector::parse("div.b_address").unwrap();
    static ref DETAIL_LINK: Selector = Selector::parse("div.b_name a[href]").unwrap();
}

/// A listing as it appears on a keyword page, before its phones are known
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingCandidate {
    pub business_name: String,
    pub location: String,
    /// Absolute URL of the detail page; no phone lookup without it
    pub detail_href: Option<String>,
}

/// Extracts listing candidates from a keyword page
pub struct ListingExtractor;

impl ListingExtractor {
    /// Yields one candidate per listing block, in document order
    ///
    /// The iterator borrows `document` and is consumed in a single pass.
    pub fn extract<'a>(
        document: &'a Html,
        base_url: Option<&'a Url>,
    ) -> impl Iterator<Item = ListingCandidate> + 'a {
        document
            .select(&LISTING_BLOCK)
            .map(move |block| candidate_from_block(block, base_url))
    }

    /// Extracts every candidate of a rendered page
    pub fn extract_page(page: &RenderedPage) -> Vec<ListingCandidate> {
        let base_url = Url::parse(&page.url).ok();
        let document = page.document();
        let candidates = Self::extract(&document, base_url.as_ref()).collect();
        candidates
    }
}

fn candidate_from_block(block: ElementRef<'_>, base_url: Option<&Url>) -> ListingCandidate {
    let business_name = first_text(block, &BUSINESS_NAME);
    let location = first_text(block, &BUSINESS_ADDRESS);

    let detail_href = block
        .select(&DETAIL_LINK)
        .next()
        .and_then(|link| link.value().attr("href"))
        .and_then(|href| base_url.and_then(|base| resolve_link(href, base)));

    ListingCandidate {
        business_name,
        location,
        detail_href,
    }
}

fn first_text(block: ElementRef<'_>, selector: &Selector) -> String {
    block
        .select(selector)
        .next()
        .and_then(element_text)
        .unwrap_or_else(|| NOT_FOUND.to_string())
}
