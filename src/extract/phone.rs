//! Phone numbers on a business detail page
//!
//! Two strategies, first success wins:
//! 1. Click the "show phone" control and read the number it reveals.
//! 2. Scan the raw page source for Indian phone number formats.

use crate::crawler::{RenderedPage, Renderer};
use crate::extract::element_text;
use lazy_static::lazy_static;
use regex::Regex;
use scraper::Selector;

/// Control that reveals the phone number
pub const REVEAL_CONTROL: &str = "div#div_phoneadd a";

/// Where the revealed number appears
pub const REVEALED_PHONE: &str = "div#div_phoneadd > div.lighttext > strong > a";

lazy_static! {
    static ref REVEALED_PHONE_SELECTOR: Selector = Selector::parse(REVEALED_PHONE).unwrap();

    /// Scanned in this order: country code + 10 digits, then country code +
    /// area code + subscriber number.
    static ref PHONE_PATTERNS: [Regex; 2] = [
        Regex::new(r"\+?\(?91\)?\s*-\s*[0-9]{10}").unwrap(),
        Regex::new(r"\+?\(?91\)?\s*-\s*\(?[0-9]{1,4}\)?\s*-\s*[0-9]{8,10}").unwrap(),
    ];
}

/// Recovers phone numbers from detail pages
pub struct PhoneExtractor;

impl PhoneExtractor {
    /// Returns the phone numbers of `page`, deduplicated in discovery order
    pub async fn extract<R: Renderer>(renderer: &R, page: &RenderedPage) -> Vec<String> {
        if let Some(phone) = Self::reveal(renderer, page).await {
            return vec![phone];
        }
        Self::scan(&page.html)
    }

    /// Clicks the reveal control and reads the number it exposes
    async fn reveal<R: Renderer>(renderer: &R, page: &RenderedPage) -> Option<String> {
        match renderer.click(page, REVEAL_CONTROL).await {
            Ok(Some(revealed)) => Self::revealed_phone(&revealed),
            Ok(None) => None,
            Err(e) => {
                tracing::debug!("Phone reveal failed on {}: {}", page.url, e);
                None
            }
        }
    }

    /// Reads the revealed phone number, if the page shows one
    pub fn revealed_phone(page: &RenderedPage) -> Option<String> {
        let document = page.document();
        let phone = document
            .select(&REVEALED_PHONE_SELECTOR)
            .next()
            .and_then(element_text);
        phone
    }

    /// Scans raw page text for phone numbers
    pub fn scan(text: &str) -> Vec<String> {
        let matches = PHONE_PATTERNS
            .iter()
            .flat_map(|pattern| pattern.find_iter(text))
            .map(|m| sanitize(m.as_str()))
            .collect();
        dedupe(matches)
    }
}

/// Strips every whitespace character from a matched number
pub fn sanitize(raw: &str) -> String {
    raw.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Removes repeats while keeping the first occurrence of each value
pub fn dedupe(values: Vec<String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(values.len());
    for value in values {
        if !unique.contains(&value) {
            unique.push(value);
        }
    }
    unique
}
