//! Position of the orchestrator in the traversal

use std::fmt;

/// Represents where the crawl currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlState {
    /// About to list the keywords of a letter
    AtAlphabet(char),

    /// About to resolve the keyword with this 1-based ordinal
    AtKeyword(char, usize),

    /// About to crawl one page of a keyword
    AtPage(char, usize, usize),

    /// Traversal finished
    Done,
}

impl CrawlState {
    /// Returns true once the traversal has finished
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }
}

impl fmt::Display for CrawlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AtAlphabet(letter) => write!(f, "alphabet {}", letter),
            Self::AtKeyword(letter, ordinal) => write!(f, "alphabet {} keyword {}", letter, ordinal),
            Self::AtPage(letter, ordinal, page) => {
                write!(f, "alphabet {} keyword {} page {}", letter, ordinal, page)
            }
            Self::Done => write!(f, "done"),
        }
    }
}
