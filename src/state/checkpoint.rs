use serde::{Deserialize, Serialize};
use std::fmt;

/// Traversal cursor persisted between runs
///
/// Always names the next unit of work that has not been completed yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    #[serde(rename = "last_keyword_alphabet")]
    pub alphabet: char,

    /// 1-based keyword ordinal within `alphabet`
    #[serde(rename = "last_keyword_index")]
    pub keyword: usize,

    /// 1-based page number within the keyword
    #[serde(rename = "last_keyword_page_no")]
    pub page: usize,
}

impl Default for Checkpoint {
    fn default() -> Self {
        Self {
            alphabet: 'A',
            keyword: 1,
            page: 1,
        }
    }
}

impl Checkpoint {
    pub fn new(alphabet: char, keyword: usize, page: usize) -> Self {
        Self {
            alphabet,
            keyword,
            page,
        }
    }

    /// Checks the cursor is well formed
    pub fn validate(&self) -> Result<(), String> {
        if !self.alphabet.is_ascii_uppercase() {
            return Err(format!(
                "alphabet cursor must be an uppercase letter A-Z, got '{}'",
                self.alphabet
            ));
        }
        if self.keyword < 1 {
            return Err("keyword cursor must be >= 1".to_string());
        }
        if self.page < 1 {
            return Err("page cursor must be >= 1".to_string());
        }
        Ok(())
    }

    /// Cursor after one more page of the current keyword
    pub fn with_next_page(self) -> Self {
        Self {
            page: self.page + 1,
            ..self
        }
    }

    /// Cursor at the first page of the following keyword
    pub fn with_next_keyword(self) -> Self {
        Self {
            keyword: self.keyword + 1,
            page: 1,
            ..self
        }
    }

    /// Cursor at the first keyword of the following letter
    ///
    /// The letter `Z` has no successor, so the cursor is left unchanged.
    pub fn with_next_alphabet(self) -> Self {
        match next_letter(self.alphabet) {
            Some(alphabet) => Self::new(alphabet, 1, 1),
            None => self,
        }
    }
}

impl fmt::Display for Checkpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "alphabet {}, keyword {}, page {}",
            self.alphabet, self.keyword, self.page
        )
    }
}

/// Following uppercase letter, `None` after `Z`
pub fn next_letter(letter: char) -> Option<char> {
    match letter {
        'A'..='Y' => char::from_u32(letter as u32 + 1),
        _ => None,
    }
}

/// Preceding uppercase letter, `None` before `A`
pub fn previous_letter(letter: char) -> Option<char> {
    match letter {
        'B'..='Z' => char::from_u32(letter as u32 - 1),
        _ => None,
    }
}
