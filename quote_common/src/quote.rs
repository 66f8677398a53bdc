//! Quote data model and category filter.
//!
//! A `Quote` is a plain `{text, category}` record without an identifier. Two quotes
//! are the same quote when both fields are equal, which is exactly what the derived
//! `PartialEq`/`Hash` give us.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::QuoteError;

/// Sentinel filter value meaning "every category".
pub const ALL_CATEGORIES: &str = "all";

/// A single quote with its free-form category label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Quote {
    /// The quote body.
    pub text: String,
    /// Free-form label used for filtering.
    pub category: String,
}

impl Quote {
    /// Build a quote from user input, trimming both fields.
    ///
    /// Returns `QuoteError::Validation` if either field is empty after trimming.
    pub fn new(text: &str, category: &str) -> Result<Self, QuoteError> {
        let text = text.trim();
        let category = category.trim();
        if text.is_empty() || category.is_empty() {
            return Err(QuoteError::Validation(
                "both quote text and category must be filled in".to_string(),
            ));
        }
        Ok(Quote {
            text: text.to_string(),
            category: category.to_string(),
        })
    }

    fn seed(text: &str, category: &str) -> Self {
        Quote {
            text: text.to_string(),
            category: category.to_string(),
        }
    }

    /// Built-in collection used when nothing usable has been persisted yet.
    pub fn defaults() -> Vec<Quote> {
        vec![
            Quote::seed("The important thing is not to stop questioning.", "Science"),
            Quote::seed("First, solve the problem. Then, write the code.", "Programming"),
            Quote::seed(
                "Education is the most powerful weapon you can use to change the world.",
                "Inspiration",
            ),
            Quote::seed("An investment in knowledge pays the best interest.", "Wisdom"),
        ]
    }

    /// Collection held by the mock authoritative server: the defaults plus one
    /// quote the local side does not know yet.
    pub fn server_defaults() -> Vec<Quote> {
        let mut quotes = Quote::defaults();
        quotes.push(Quote::seed(
            "Life is what happens when you're busy making other plans.",
            "Life",
        ));
        quotes
    }

    /// Encode the quote as a compact JSON string.
    pub fn to_json_string(&self) -> Result<String, QuoteError> {
        Ok(serde_json::to_string(self)?)
    }
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" — {}", self.text, self.category)
    }
}

/// Category selection used when listing or picking quotes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    /// No filtering.
    #[default]
    All,
    /// Only quotes whose category equals the given label.
    Category(String),
}

impl CategoryFilter {
    /// Whether `quote` passes this filter.
    pub fn matches(&self, quote: &Quote) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Category(category) => quote.category == *category,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed == ALL_CATEGORIES {
            Ok(CategoryFilter::All)
        } else {
            Ok(CategoryFilter::Category(trimmed.to_string()))
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str(ALL_CATEGORIES),
            CategoryFilter::Category(category) => f.write_str(category),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_trims_fields() {
        let quote = Quote::new("  Stay hungry.  ", "\tLife ").unwrap();
        assert_eq!(quote.text, "Stay hungry.");
        assert_eq!(quote.category, "Life");
    }

    #[test]
    fn new_rejects_whitespace_only_text() {
        let result = Quote::new("  ", "Life");
        assert!(matches!(result, Err(QuoteError::Validation(_))));
    }

    #[test]
    fn new_rejects_empty_category() {
        let result = Quote::new("Stay hungry.", "");
        assert!(matches!(result, Err(QuoteError::Validation(_))));
    }

    #[test]
    fn defaults_have_four_quotes_and_server_adds_one() {
        let defaults = Quote::defaults();
        let server = Quote::server_defaults();
        assert_eq!(defaults.len(), 4);
        assert_eq!(server.len(), 5);
        assert_eq!(&server[..4], &defaults[..]);
        assert_eq!(server[4].category, "Life");
    }

    #[test]
    fn serializes_as_plain_object() {
        let quote = Quote::new("A", "X").unwrap();
        assert_eq!(quote.to_json_string().unwrap(), r#"{"text":"A","category":"X"}"#);
    }

    #[test]
    fn filter_parses_sentinel_and_labels() {
        assert_eq!("all".parse::<CategoryFilter>().unwrap(), CategoryFilter::All);
        assert_eq!("".parse::<CategoryFilter>().unwrap(), CategoryFilter::All);
        assert_eq!(
            "Wisdom".parse::<CategoryFilter>().unwrap(),
            CategoryFilter::Category("Wisdom".to_string())
        );
        assert_eq!(CategoryFilter::All.to_string(), "all");
    }

    #[test]
    fn filter_matches_exact_category() {
        let quote = Quote::new("A", "Wisdom").unwrap();
        assert!(CategoryFilter::All.matches(&quote));
        assert!(CategoryFilter::Category("Wisdom".to_string()).matches(&quote));
        assert!(!CategoryFilter::Category("wisdom".to_string()).matches(&quote));
    }
}
