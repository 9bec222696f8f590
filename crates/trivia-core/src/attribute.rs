//! The `key:value` mini-language used by `!trivia add` and `!trivia modify`.
//!
//! A value starts right after the first case-insensitive `<name>:` and runs
//! to the last separator before the next colon, or to the end of the input
//! when no colon follows (or no separator precedes it). There is no
//! escaping: a colon or separator inside a value cuts it short or swallows
//! the following attributes. Chat users have learned to live with this, so
//! the behaviour is kept as is.

use thiserror::Error;

/// Attribute lookup failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttributeError {
    /// The `<name>:` key does not occur in the input.
    #[error("attribute '{0}' not found")]
    NotFound(String),
}

/// Extracts attribute values from a command string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeParser {
    separators: Vec<char>,
}

impl Default for AttributeParser {
    fn default() -> Self {
        Self {
            separators: vec![','],
        }
    }
}

impl AttributeParser {
    /// Create a parser that ends values at any of `separators`.
    ///
    /// An empty separator list falls back to a comma.
    pub fn new(separators: impl IntoIterator<Item = char>) -> Self {
        let separators: Vec<char> = separators.into_iter().collect();
        if separators.is_empty() {
            Self::default()
        } else {
            Self { separators }
        }
    }

    /// The characters that terminate a value.
    pub fn separators(&self) -> &[char] {
        &self.separators
    }

    /// Find the value of attribute `name` in `input`.
    ///
    /// The returned slice is trimmed and may be empty (`"points:, ..."`).
    pub fn find<'a>(&self, input: &'a str, name: &str) -> Result<&'a str, AttributeError> {
        let key = format!("{}:", name.to_ascii_lowercase());
        // ASCII lowercasing keeps byte offsets aligned with `input`.
        let lower = input.to_ascii_lowercase();
        let start = lower
            .find(&key)
            .map(|i| i + key.len())
            .ok_or_else(|| AttributeError::NotFound(name.to_string()))?;

        let rest = &input[start..];
        let Some(colon) = rest.find(':') else {
            return Ok(rest.trim());
        };

        let head = &rest[..colon];
        match head.rfind(|c| self.separators.contains(&c)) {
            Some(end) => Ok(self.trim(&head[..end])),
            None => Ok(rest.trim()),
        }
    }

    /// Whether `input` mentions attribute `name` at all.
    pub fn contains(&self, input: &str, name: &str) -> bool {
        self.find(input, name).is_ok()
    }

    fn trim<'a>(&self, value: &'a str) -> &'a str {
        value
            .trim()
            .trim_matches(|c| self.separators.contains(&c))
            .trim()
    }
}
