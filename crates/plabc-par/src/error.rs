//! Parser error type.

use thiserror::Error;

/// First-failure parse error; the partially built tree does not survive.
#[derive(Debug, Error)]
pub enum ParserError {
    /// A token that no production could accept.
    #[error("unexpected {found} at {line}:{column}")]
    Unexpected {
        line: u32,
        column: u32,
        found: String,
    },

    /// A required keyword or delimiter was absent.
    #[error("expected {expected} at {line}:{column}")]
    MissingKeyword {
        expected: &'static str,
        line: u32,
        column: u32,
    },
}
