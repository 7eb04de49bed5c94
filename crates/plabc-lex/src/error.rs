//! Lexer error type.

use thiserror::Error;

/// Failure during tokenization. The unit under construction is discarded.
#[derive(Debug, Error)]
pub enum LexerError {
    /// A string literal ran into a newline or the end of the buffer.
    #[error("unterminated string literal at {line}:{column}")]
    UnterminatedString { line: u32, column: u32 },

    /// The input is not valid UTF-8.
    #[error("source is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),
}
