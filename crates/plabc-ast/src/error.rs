//! Error type for tree persistence.

use thiserror::Error;

/// Failure while loading a serialized tree.
#[derive(Debug, Error)]
pub enum AstError {
    /// The on-disk form did not match the tree grammar.
    #[error("malformed tree: {0}")]
    Malformed(String),
}

pub type Result<T> = std::result::Result<T, AstError>;
