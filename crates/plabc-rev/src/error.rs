//! Reverse emitter error type.

use thiserror::Error;

/// Failure while printing a tree as source text.
#[derive(Debug, Error)]
pub enum EmitError {
    /// A node shape the surface syntax cannot express.
    #[error("cannot print node as source: {0}")]
    UnsupportedNode(String),
}

pub type Result<T> = std::result::Result<T, EmitError>;
