//! Backend error type.

use thiserror::Error;

/// Failure during assembly emission.
#[derive(Debug, Error)]
pub enum BackendError {
    /// A function mentioned more distinct names than there are registers.
    #[error("function '{func}' needs {required} bindings; only 8 registers exist")]
    TooManyLocals { func: String, required: usize },

    /// A name was read in expression position before anything bound it.
    /// String literals in arithmetic land here too: they never get a
    /// register.
    #[error("unknown name '{name}' in expression")]
    UnknownName { name: String },

    /// An operator with no VM opcode was used as an expression.
    #[error("operator {op} is not supported in expressions")]
    UnsupportedOp { op: String },

    /// An intrinsic call with the wrong argument shape.
    #[error("bad arguments for builtin {builtin}: {detail}")]
    BadBuiltinArgs {
        builtin: &'static str,
        detail: String,
    },
}

pub type Result<T> = std::result::Result<T, BackendError>;
