//! plabc-util - Shared utilities for the PhysLab compiler.
//!
//! This crate provides the pieces every phase needs: the interned symbol
//! table ([`VarList`]), source location tracking ([`Span`]), and the
//! C-style floating point formatting used by the AST dump and the backend.

pub mod fmt_num;
pub mod span;
pub mod varlist;

pub use fmt_num::format_general;
pub use span::Span;
pub use varlist::{SymId, VarList};
