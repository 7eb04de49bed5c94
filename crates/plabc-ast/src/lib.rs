//! plabc-ast - Syntax tree core for the PhysLab compiler.
//!
//! The AST is a binary tree stored in an arena ([`Arena`]): children and the
//! parent back-pointer are index handles ([`NodeId`]), so ownership stays a
//! plain `Vec` while navigation can still walk upward. Each node carries a
//! [`NodeKind`] discriminant with exactly the data its variant needs.
//!
//! The same tree shape serves three consumers: the parser builds it, the
//! serializer persists it as a prefix S-expression (`.ast` files), and the
//! backend and reverse emitter reload and walk it.

mod de;
mod error;
mod kind;
mod node;
mod ser;
mod unit;

pub use de::{deserialize, LoadedAst};
pub use error::AstError;
pub use kind::{Delim, Keyword, NodeKind, Op};
pub use node::{Arena, Node, NodeId, SIGNATURE};
pub use ser::serialize;
pub use unit::{CompileUnit, Token};
