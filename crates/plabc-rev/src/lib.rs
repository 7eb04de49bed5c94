//! plabc-rev - Surface-syntax reconstruction from a loaded tree.
//!
//! Walks a tree the way the backend does, but prints the section-delimited
//! report form back out: a fixed header and annotation, every function as a
//! `ФОРМУЛА … КОНЕЦ ФОРМУЛЫ` block, the main statements under `ХОД РАБОТЫ`,
//! and a fixed conclusion. Feeding the output back through the frontend
//! yields a structurally identical tree (up to symbol renumbering).

mod emitter;
mod error;

pub use emitter::emit_source;
pub use error::EmitError;
