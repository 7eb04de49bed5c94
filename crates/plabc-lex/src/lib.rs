//! plabc-lex - Lexical analysis for the PhysLab language.
//!
//! The tokenizer makes a single forward pass over a UTF-8 buffer and fills a
//! [`plabc_ast::CompileUnit`]: one arena node per token, identifier and
//! string-literal text interned into the unit's symbol table.
//!
//! The language's keywords are Russian words and multi-word phrases
//! (`ЛАБОРАТОРНАЯ РАБОТА`, `КОНЕЦ РЕЗУЛЬТАТОВ`), so keyword recognition is
//! table-driven: a priority-ordered list of fixed spellings, longest first,
//! each with optional ASCII casefolding and word-boundary rejection. See
//! [`table::FIXED_TOKENS`].

pub mod cursor;
#[cfg(test)]
mod edge_cases;
mod error;
mod lexer;
pub mod table;

pub use cursor::Cursor;
pub use error::LexerError;
pub use lexer::{tokenize, tokenize_bytes};
