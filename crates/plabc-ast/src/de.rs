//! Tree deserialization - loading the prefix S-expression form.
//!
//! The loader tokenizes on whitespace and parentheses, treating `"…"` as a
//! single lexeme, then parses the node grammar recursively. Literal heads
//! re-intern their quoted text into a fresh symbol table, so indices may be
//! renumbered relative to the file; identifier heads keep the on-disk index
//! verbatim (compiler-produced trees contain none).

use plabc_util::{SymId, VarList};

use crate::error::{AstError, Result};
use crate::kind::{Delim, Keyword, NodeKind, Op};
use crate::node::{Arena, NodeId};

/// A tree reloaded from its serialized form, with its freshly built symbols.
#[derive(Debug)]
pub struct LoadedAst {
    pub arena: Arena,
    pub symbols: VarList,
    pub root: NodeId,
}

/// Parses the serialized tree text.
///
/// Fails with [`AstError::Malformed`] on any grammar mismatch; nothing of
/// the partially built tree survives an error.
///
/// # Example
///
/// ```
/// let loaded = plabc_ast::deserialize("( + ( 1 nil nil ) ( 2 nil nil ) )").unwrap();
/// assert_eq!(loaded.arena.node(loaded.root).elements, 2);
/// ```
pub fn deserialize(text: &str) -> Result<LoadedAst> {
    let lexemes = scan(text)?;
    let mut loader = Loader {
        lexemes,
        pos: 0,
        arena: Arena::new(),
        symbols: VarList::new(),
    };

    let root = loader
        .node()?
        .ok_or_else(|| AstError::Malformed("tree is nil".to_owned()))?;
    if loader.pos != loader.lexemes.len() {
        return Err(AstError::Malformed(format!(
            "trailing data after the tree ({} lexemes left)",
            loader.lexemes.len() - loader.pos
        )));
    }

    Ok(LoadedAst {
        arena: loader.arena,
        symbols: loader.symbols,
        root,
    })
}

#[derive(Debug, PartialEq)]
enum Lexeme {
    Open,
    Close,
    Word(String),
    Quoted(String),
}

/// Splits the text into parentheses, quoted strings and bare words.
fn scan(text: &str) -> Result<Vec<Lexeme>> {
    let mut lexemes = Vec::new();
    let mut chars = text.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        match c {
            '(' => lexemes.push(Lexeme::Open),
            ')' => lexemes.push(Lexeme::Close),
            '"' => {
                let mut content = String::new();
                loop {
                    match chars.next() {
                        Some((_, '"')) => break,
                        Some((_, ch)) => content.push(ch),
                        None => {
                            return Err(AstError::Malformed(format!(
                                "unterminated string at byte {start}"
                            )))
                        }
                    }
                }
                lexemes.push(Lexeme::Quoted(content));
            }
            c if c.is_whitespace() => {}
            _ => {
                let mut word = String::new();
                word.push(c);
                while let Some(&(_, ch)) = chars.peek() {
                    if ch.is_whitespace() || ch == '(' || ch == ')' || ch == '"' {
                        break;
                    }
                    word.push(ch);
                    chars.next();
                }
                lexemes.push(Lexeme::Word(word));
            }
        }
    }
    Ok(lexemes)
}

struct Loader {
    lexemes: Vec<Lexeme>,
    pos: usize,
    arena: Arena,
    symbols: VarList,
}

impl Loader {
    fn next(&mut self) -> Option<&Lexeme> {
        let lexeme = self.lexemes.get(self.pos);
        if lexeme.is_some() {
            self.pos += 1;
        }
        lexeme
    }

    fn next_word(&mut self, what: &str) -> Result<String> {
        match self.next() {
            Some(Lexeme::Word(w)) => Ok(w.clone()),
            other => Err(AstError::Malformed(format!(
                "expected {what}, found {other:?}"
            ))),
        }
    }

    /// `node := 'nil' | '(' head left right ')'`
    fn node(&mut self) -> Result<Option<NodeId>> {
        match self.next() {
            Some(Lexeme::Word(w)) if w == "nil" => Ok(None),
            Some(Lexeme::Open) => {
                let kind = self.head()?;
                let left = self.node()?;
                let right = self.node()?;
                match self.next() {
                    Some(Lexeme::Close) => {}
                    other => {
                        return Err(AstError::Malformed(format!(
                            "expected ')', found {other:?}"
                        )))
                    }
                }
                Ok(Some(self.arena.new_node(kind, left, right)))
            }
            other => Err(AstError::Malformed(format!(
                "expected a node, found {other:?}"
            ))),
        }
    }

    /// One of: number, `LITERAL <idx> "<text>"`, `IDENTIFIER <idx>`, or a
    /// keyword / operator / delimiter spelling.
    fn head(&mut self) -> Result<NodeKind> {
        let word = self.next_word("a node head")?;

        if word == "LITERAL" {
            let idx_word = self.next_word("a literal index")?;
            idx_word.parse::<usize>().map_err(|_| {
                AstError::Malformed(format!("bad literal index {idx_word:?}"))
            })?;
            let text = match self.next() {
                Some(Lexeme::Quoted(s)) => s.clone(),
                other => {
                    return Err(AstError::Malformed(format!(
                        "expected a quoted literal, found {other:?}"
                    )))
                }
            };
            // interning reassigns the id; the one on disk is informational
            let sym = self.symbols.add(&text);
            return Ok(NodeKind::Literal(sym));
        }

        if word == "IDENTIFIER" {
            let idx_word = self.next_word("an identifier index")?;
            let idx = idx_word.parse::<u32>().map_err(|_| {
                AstError::Malformed(format!("bad identifier index {idx_word:?}"))
            })?;
            return Ok(NodeKind::Identifier(SymId(idx)));
        }

        if let Some(kw) = Keyword::from_name(&word) {
            return Ok(NodeKind::Keyword(kw));
        }
        if let Some(op) = Op::from_name(&word) {
            return Ok(NodeKind::Operator(op));
        }
        if let Some(delim) = Delim::from_name(&word) {
            return Ok(NodeKind::Delimiter(delim));
        }
        if word.starts_with(|c: char| c.is_ascii_digit() || c == '-' || c == '.') {
            if let Ok(value) = word.parse::<f64>() {
                return Ok(NodeKind::Number(value));
            }
        }

        Err(AstError::Malformed(format!("unknown head {word:?}")))
    }
}
