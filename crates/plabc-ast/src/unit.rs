//! Per-compilation state: source, token array, arena and symbols.
//!
//! The token array doubles as the node store for the whole frontend: the
//! lexer appends one arena node per surface token, and the parser later
//! appends *synthetic* tokens (no source span) for the nodes it fabricates,
//! CONNECTOR joints, comma separators and cloned identifiers. Everything is
//! freed together when the unit drops.

use plabc_util::{Span, VarList};

use crate::kind::NodeKind;
use crate::node::{Arena, NodeId};

/// One token: an arena node plus where it came from.
#[derive(Clone, Copy, Debug)]
pub struct Token {
    /// The node allocated for this token.
    pub node: NodeId,
    /// Source location; [`Span::DUMMY`] for synthetic tokens.
    pub span: Span,
}

impl Token {
    /// True for parser-fabricated tokens with no surface text.
    #[inline]
    pub fn is_synthetic(&self) -> bool {
        self.span.is_dummy()
    }
}

/// Owner of everything produced while compiling one source buffer.
#[derive(Debug, Default)]
pub struct CompileUnit {
    /// Source file name, when known.
    pub name: Option<String>,
    /// The source text.
    pub source: String,
    /// Node storage shared by tokens and the tree.
    pub arena: Arena,
    /// Interned identifier and literal strings.
    pub symbols: VarList,
    /// Tokens in source order, synthetic appends at the tail.
    pub tokens: Vec<Token>,
    /// Root of the parsed tree, set by the parser.
    pub root: Option<NodeId>,
}

impl CompileUnit {
    pub fn new(name: Option<&str>, source: &str) -> Self {
        Self {
            name: name.map(str::to_owned),
            source: source.to_owned(),
            // initial capacity follows the token array's growth policy
            tokens: Vec::with_capacity(32),
            ..Self::default()
        }
    }

    /// Appends a surface token, allocating its node.
    pub fn add_token(&mut self, kind: NodeKind, span: Span) -> NodeId {
        let node = self.arena.alloc(kind);
        self.tokens.push(Token { node, span });
        node
    }

    /// Appends a synthetic token for a fabricated node.
    pub fn synthetic(&mut self, kind: NodeKind) -> NodeId {
        self.add_token(kind, Span::DUMMY)
    }

    /// Number of tokens, synthetic ones included.
    #[inline]
    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }
}
