//! plabc-par - Recursive-descent parser for the PhysLab language.
//!
//! The parser walks the token array of a [`CompileUnit`] and links the
//! tokens' arena nodes into a tree. Structural nodes the source never spells
//! out (the CONNECTOR joints between statements, comma separators of the
//! function list, the LITERAL clones of identifiers) are appended to the
//! same token array as *synthetic* tokens, so one allocation scheme owns
//! every node.
//!
//! Grammar outline (`*` via CONNECTOR, `+,` via COMA chains):
//!
//! ```text
//! program     = LAB literal? annotation theoretical experimental results conclusion
//! theoretical = THEORETICAL (literal | function_decl)* END_THEORETICAL
//! func_decl   = FORMULA IDENT '(' ident_list? ')' statement* END_FORMULA
//! statement   = var_decl | assignment | call | if | loop | io | return | expr
//! ```
//!
//! The finished tree is `CONNECTOR(function-list?, body?)`; statement lists
//! lean left, the newest statement on the right.

#[cfg(test)]
mod edge_cases;
mod error;
mod expr;
mod stmt;

pub use error::ParserError;

use plabc_ast::{CompileUnit, Delim, Keyword, NodeId, NodeKind, Op, Token};

type PResult<T> = Result<T, ParserError>;

/// Parses the unit's tokens and installs the tree root.
///
/// On failure the unit's `root` stays `None`; synthetic tokens appended
/// before the failure are torn down with the unit.
///
/// # Example
///
/// ```
/// let source = "ЛАБОРАТОРНАЯ РАБОТА\nАННОТАЦИЯ\nКОНЕЦ АННОТАЦИИ\n\
///               ТЕОРЕТИЧЕСКИЕ СВЕДЕНИЯ\nКОНЕЦ ТЕОРИИ\n\
///               ХОД РАБОТЫ\nВЕЛИЧИНА x = 1\nКОНЕЦ РАБОТЫ\n\
///               ОБСУЖДЕНИЕ РЕЗУЛЬТАТОВ\nКОНЕЦ РЕЗУЛЬТАТОВ\n\
///               ВЫВОДЫ\nКОНЕЦ ВЫВОДОВ\n";
/// let mut unit = plabc_lex::tokenize(None, source).unwrap();
/// plabc_par::parse(&mut unit).unwrap();
/// assert!(unit.root.is_some());
/// ```
pub fn parse(unit: &mut CompileUnit) -> Result<(), ParserError> {
    let root = {
        let mut parser = Parser {
            unit: &mut *unit,
            pos: 0,
        };
        parser.program()?
    };
    unit.arena.recount_elements(root);
    unit.arena.node_mut(root).parent = None;
    unit.root = Some(root);
    Ok(())
}

pub(crate) struct Parser<'u> {
    unit: &'u mut CompileUnit,
    pos: usize,
}

impl<'u> Parser<'u> {
    // =========================================================================
    // Token access
    // =========================================================================

    fn peek(&self) -> Option<Token> {
        self.unit.tokens.get(self.pos).copied()
    }

    pub(crate) fn peek_kind(&self) -> Option<NodeKind> {
        self.peek().map(|t| *self.unit.arena.kind(t.node))
    }

    pub(crate) fn peek_kind_at(&self, offset: usize) -> Option<NodeKind> {
        self.unit
            .tokens
            .get(self.pos + offset)
            .map(|t| *self.unit.arena.kind(t.node))
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.peek()?;
        self.pos += 1;
        Some(token)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.unit.tokens.len()
    }

    pub(crate) fn save(&self) -> usize {
        self.pos
    }

    pub(crate) fn restore(&mut self, pos: usize) {
        self.pos = pos;
    }

    /// Consumes the current token when it is the given keyword.
    pub(crate) fn match_keyword(&mut self, kw: Keyword) -> Option<NodeId> {
        match self.peek_kind() {
            Some(kind) if kind.is_keyword(kw) => self.advance().map(|t| t.node),
            _ => None,
        }
    }

    /// Consumes the current token when it is the given operator.
    pub(crate) fn match_operator(&mut self, op: Op) -> Option<NodeId> {
        match self.peek_kind() {
            Some(kind) if kind.is_operator(op) => self.advance().map(|t| t.node),
            _ => None,
        }
    }

    /// Consumes the current token when it is the given delimiter.
    pub(crate) fn match_delim(&mut self, delim: Delim) -> Option<NodeId> {
        match self.peek_kind() {
            Some(kind) if kind.is_delimiter(delim) => self.advance().map(|t| t.node),
            _ => None,
        }
    }

    /// Consumes the current token when it is an identifier.
    pub(crate) fn match_identifier(&mut self) -> Option<NodeId> {
        match self.peek_kind() {
            Some(NodeKind::Identifier(_)) => self.advance().map(|t| t.node),
            _ => None,
        }
    }

    // =========================================================================
    // Errors
    // =========================================================================

    /// Position for error reporting: the current token, or the last one.
    fn error_position(&self) -> (u32, u32) {
        let token = self
            .peek()
            .or_else(|| self.unit.tokens.last().copied());
        match token {
            Some(t) => (t.span.line, t.span.column),
            None => (0, 0),
        }
    }

    /// Human-readable rendering of the current token.
    fn describe_current(&self) -> String {
        let Some(kind) = self.peek_kind() else {
            return "end of input".to_owned();
        };
        match kind {
            NodeKind::Number(v) => format!("number {v}"),
            NodeKind::Identifier(sym) | NodeKind::Literal(sym) => {
                format!("'{}'", self.unit.symbols.get(sym).unwrap_or("?"))
            }
            NodeKind::Keyword(kw) => format!("keyword {}", kw.name()),
            NodeKind::Operator(op) => format!("operator {}", op.name()),
            NodeKind::Delimiter(d) => format!("delimiter {}", d.name()),
        }
    }

    pub(crate) fn unexpected(&self) -> ParserError {
        let (line, column) = self.error_position();
        ParserError::Unexpected {
            line,
            column,
            found: self.describe_current(),
        }
    }

    pub(crate) fn missing(&self, expected: &'static str) -> ParserError {
        let (line, column) = self.error_position();
        ParserError::MissingKeyword {
            expected,
            line,
            column,
        }
    }

    pub(crate) fn expect_keyword(&mut self, kw: Keyword, spelled: &'static str) -> PResult<NodeId> {
        self.match_keyword(kw).ok_or_else(|| self.missing(spelled))
    }

    fn expect_delim(&mut self, delim: Delim, spelled: &'static str) -> PResult<NodeId> {
        self.match_delim(delim).ok_or_else(|| self.missing(spelled))
    }

    // =========================================================================
    // Synthetic nodes
    // =========================================================================

    /// A CONNECTOR joint over two statement subtrees.
    pub(crate) fn connector(&mut self, left: Option<NodeId>, right: Option<NodeId>) -> NodeId {
        let id = self.unit.synthetic(NodeKind::Operator(Op::Connector));
        self.unit.arena.set_children(id, left, right);
        id
    }

    /// A synthetic comma joint (used for the function list).
    fn comma(&mut self, left: NodeId, right: NodeId) -> NodeId {
        let id = self.unit.synthetic(NodeKind::Delimiter(Delim::Comma));
        self.unit.arena.set_children(id, Some(left), Some(right));
        id
    }

    /// Clones an identifier token's node as a LITERAL carrying the same
    /// symbol index. Name references in the finished tree are always
    /// literals; the identifier token stays behind as source evidence.
    pub(crate) fn clone_identifier_literal(&mut self, ident: NodeId) -> NodeId {
        let sym = self
            .unit
            .arena
            .kind(ident)
            .sym()
            .unwrap_or(plabc_util::SymId(0));
        self.unit.synthetic(NodeKind::Literal(sym))
    }

    pub(crate) fn set_children(
        &mut self,
        parent: NodeId,
        left: Option<NodeId>,
        right: Option<NodeId>,
    ) {
        self.unit.arena.set_children(parent, left, right);
    }

    // =========================================================================
    // Report structure
    // =========================================================================

    /// `program = report`
    fn program(&mut self) -> PResult<NodeId> {
        self.report()
    }

    /// The five framing sections around the function list and the body.
    fn report(&mut self) -> PResult<NodeId> {
        self.expect_keyword(Keyword::Lab, "ЛАБОРАТОРНАЯ РАБОТА")?;

        // the title literal is optional
        if matches!(self.peek_kind(), Some(NodeKind::Literal(_))) {
            self.advance();
        }

        self.annotation()?;
        let funcs = self.theoretical()?;
        let experimental = self.experimental()?;
        let results = self.results()?;
        self.conclusion()?;

        let body = match (experimental, results) {
            (Some(exp), Some(res)) => Some(self.connector(Some(exp), Some(res))),
            (exp, res) => exp.or(res),
        };

        if funcs.is_none() && body.is_none() {
            return Err(self.unexpected());
        }
        Ok(self.connector(funcs, body))
    }

    /// `annotation = ANNOTATION <anything>* END_ANNOTATION`; the contents
    /// are prose and are discarded wholesale.
    fn annotation(&mut self) -> PResult<()> {
        self.expect_keyword(Keyword::Annotation, "АННОТАЦИЯ")?;
        while !self.at_end() {
            if self.match_keyword(Keyword::EndAnnotation).is_some() {
                return Ok(());
            }
            self.advance();
        }
        Err(self.missing("КОНЕЦ АННОТАЦИИ"))
    }

    /// `theoretical = THEORETICAL (literal | function_decl)* END_THEORETICAL`
    ///
    /// Returns the comma-chained function list; stray literals between
    /// declarations are narrative text and are skipped.
    fn theoretical(&mut self) -> PResult<Option<NodeId>> {
        self.expect_keyword(Keyword::Theoretical, "ТЕОРЕТИЧЕСКИЕ СВЕДЕНИЯ")?;
        let mut funcs: Option<NodeId> = None;
        while !self.at_end() {
            if self.match_keyword(Keyword::EndTheoretical).is_some() {
                return Ok(funcs);
            }
            if matches!(self.peek_kind(), Some(NodeKind::Literal(_))) {
                self.advance();
                continue;
            }
            let decl = self.function_declaration()?;
            funcs = Some(match funcs {
                Some(list) => self.comma(list, decl),
                None => decl,
            });
        }
        Err(self.missing("КОНЕЦ ТЕОРИИ"))
    }

    /// `function_decl = FORMULA IDENT '(' ident_list? ')' statement* END_FORMULA`
    ///
    /// The declaration's root is a LITERAL holding the function name, with
    /// the parameter chain on the left and the body on the right.
    fn function_declaration(&mut self) -> PResult<NodeId> {
        self.expect_keyword(Keyword::Formula, "ФОРМУЛА")?;
        let name = self.match_identifier().ok_or_else(|| self.unexpected())?;
        let name_lit = self.clone_identifier_literal(name);

        self.expect_delim(Delim::ParOpen, "(")?;
        let params = self.identifier_list()?;
        self.expect_delim(Delim::ParClose, ")")?;

        let body = self.statements(Keyword::EndFormula)?;
        self.expect_keyword(Keyword::EndFormula, "КОНЕЦ ФОРМУЛЫ")?;

        self.set_children(name_lit, params, body);
        Ok(name_lit)
    }

    /// `ident_list = IDENT (',' IDENT)*`, cloned to literals and chained
    /// over the source comma tokens.
    fn identifier_list(&mut self) -> PResult<Option<NodeId>> {
        let Some(first) = self.match_identifier() else {
            return Ok(None);
        };
        let mut current = self.clone_identifier_literal(first);
        while let Some(comma) = self.match_delim(Delim::Comma) {
            let next = self.match_identifier().ok_or_else(|| self.unexpected())?;
            let lit = self.clone_identifier_literal(next);
            self.set_children(comma, Some(current), Some(lit));
            current = comma;
        }
        Ok(Some(current))
    }

    /// `experimental = EXPERIMENTAL statement* END_EXPERIMENTAL`
    fn experimental(&mut self) -> PResult<Option<NodeId>> {
        self.expect_keyword(Keyword::Experimental, "ХОД РАБОТЫ")?;
        let ops = self.statements(Keyword::EndExperimental)?;
        self.expect_keyword(Keyword::EndExperimental, "КОНЕЦ РАБОТЫ")?;
        Ok(ops)
    }

    /// `results = RESULTS statement* END_RESULTS`
    fn results(&mut self) -> PResult<Option<NodeId>> {
        self.expect_keyword(Keyword::Results, "ОБСУЖДЕНИЕ РЕЗУЛЬТАТОВ")?;
        let ops = self.statements(Keyword::EndResults)?;
        self.expect_keyword(Keyword::EndResults, "КОНЕЦ РЕЗУЛЬТАТОВ")?;
        Ok(ops)
    }

    /// `conclusion = CONCLUSION literal? END_CONCLUSION`
    fn conclusion(&mut self) -> PResult<()> {
        self.expect_keyword(Keyword::Conclusion, "ВЫВОДЫ")?;
        if matches!(self.peek_kind(), Some(NodeKind::Literal(_))) {
            self.advance();
        }
        self.expect_keyword(Keyword::EndConclusion, "КОНЕЦ ВЫВОДОВ")?;
        Ok(())
    }
}
