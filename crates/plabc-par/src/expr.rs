//! Expression parsing.
//!
//! Classic precedence ladder, loosest first: logical (AND/OR on one level,
//! left to right), comparison (non-associative, at most one per expression),
//! additive, multiplicative, power, factor. `^` is right-associative.
//! Assignment is tried before the ladder, so `x = e` works in expression
//! position as well as in statement position.
//!
//! Each level soft-fails with `Ok(None)` when its first token cannot start
//! an operand, and hard-fails once an operator has committed it to finding
//! a right-hand side.

use plabc_ast::{Delim, Keyword, NodeId, NodeKind, Op};

use crate::{PResult, Parser};

impl<'u> Parser<'u> {
    /// An expression where the grammar demands one.
    pub(crate) fn expression_required(&mut self) -> PResult<NodeId> {
        self.expression()?.ok_or_else(|| self.unexpected())
    }

    /// `expression = assignment | logical`
    pub(crate) fn expression(&mut self) -> PResult<Option<NodeId>> {
        if let Some(assign) = self.try_assignment()? {
            return Ok(Some(assign));
        }
        self.logical()
    }

    /// `logical = comparison ((AND|OR) comparison)*`
    fn logical(&mut self) -> PResult<Option<NodeId>> {
        let Some(mut lhs) = self.comparison()? else {
            return Ok(None);
        };
        loop {
            let tok = match self.peek_kind() {
                Some(k) if k.is_operator(Op::And) => self.match_operator(Op::And),
                Some(k) if k.is_operator(Op::Or) => self.match_operator(Op::Or),
                _ => None,
            };
            let Some(op_tok) = tok else {
                return Ok(Some(lhs));
            };
            let rhs = self.comparison()?.ok_or_else(|| self.unexpected())?;
            self.set_children(op_tok, Some(lhs), Some(rhs));
            lhs = op_tok;
        }
    }

    /// `comparison = additive (relop additive)?`
    fn comparison(&mut self) -> PResult<Option<NodeId>> {
        let Some(lhs) = self.additive()? else {
            return Ok(None);
        };
        let is_relop = matches!(
            self.peek_kind(),
            Some(NodeKind::Operator(op)) if op.is_comparison()
        );
        if !is_relop {
            return Ok(Some(lhs));
        }
        let op_tok = self.advance_operator_token();
        let rhs = self.additive()?.ok_or_else(|| self.unexpected())?;
        self.set_children(op_tok, Some(lhs), Some(rhs));
        Ok(Some(op_tok))
    }

    /// `additive = term (('+'|'-') term)*`
    fn additive(&mut self) -> PResult<Option<NodeId>> {
        let Some(mut lhs) = self.term()? else {
            return Ok(None);
        };
        loop {
            let tok = match self.peek_kind() {
                Some(k) if k.is_operator(Op::Add) => self.match_operator(Op::Add),
                Some(k) if k.is_operator(Op::Sub) => self.match_operator(Op::Sub),
                _ => None,
            };
            let Some(op_tok) = tok else {
                return Ok(Some(lhs));
            };
            let rhs = self.term()?.ok_or_else(|| self.unexpected())?;
            self.set_children(op_tok, Some(lhs), Some(rhs));
            lhs = op_tok;
        }
    }

    /// `term = power (('*'|'/'|'%') power)*`
    fn term(&mut self) -> PResult<Option<NodeId>> {
        let Some(mut lhs) = self.power()? else {
            return Ok(None);
        };
        loop {
            let tok = match self.peek_kind() {
                Some(k) if k.is_operator(Op::Mul) => self.match_operator(Op::Mul),
                Some(k) if k.is_operator(Op::Div) => self.match_operator(Op::Div),
                Some(k) if k.is_operator(Op::Mod) => self.match_operator(Op::Mod),
                _ => None,
            };
            let Some(op_tok) = tok else {
                return Ok(Some(lhs));
            };
            let rhs = self.power()?.ok_or_else(|| self.unexpected())?;
            self.set_children(op_tok, Some(lhs), Some(rhs));
            lhs = op_tok;
        }
    }

    /// `power = factor ('^' power)?`, right-associative.
    fn power(&mut self) -> PResult<Option<NodeId>> {
        let Some(base) = self.factor()? else {
            return Ok(None);
        };
        let Some(op_tok) = self.match_operator(Op::Pow) else {
            return Ok(Some(base));
        };
        let exp = self.power()?.ok_or_else(|| self.unexpected())?;
        self.set_children(op_tok, Some(base), Some(exp));
        Ok(Some(op_tok))
    }

    /// `factor = builtin_call | function_call | '(' expr ')' | NUMBER
    ///          | LITERAL | IDENT | '"' LITERAL '"'`
    fn factor(&mut self) -> PResult<Option<NodeId>> {
        if let Some(builtin) = self.builtin_call()? {
            return Ok(Some(builtin));
        }
        if let Some(call) = self.function_call()? {
            return Ok(Some(call));
        }

        if self.match_delim(Delim::ParOpen).is_some() {
            let expr = self.expression_required()?;
            if self.match_delim(Delim::ParClose).is_none() {
                return Err(self.missing(")"));
            }
            return Ok(Some(expr));
        }

        match self.peek_kind() {
            Some(NodeKind::Number(_)) | Some(NodeKind::Literal(_)) => {
                Ok(self.advance_node())
            }
            Some(NodeKind::Identifier(_)) => {
                let ident = self.advance_node().ok_or_else(|| self.unexpected())?;
                Ok(Some(self.clone_identifier_literal(ident)))
            }
            Some(k) if k.is_delimiter(Delim::Quote) => {
                self.advance_node();
                let Some(NodeKind::Literal(_)) = self.peek_kind() else {
                    return Err(self.unexpected());
                };
                let lit = self.advance_node();
                self.match_delim(Delim::Quote);
                Ok(lit)
            }
            _ => Ok(None),
        }
    }

    /// Built-in numeric functions in call syntax: `sin(e)`, `POW(a, b)` and
    /// the rest. The operator token becomes the node; arguments hang off its
    /// children.
    fn builtin_call(&mut self) -> PResult<Option<NodeId>> {
        let op = match self.peek_kind() {
            Some(NodeKind::Operator(op))
                if op.is_unary_builtin() || op.is_binary_builtin() =>
            {
                op
            }
            _ => return Ok(None),
        };
        let tok = self.advance_operator_token();
        if self.match_delim(Delim::ParOpen).is_none() {
            return Err(self.missing("("));
        }

        if op.is_unary_builtin() {
            let arg = self.expression_required()?;
            if self.match_delim(Delim::ParClose).is_none() {
                return Err(self.missing(")"));
            }
            self.set_children(tok, Some(arg), None);
            return Ok(Some(tok));
        }

        let lhs = self.expression_required()?;
        if self.match_delim(Delim::Comma).is_none() {
            return Err(self.missing(","));
        }
        let rhs = self.expression_required()?;
        if self.match_delim(Delim::ParClose).is_none() {
            return Err(self.missing(")"));
        }
        self.set_children(tok, Some(lhs), Some(rhs));
        Ok(Some(tok))
    }

    /// User function invocation in any of its three spellings:
    /// `name(args)`, `name ПРИМЕНЯЕМ args`, bare `name args`.
    ///
    /// Soft-fails with the cursor restored when no argument list can be
    /// parsed, which is what lets a lone identifier fall through to the
    /// plain-reference branch of [`Parser::factor`].
    pub(crate) fn function_call(&mut self) -> PResult<Option<NodeId>> {
        let save = self.save();
        let Some(ident) = self.match_identifier() else {
            return Ok(None);
        };

        let call_kw = self.match_keyword(Keyword::FuncCall);
        let has_parens = self.match_delim(Delim::ParOpen).is_some();

        let Some(args) = self.arguments()? else {
            self.restore(save);
            return Ok(None);
        };
        if has_parens && self.match_delim(Delim::ParClose).is_none() {
            return Err(self.missing(")"));
        }

        let name_lit = self.clone_identifier_literal(ident);
        let root = match call_kw {
            Some(tok) => tok,
            None => self.unit.synthetic(NodeKind::Keyword(Keyword::FuncCall)),
        };
        self.set_children(root, Some(name_lit), Some(args));
        Ok(Some(root))
    }

    /// `arguments = expression (',' expression)*`, chained over the source
    /// comma tokens.
    fn arguments(&mut self) -> PResult<Option<NodeId>> {
        let Some(first) = self.expression()? else {
            return Ok(None);
        };
        let mut current = first;
        while let Some(comma) = self.match_delim(Delim::Comma) {
            let next = self.expression_required()?;
            self.set_children(comma, Some(current), Some(next));
            current = comma;
        }
        Ok(Some(current))
    }

    /// Consumes the current token unconditionally, returning its node.
    fn advance_node(&mut self) -> Option<NodeId> {
        let token = self.unit.tokens.get(self.pos).copied()?;
        self.pos += 1;
        Some(token.node)
    }

    /// Consumes the current token, which the caller has already checked to
    /// be an operator.
    fn advance_operator_token(&mut self) -> NodeId {
        let token = self.unit.tokens[self.pos];
        self.pos += 1;
        token.node
    }
}
