//! Statement parsing.
//!
//! A statement list is built left-associatively: each new statement hangs on
//! the right of a fresh CONNECTOR whose left side is everything parsed so
//! far. The list stops at the section's closing keyword, or at any other
//! section closer, so a missing `СТОП`/`КОНЕЦ …` surfaces as an error in the
//! enclosing production rather than swallowing the next section.

use plabc_ast::{Keyword, NodeId, NodeKind, Op};

use crate::{PResult, Parser};

impl<'u> Parser<'u> {
    /// `statement*`, stopping at `stop` or any section closer. Returns
    /// `None` for an empty list.
    pub(crate) fn statements(&mut self, stop: Keyword) -> PResult<Option<NodeId>> {
        let mut first: Option<NodeId> = None;
        while let Some(kind) = self.peek_kind() {
            if kind.stops_statements(stop) || !kind.starts_statement() {
                break;
            }
            let stmt = self.statement()?;
            first = Some(match first {
                Some(list) => self.connector(Some(list), Some(stmt)),
                None => stmt,
            });
        }
        Ok(first)
    }

    /// Dispatches on the first token of a statement.
    fn statement(&mut self) -> PResult<NodeId> {
        let Some(kind) = self.peek_kind() else {
            return Err(self.unexpected());
        };
        match kind {
            NodeKind::Keyword(Keyword::VarDeclaration) => self.variable_declaration(),
            NodeKind::Keyword(Keyword::If) => self.conditional(),
            NodeKind::Keyword(Keyword::While) | NodeKind::Keyword(Keyword::WhileCondition) => {
                self.loop_statement()
            }
            NodeKind::Keyword(Keyword::Return) => self.return_statement(),
            NodeKind::Keyword(Keyword::FuncCall) => {
                // a call marker with no callee name in front of it
                self.function_call()?.ok_or_else(|| self.unexpected())
            }
            NodeKind::Operator(Op::In) | NodeKind::Operator(Op::Out) => self.io_statement(),
            NodeKind::Identifier(_) => {
                // one-token lookahead: `id =` is an assignment statement,
                // anything else must be a call
                if matches!(self.peek_kind_at(1), Some(k) if k.is_operator(Op::Assignment)) {
                    let assign = self.try_assignment()?;
                    assign.ok_or_else(|| self.unexpected())
                } else {
                    self.function_call()?.ok_or_else(|| self.unexpected())
                }
            }
            _ => Err(self.unexpected()),
        }
    }

    /// `ВЕЛИЧИНА id` or `ВЕЛИЧИНА id = expr`.
    ///
    /// With an initializer this becomes `CONNECTOR(decl, assignment)`, each
    /// side holding its own literal clone of the name.
    fn variable_declaration(&mut self) -> PResult<NodeId> {
        let kw = self.expect_keyword(Keyword::VarDeclaration, "ВЕЛИЧИНА")?;
        let ident = self.match_identifier().ok_or_else(|| self.unexpected())?;
        let decl_name = self.clone_identifier_literal(ident);
        self.set_children(kw, Some(decl_name), None);

        let Some(eq) = self.match_operator(Op::Assignment) else {
            return Ok(kw);
        };
        let rhs = self.expression_required()?;
        let assign_name = self.clone_identifier_literal(ident);
        self.set_children(eq, Some(assign_name), Some(rhs));
        Ok(self.connector(Some(kw), Some(eq)))
    }

    /// `id = expr`, also usable in expression position. Soft-fails (with
    /// the cursor restored) when the `=` is absent.
    pub(crate) fn try_assignment(&mut self) -> PResult<Option<NodeId>> {
        let save = self.save();
        let Some(ident) = self.match_identifier() else {
            return Ok(None);
        };
        let Some(eq) = self.match_operator(Op::Assignment) else {
            self.restore(save);
            return Ok(None);
        };
        let lhs = self.clone_identifier_literal(ident);
        let rhs = self.expression_required()?;
        self.set_children(eq, Some(lhs), Some(rhs));
        Ok(Some(eq))
    }

    /// `ЕСЛИ expr ТО statement* (ИНАЧЕ statement*)?`
    ///
    /// The IF token keeps the condition on its left; its right child is the
    /// THEN token whose children are the two branches.
    fn conditional(&mut self) -> PResult<NodeId> {
        let if_tok = self.expect_keyword(Keyword::If, "ЕСЛИ")?;
        let cond = self.expression_required()?;
        let then_tok = self.expect_keyword(Keyword::Then, "ТО")?;

        let then_ops = self.statements(Keyword::Else)?;
        let else_ops = if self.match_keyword(Keyword::Else).is_some() {
            self.statements(Keyword::Else)?
        } else {
            None
        };

        self.set_children(then_tok, then_ops, else_ops);
        self.set_children(if_tok, Some(cond), Some(then_tok));
        Ok(if_tok)
    }

    /// Pre-test `ПОКА expr ПОВТОРЯЕМ body СТОП` keeps the WHILE token;
    /// post-test `ПОВТОРЯЕМ body ПОКА expr СТОП` retains the ПОКА token but
    /// rewrites its keyword to DO-WHILE. Either way: condition left,
    /// body right.
    fn loop_statement(&mut self) -> PResult<NodeId> {
        if self.match_keyword(Keyword::WhileCondition).is_some() {
            let cond = self.expression_required()?;
            let while_tok = self.expect_keyword(Keyword::While, "ПОВТОРЯЕМ")?;
            let body = self.statements(Keyword::EndWhile)?;
            self.expect_keyword(Keyword::EndWhile, "СТОП")?;
            self.set_children(while_tok, Some(cond), body);
            return Ok(while_tok);
        }

        self.expect_keyword(Keyword::While, "ПОВТОРЯЕМ")?;
        let body = self.statements(Keyword::WhileCondition)?;
        let cond_tok = self.expect_keyword(Keyword::WhileCondition, "ПОКА")?;
        let cond = self.expression_required()?;
        self.expect_keyword(Keyword::EndWhile, "СТОП")?;

        self.unit.arena.node_mut(cond_tok).kind = NodeKind::Keyword(Keyword::DoWhile);
        self.set_children(cond_tok, Some(cond), body);
        Ok(cond_tok)
    }

    /// `ПОКАЗАТЬ expr` / `ВЫВЕСТИ expr` / `ИЗМЕРИТЬ id`. The token already
    /// carries the IN/OUT operator; only the operand remains to parse.
    fn io_statement(&mut self) -> PResult<NodeId> {
        let Some(kind) = self.peek_kind() else {
            return Err(self.unexpected());
        };
        let is_input = kind.is_operator(Op::In);
        let tok = self
            .match_operator(if is_input { Op::In } else { Op::Out })
            .ok_or_else(|| self.unexpected())?;

        let arg = if is_input {
            let ident = self.match_identifier().ok_or_else(|| self.unexpected())?;
            self.clone_identifier_literal(ident)
        } else {
            self.expression_required()?
        };
        self.set_children(tok, Some(arg), None);
        Ok(tok)
    }

    /// `ВОЗВРАТИТЬ expr`
    fn return_statement(&mut self) -> PResult<NodeId> {
        let kw = self.expect_keyword(Keyword::Return, "ВОЗВРАТИТЬ")?;
        let expr = self.expression_required()?;
        self.set_children(kw, Some(expr), None);
        Ok(kw)
    }
}
