//! The source printer.
//!
//! A prescan marks every symbol the program *declares*: function names,
//! parameters, `ВЕЛИЧИНА` targets, assignment targets. Declared names print
//! bare; any other literal prints double-quoted, which is exactly how the
//! lexer distinguishes them on the way back in.
//!
//! Expressions are parenthesized only when a child's precedence is strictly
//! below its context. Power prints as `POW(a, b)` and negation as
//! `НЕ (…)`, the only spellings of those operators the lexer accepts.

use std::fmt::Write;

use plabc_ast::{Arena, Delim, Keyword, NodeId, NodeKind, Op};
use plabc_util::{format_general, SymId, VarList};

use crate::error::{EmitError, Result};

const INDENT_STEP: usize = 4;

// precedence levels mirror the expression grammar
const PREC_NONE: i32 = 0;
const PREC_OR: i32 = 1;
const PREC_AND: i32 = 2;
const PREC_CMP: i32 = 3;
const PREC_ADD: i32 = 4;
const PREC_MUL: i32 = 5;
const PREC_POW: i32 = 6;
const PREC_ATOM: i32 = 7;

/// Prints the tree as a complete lab report.
///
/// # Example
///
/// ```
/// let loaded = plabc_ast::deserialize("( ; nil ( OUT ( 3 nil nil ) nil ) )").unwrap();
/// let text = plabc_rev::emit_source(&loaded.arena, &loaded.symbols, loaded.root).unwrap();
/// assert!(text.contains("ПОКАЗАТЬ 3"));
/// ```
pub fn emit_source(arena: &Arena, symbols: &VarList, root: NodeId) -> Result<String> {
    let mut declared = vec![false; symbols.len()];
    let root_node = arena.node(root);
    let (funcs, body) = if root_node.kind.is_operator(Op::Connector) {
        (root_node.left, root_node.right)
    } else {
        (None, Some(root))
    };

    mark_declared(arena, Some(root), &mut declared);
    mark_functions(arena, funcs, &mut declared);

    let printer = Printer {
        arena,
        symbols,
        declared,
    };
    let mut out = String::new();

    push(&mut out, "ЛАБОРАТОРНАЯ РАБОТА Восстановленная\n\n");
    push(
        &mut out,
        "АННОТАЦИЯ\nЦЕЛЬ: восстановлено из AST\nКОНЕЦ АННОТАЦИИ\n\n",
    );

    push(&mut out, "ТЕОРЕТИЧЕСКИЕ СВЕДЕНИЯ\n");
    printer.function_list(&mut out, funcs)?;
    push(&mut out, "\nКОНЕЦ ТЕОРИИ\n\n");

    // a body joint carries the experimental part left, results right
    let (experimental, results) = match body {
        Some(id) if printer.arena.node(id).kind.is_operator(Op::Connector) => {
            let node = printer.arena.node(id);
            (node.left, node.right)
        }
        other => (other, None),
    };

    push(&mut out, "ХОД РАБОТЫ\n");
    if let Some(ops) = experimental {
        printer.statement_list(&mut out, ops, 0)?;
    }
    push(&mut out, "\nКОНЕЦ РАБОТЫ\n\n");

    if let Some(ops) = results {
        push(&mut out, "ОБСУЖДЕНИЕ РЕЗУЛЬТАТОВ\n");
        printer.statement_list(&mut out, ops, 0)?;
        push(&mut out, "\nКОНЕЦ РЕЗУЛЬТАТОВ\n\n");
    }

    push(&mut out, "ВЫВОДЫ\nВосстановлено автоматически\nКОНЕЦ ВЫВОДОВ\n");
    Ok(out)
}

fn push(out: &mut String, text: &str) {
    out.push_str(text);
}

fn mark(declared: &mut [bool], sym: SymId) {
    if let Some(slot) = declared.get_mut(sym.index()) {
        *slot = true;
    }
}

/// Marks declaration and assignment targets over the whole tree, function
/// bodies included.
fn mark_declared(arena: &Arena, node: Option<NodeId>, declared: &mut [bool]) {
    let Some(id) = node else { return };
    let n = arena.node(id);
    match &n.kind {
        NodeKind::Keyword(Keyword::VarDeclaration) | NodeKind::Operator(Op::Assignment) => {
            if let Some(sym) = n.left.and_then(|l| arena.kind(l).sym()) {
                mark(declared, sym);
            }
        }
        _ => {}
    }
    mark_declared(arena, n.left, declared);
    mark_declared(arena, n.right, declared);
}

/// Marks function names and their parameter chains.
fn mark_functions(arena: &Arena, node: Option<NodeId>, declared: &mut [bool]) {
    let Some(id) = node else { return };
    let n = arena.node(id);
    if n.kind.is_delimiter(Delim::Comma) {
        mark_functions(arena, n.left, declared);
        mark_functions(arena, n.right, declared);
        return;
    }
    if let Some(sym) = n.kind.sym() {
        mark(declared, sym);
    }
    mark_param_chain(arena, n.left, declared);
}

fn mark_param_chain(arena: &Arena, node: Option<NodeId>, declared: &mut [bool]) {
    let Some(id) = node else { return };
    let n = arena.node(id);
    if n.kind.is_delimiter(Delim::Comma) {
        mark_param_chain(arena, n.left, declared);
        mark_param_chain(arena, n.right, declared);
        return;
    }
    if let Some(sym) = n.kind.sym() {
        mark(declared, sym);
    }
}

struct Printer<'a> {
    arena: &'a Arena,
    symbols: &'a VarList,
    declared: Vec<bool>,
}

impl<'a> Printer<'a> {
    fn node(&self, id: NodeId) -> &plabc_ast::Node {
        self.arena.node(id)
    }

    fn unsupported(&self, id: NodeId) -> EmitError {
        EmitError::UnsupportedNode(format!("{:?}", self.arena.kind(id)))
    }

    fn precedence(&self, id: NodeId) -> i32 {
        match self.arena.kind(id) {
            NodeKind::Keyword(Keyword::FuncCall) => PREC_ATOM,
            NodeKind::Operator(op) => match op {
                Op::Assignment => PREC_NONE,
                Op::Or => PREC_OR,
                Op::And => PREC_AND,
                _ if op.is_comparison() => PREC_CMP,
                Op::Add | Op::Sub => PREC_ADD,
                Op::Mul | Op::Div | Op::Mod => PREC_MUL,
                Op::Pow => PREC_POW,
                _ => PREC_ATOM,
            },
            _ => PREC_ATOM,
        }
    }

    /// Lowercase spelling the lexer folds back onto the operator.
    fn builtin_name(op: Op) -> Option<&'static str> {
        Some(match op {
            Op::Sin => "sin",
            Op::Cos => "cos",
            Op::Tan => "tg",
            Op::Ctg => "ctg",
            Op::Asin => "arcsin",
            Op::Acos => "arccos",
            Op::Atan => "arctan",
            Op::Actg => "arcctg",
            Op::Sqrt => "sqrt",
            Op::Ln => "ln",
            _ => return None,
        })
    }

    fn name(&self, out: &mut String, sym: SymId) {
        let text = self.symbols.get(sym).unwrap_or("");
        let bare = self.declared.get(sym.index()).copied().unwrap_or(false);
        if bare {
            push(out, text);
        } else {
            let _ = write!(out, "\"{text}\"");
        }
    }

    fn indent(&self, out: &mut String, depth: usize) {
        for _ in 0..depth {
            out.push(' ');
        }
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn expr(&self, out: &mut String, id: NodeId, parent_prec: i32) -> Result<()> {
        let my_prec = self.precedence(id);
        let need_paren = my_prec < parent_prec;
        if need_paren {
            out.push('(');
        }

        let node = self.node(id);
        match node.kind {
            NodeKind::Number(value) => push(out, &format_general(value, 6)),
            NodeKind::Literal(sym) | NodeKind::Identifier(sym) => self.name(out, sym),
            NodeKind::Keyword(Keyword::FuncCall) => self.call(out, id)?,
            NodeKind::Operator(op) => self.operator_expr(out, id, op, my_prec)?,
            _ => return Err(self.unsupported(id)),
        }

        if need_paren {
            out.push(')');
        }
        Ok(())
    }

    fn operator_expr(&self, out: &mut String, id: NodeId, op: Op, my_prec: i32) -> Result<()> {
        let node = self.node(id);
        match op {
            Op::Add | Op::Sub | Op::Mul | Op::Div | Op::Mod => {
                let sep = match op {
                    Op::Add => " + ",
                    Op::Sub => " - ",
                    Op::Mul => " * ",
                    Op::Div => " / ",
                    _ => " % ",
                };
                let l = node.left.ok_or_else(|| self.unsupported(id))?;
                let r = node.right.ok_or_else(|| self.unsupported(id))?;
                self.expr(out, l, my_prec)?;
                push(out, sep);
                self.expr(out, r, my_prec)?;
            }
            Op::Pow => {
                // POW(a, b) is the only spelling the lexer knows
                let l = node.left.ok_or_else(|| self.unsupported(id))?;
                let r = node.right.ok_or_else(|| self.unsupported(id))?;
                push(out, "POW(");
                self.expr(out, l, PREC_NONE)?;
                push(out, ", ");
                self.expr(out, r, PREC_NONE)?;
                push(out, ")");
            }
            _ if op.is_comparison() => {
                let sep = match op {
                    Op::Eq => " == ",
                    Op::Neq => " != ",
                    Op::Below => " < ",
                    Op::Above => " > ",
                    Op::BelowEq => " <= ",
                    _ => " >= ",
                };
                let l = node.left.ok_or_else(|| self.unsupported(id))?;
                let r = node.right.ok_or_else(|| self.unsupported(id))?;
                self.expr(out, l, my_prec)?;
                push(out, sep);
                self.expr(out, r, my_prec + 1)?;
            }
            Op::And | Op::Or => {
                let word = if op == Op::And { " И " } else { " ИЛИ " };
                let l = node.left.ok_or_else(|| self.unsupported(id))?;
                let r = node.right.ok_or_else(|| self.unsupported(id))?;
                self.expr(out, l, my_prec)?;
                push(out, word);
                self.expr(out, r, my_prec + 1)?;
            }
            Op::Not => {
                // parenthesized: the grammar only accepts НЕ with parens
                let inner = node
                    .left
                    .or(node.right)
                    .ok_or_else(|| self.unsupported(id))?;
                push(out, "НЕ (");
                self.expr(out, inner, PREC_NONE)?;
                push(out, ")");
            }
            Op::In | Op::Out => {
                let word = if op == Op::In {
                    "ИЗМЕРИТЬ "
                } else {
                    "ПОКАЗАТЬ "
                };
                let arg = node.left.ok_or_else(|| self.unsupported(id))?;
                push(out, word);
                self.expr(out, arg, PREC_ATOM)?;
            }
            Op::Assignment => {
                let l = node.left.ok_or_else(|| self.unsupported(id))?;
                let r = node.right.ok_or_else(|| self.unsupported(id))?;
                self.expr(out, l, PREC_NONE)?;
                push(out, " = ");
                self.expr(out, r, PREC_NONE)?;
            }
            _ => match Self::builtin_name(op) {
                Some(name) => {
                    let arg = node
                        .left
                        .or(node.right)
                        .ok_or_else(|| self.unsupported(id))?;
                    push(out, name);
                    out.push('(');
                    self.expr(out, arg, PREC_NONE)?;
                    out.push(')');
                }
                None => return Err(self.unsupported(id)),
            },
        }
        Ok(())
    }

    /// Flattens a left-leaning comma chain into its leaves, in order.
    fn flatten_chain(&self, node: Option<NodeId>, dst: &mut Vec<NodeId>) {
        let Some(id) = node else { return };
        let n = self.node(id);
        if n.kind.is_delimiter(Delim::Comma) {
            self.flatten_chain(n.left, dst);
            self.flatten_chain(n.right, dst);
            return;
        }
        dst.push(id);
    }

    /// `name ПРИМЕНЯЕМ a, b, …`
    fn call(&self, out: &mut String, id: NodeId) -> Result<()> {
        let node = self.node(id);
        let name = node
            .left
            .and_then(|l| self.arena.kind(l).sym())
            .ok_or_else(|| self.unsupported(id))?;
        self.name(out, name);
        push(out, " ПРИМЕНЯЕМ ");

        let mut args = Vec::new();
        self.flatten_chain(node.right, &mut args);
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                push(out, ", ");
            }
            self.expr(out, *arg, PREC_ATOM)?;
        }
        Ok(())
    }

    // =========================================================================
    // Statements
    // =========================================================================

    /// Flattens connector joints into newline-separated statements.
    fn statement_list(&self, out: &mut String, id: NodeId, depth: usize) -> Result<()> {
        let node = self.node(id);
        if node.kind.is_operator(Op::Connector) {
            if let Some(left) = node.left {
                self.statement_list(out, left, depth)?;
            }
            if node.right.is_some() {
                out.push('\n');
            }
            if let Some(right) = node.right {
                self.statement_list(out, right, depth)?;
            }
            return Ok(());
        }
        self.statement(out, id, depth)
    }

    fn statement(&self, out: &mut String, id: NodeId, depth: usize) -> Result<()> {
        let node = self.node(id);
        match node.kind {
            NodeKind::Keyword(Keyword::VarDeclaration) => {
                self.indent(out, depth);
                push(out, "ВЕЛИЧИНА ");
                let name = node
                    .left
                    .and_then(|l| self.arena.kind(l).sym())
                    .ok_or_else(|| self.unsupported(id))?;
                self.name(out, name);
                Ok(())
            }
            NodeKind::Keyword(Keyword::Return) => {
                self.indent(out, depth);
                push(out, "ВОЗВРАТИТЬ ");
                let value = node.left.ok_or_else(|| self.unsupported(id))?;
                self.expr(out, value, PREC_NONE)
            }
            NodeKind::Keyword(Keyword::If) => self.if_statement(out, id, depth),
            NodeKind::Keyword(Keyword::While) => self.while_statement(out, id, depth),
            NodeKind::Keyword(Keyword::DoWhile) => self.do_while_statement(out, id, depth),
            NodeKind::Keyword(Keyword::FuncCall) => {
                self.indent(out, depth);
                self.expr(out, id, PREC_NONE)
            }
            NodeKind::Operator(Op::Assignment) => {
                self.indent(out, depth);
                self.expr(out, id, PREC_NONE)
            }
            NodeKind::Operator(Op::In) | NodeKind::Operator(Op::Out) => {
                self.indent(out, depth);
                self.expr(out, id, PREC_NONE)
            }
            _ => Err(self.unsupported(id)),
        }
    }

    fn if_statement(&self, out: &mut String, id: NodeId, depth: usize) -> Result<()> {
        let node = self.node(id);
        let cond = node.left.ok_or_else(|| self.unsupported(id))?;
        let branches = node.right.ok_or_else(|| self.unsupported(id))?;
        let branch_node = self.node(branches);

        self.indent(out, depth);
        push(out, "ЕСЛИ ");
        self.expr(out, cond, PREC_NONE)?;
        push(out, " ТО\n");
        if let Some(then_ops) = branch_node.left {
            self.statement_list(out, then_ops, depth + INDENT_STEP)?;
        }
        if let Some(else_ops) = branch_node.right {
            out.push('\n');
            self.indent(out, depth);
            push(out, "ИНАЧЕ\n");
            self.statement_list(out, else_ops, depth + INDENT_STEP)?;
        }
        Ok(())
    }

    fn while_statement(&self, out: &mut String, id: NodeId, depth: usize) -> Result<()> {
        let node = self.node(id);
        let cond = node.left.ok_or_else(|| self.unsupported(id))?;

        self.indent(out, depth);
        push(out, "ПОКА ");
        self.expr(out, cond, PREC_NONE)?;
        push(out, " ПОВТОРЯЕМ\n");
        if let Some(body) = node.right {
            self.statement_list(out, body, depth + INDENT_STEP)?;
        }
        out.push('\n');
        self.indent(out, depth);
        push(out, "СТОП");
        Ok(())
    }

    fn do_while_statement(&self, out: &mut String, id: NodeId, depth: usize) -> Result<()> {
        let node = self.node(id);
        let cond = node.left.ok_or_else(|| self.unsupported(id))?;

        self.indent(out, depth);
        push(out, "ПОВТОРЯЕМ\n");
        if let Some(body) = node.right {
            self.statement_list(out, body, depth + INDENT_STEP)?;
            out.push('\n');
        }
        self.indent(out, depth);
        push(out, "ПОКА ");
        self.expr(out, cond, PREC_NONE)?;
        push(out, " СТОП");
        Ok(())
    }

    // =========================================================================
    // Functions
    // =========================================================================

    fn function_list(&self, out: &mut String, node: Option<NodeId>) -> Result<()> {
        let Some(id) = node else { return Ok(()) };
        let n = self.node(id);
        if n.kind.is_delimiter(Delim::Comma) {
            if let Some(left) = n.left {
                self.function_list(out, Some(left))?;
            }
            out.push('\n');
            if let Some(right) = n.right {
                self.function_list(out, Some(right))?;
            }
            return Ok(());
        }
        self.function(out, id)
    }

    fn function(&self, out: &mut String, id: NodeId) -> Result<()> {
        let node = self.node(id);
        let name = node.kind.sym().ok_or_else(|| self.unsupported(id))?;

        push(out, "ФОРМУЛА ");
        self.name(out, name);
        push(out, " (");
        self.params(out, node.left)?;
        push(out, ")\n");
        if let Some(body) = node.right {
            self.statement_list(out, body, INDENT_STEP)?;
        }
        push(out, "\nКОНЕЦ ФОРМУЛЫ");
        Ok(())
    }

    fn params(&self, out: &mut String, node: Option<NodeId>) -> Result<()> {
        let mut params = Vec::new();
        self.flatten_chain(node, &mut params);
        for (i, param) in params.iter().enumerate() {
            if i > 0 {
                push(out, ", ");
            }
            let sym = self
                .arena
                .kind(*param)
                .sym()
                .ok_or_else(|| self.unsupported(*param))?;
            self.name(out, sym);
        }
        Ok(())
    }
}
