//! Assembly emission.
//!
//! Statements compile against a per-function [`Frame`]; conditionals use
//! the two-target form (`true` label, `false` label) so AND/OR/NOT can
//! short-circuit by wiring targets instead of materializing booleans.
//! Label counters live on the [`Codegen`] context and run for the whole
//! compilation unit, which keeps every label unique in the output file.

use plabc_ast::{Arena, Keyword, NodeId, NodeKind, Op};
use plabc_util::{format_general, SymId, VarList};

use crate::error::{BackendError, Result};
use crate::regs::Frame;

/// Emits the whole program: main body, `HLT`, then the functions in source
/// order.
///
/// # Example
///
/// ```
/// let loaded = plabc_ast::deserialize("( ; nil ( OUT ( 3 nil nil ) nil ) )").unwrap();
/// let asm = plabc_gen::emit_program(&loaded.arena, &loaded.symbols, loaded.root).unwrap();
/// assert_eq!(asm, "PUSH 3\nOUT\nHLT\n");
/// ```
pub fn emit_program(arena: &Arena, symbols: &VarList, root: NodeId) -> Result<String> {
    let mut cg = Codegen {
        arena,
        symbols,
        out: String::new(),
        if_counter: 0,
        while_counter: 0,
        do_counter: 0,
        tmp_counter: 0,
    };

    let root_node = cg.arena.node(root);
    let (funcs, body) = if root_node.kind.is_operator(Op::Connector) {
        (root_node.left, root_node.right)
    } else {
        (None, Some(root))
    };

    let mut main_frame = Frame::main();
    if let Some(body) = body {
        let mut did_ret = false;
        cg.statement(&mut main_frame, body, &mut did_ret)?;
    }
    cg.line("HLT");

    if let Some(funcs) = funcs {
        cg.function_list(funcs)?;
    }
    Ok(cg.out)
}

/// The intrinsics the VM implements directly; anything else is `CALL`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Intrinsic {
    Draw,
    SetPixel,
}

impl Intrinsic {
    fn from_name(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("draw") {
            Some(Intrinsic::Draw)
        } else if name.eq_ignore_ascii_case("set_pixel") {
            Some(Intrinsic::SetPixel)
        } else {
            None
        }
    }
}

struct Codegen<'a> {
    arena: &'a Arena,
    symbols: &'a VarList,
    out: String,
    if_counter: usize,
    while_counter: usize,
    do_counter: usize,
    tmp_counter: usize,
}

impl<'a> Codegen<'a> {
    fn line(&mut self, text: &str) {
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn label(prefix: &str, id: usize, suffix: &str) -> String {
        format!(":{prefix}{id}{suffix}")
    }

    fn kind(&self, id: NodeId) -> &NodeKind {
        self.arena.kind(id)
    }

    fn children(&self, id: NodeId) -> (Option<NodeId>, Option<NodeId>) {
        let node = self.arena.node(id);
        (node.left, node.right)
    }

    /// Symbol carried by a name node (literal or identifier).
    fn name_sym(&self, id: NodeId) -> Option<SymId> {
        self.kind(id).sym()
    }

    fn name_text(&self, sym: SymId) -> &str {
        self.symbols.get(sym).unwrap_or("?")
    }

    fn unsupported(&self, id: NodeId) -> BackendError {
        let op = match self.kind(id) {
            NodeKind::Operator(op) => op.name().to_owned(),
            other => format!("{other:?}"),
        };
        BackendError::UnsupportedOp { op }
    }

    // =========================================================================
    // Statements
    // =========================================================================

    /// Emits one statement subtree. `did_ret` reports whether emission
    /// ended in a `RET`, so the function epilogue is not duplicated.
    fn statement(&mut self, frame: &mut Frame, id: NodeId, did_ret: &mut bool) -> Result<()> {
        *did_ret = false;
        let (left, right) = self.children(id);

        match *self.kind(id) {
            NodeKind::Operator(Op::Connector) => {
                let (mut l, mut r) = (false, false);
                if let Some(left) = left {
                    self.statement(frame, left, &mut l)?;
                }
                if let Some(right) = right {
                    self.statement(frame, right, &mut r)?;
                }
                *did_ret = l || r;
                Ok(())
            }
            NodeKind::Operator(Op::Assignment) => self.assignment(frame, id, false),
            NodeKind::Keyword(Keyword::VarDeclaration) => {
                let name = left
                    .and_then(|l| self.name_sym(l))
                    .ok_or_else(|| self.unsupported(id))?;
                frame.ensure(name)?;
                Ok(())
            }
            NodeKind::Keyword(Keyword::Return) => {
                let value = left.ok_or_else(|| self.unsupported(id))?;
                self.expression(frame, value)?;
                self.line("RET");
                *did_ret = true;
                Ok(())
            }
            NodeKind::Operator(Op::Out) => {
                let value = left.ok_or_else(|| self.unsupported(id))?;
                self.expression(frame, value)?;
                self.line("OUT");
                Ok(())
            }
            NodeKind::Operator(Op::In) => {
                let name = left
                    .and_then(|l| self.name_sym(l))
                    .ok_or_else(|| self.unsupported(id))?;
                let reg = frame.ensure(name)?;
                self.line("IN");
                self.line(&format!("POPR {reg}"));
                Ok(())
            }
            NodeKind::Keyword(Keyword::FuncCall) => self.call(frame, id),
            NodeKind::Keyword(Keyword::If) => self.if_statement(frame, id, did_ret),
            NodeKind::Keyword(Keyword::While) => self.while_statement(frame, id, did_ret),
            NodeKind::Keyword(Keyword::DoWhile) => self.do_while_statement(frame, id, did_ret),
            _ => self.expression(frame, id),
        }
    }

    fn if_statement(&mut self, frame: &mut Frame, id: NodeId, did_ret: &mut bool) -> Result<()> {
        let (cond, branches) = self.children(id);
        let cond = cond.ok_or_else(|| self.unsupported(id))?;
        let (then_ops, else_ops) = match branches {
            Some(b) => self.children(b),
            None => (None, None),
        };

        self.if_counter += 1;
        let n = self.if_counter;
        let then_lbl = Self::label("if_", n, "_then");
        let else_lbl = Self::label("if_", n, "");
        let end_lbl = Self::label("if_", n, "_end");

        let false_target = if else_ops.is_some() {
            else_lbl.clone()
        } else {
            end_lbl.clone()
        };
        self.conditional(frame, cond, &then_lbl, &false_target)?;

        self.line(&then_lbl);
        if let Some(then_ops) = then_ops {
            self.statement(frame, then_ops, did_ret)?;
        }
        if else_ops.is_some() {
            self.line(&format!("JMP {end_lbl}"));
        }

        self.line(&false_target);
        if let Some(else_ops) = else_ops {
            self.statement(frame, else_ops, did_ret)?;
            self.line(&end_lbl);
        }
        Ok(())
    }

    fn while_statement(&mut self, frame: &mut Frame, id: NodeId, did_ret: &mut bool) -> Result<()> {
        let (cond, body) = self.children(id);
        let cond = cond.ok_or_else(|| self.unsupported(id))?;

        self.while_counter += 1;
        let n = self.while_counter;
        let start_lbl = Self::label("while_", n, "");
        let body_lbl = Self::label("while_", n, "_body");
        let end_lbl = Self::label("while_", n, "_end");

        self.line(&start_lbl);
        self.conditional(frame, cond, &body_lbl, &end_lbl)?;
        self.line(&body_lbl);
        if let Some(body) = body {
            self.statement(frame, body, did_ret)?;
        }
        self.line(&format!("JMP {start_lbl}"));
        self.line(&end_lbl);
        Ok(())
    }

    fn do_while_statement(
        &mut self,
        frame: &mut Frame,
        id: NodeId,
        did_ret: &mut bool,
    ) -> Result<()> {
        let (cond, body) = self.children(id);
        let cond = cond.ok_or_else(|| self.unsupported(id))?;

        self.do_counter += 1;
        let n = self.do_counter;
        let body_lbl = Self::label("do-while_", n, "");
        let end_lbl = Self::label("do-while_", n, "_end");

        self.line(&body_lbl);
        if let Some(body) = body {
            self.statement(frame, body, did_ret)?;
        }
        self.conditional(frame, cond, &body_lbl, &end_lbl)?;
        self.line(&end_lbl);
        Ok(())
    }

    /// `lhs = rhs`; as an expression the value is pushed back afterwards.
    fn assignment(&mut self, frame: &mut Frame, id: NodeId, keep: bool) -> Result<()> {
        let (lhs, rhs) = self.children(id);
        let name = lhs
            .and_then(|l| self.name_sym(l))
            .ok_or_else(|| self.unsupported(id))?;
        let rhs = rhs.ok_or_else(|| self.unsupported(id))?;
        let reg = frame.ensure(name)?;
        self.expression(frame, rhs)?;
        self.line(&format!("POPR {reg}"));
        if keep {
            self.line(&format!("PUSHR {reg}"));
        }
        Ok(())
    }

    // =========================================================================
    // Calls
    // =========================================================================

    /// Flattens a comma chain into argument order.
    fn collect_args(&self, node: Option<NodeId>, dst: &mut Vec<NodeId>) {
        let Some(id) = node else { return };
        if self.kind(id).is_delimiter(plabc_ast::Delim::Comma) {
            let (l, r) = self.children(id);
            self.collect_args(l, dst);
            self.collect_args(r, dst);
            return;
        }
        dst.push(id);
    }

    /// Intrinsics compile inline; user calls push arguments in reverse so
    /// the callee pops them in declared order.
    fn call(&mut self, frame: &mut Frame, id: NodeId) -> Result<()> {
        let (name_node, args_node) = self.children(id);
        let name = name_node
            .and_then(|n| self.name_sym(n))
            .ok_or_else(|| self.unsupported(id))?;
        let name_text = self.name_text(name).to_owned();

        let mut args = Vec::new();
        self.collect_args(args_node, &mut args);

        match Intrinsic::from_name(&name_text) {
            Some(Intrinsic::Draw) => {
                let &[delay] = args.as_slice() else {
                    return Err(BackendError::BadBuiltinArgs {
                        builtin: "DRAW",
                        detail: format!("expected 1 argument, got {}", args.len()),
                    });
                };
                let NodeKind::Number(value) = *self.kind(delay) else {
                    return Err(BackendError::BadBuiltinArgs {
                        builtin: "DRAW",
                        detail: "delay must be a numeric literal".to_owned(),
                    });
                };
                self.line(&format!("DRAW {value:.0}"));
                Ok(())
            }
            Some(Intrinsic::SetPixel) => {
                let &[value, index] = args.as_slice() else {
                    return Err(BackendError::BadBuiltinArgs {
                        builtin: "SET_PIXEL",
                        detail: format!("expected (value, index), got {} arguments", args.len()),
                    });
                };
                let tmp = frame.temp().ok_or_else(|| frame.overflow())?;
                self.expression(frame, index)?;
                self.line(&format!("POPR {tmp}"));
                self.expression(frame, value)?;
                self.line(&format!("POPM [{tmp}]"));
                Ok(())
            }
            None => {
                for arg in args.into_iter().rev() {
                    self.expression(frame, arg)?;
                }
                self.line(&format!("CALL :{name_text}"));
                Ok(())
            }
        }
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    /// Emits code leaving exactly one value on the VM stack.
    fn expression(&mut self, frame: &mut Frame, id: NodeId) -> Result<()> {
        let (left, right) = self.children(id);
        match *self.kind(id) {
            NodeKind::Number(value) => {
                self.line(&format!("PUSH {}", format_general(value, 15)));
                Ok(())
            }
            NodeKind::Literal(sym) | NodeKind::Identifier(sym) => {
                // string literals never get a register and fail here too
                let reg = frame.lookup(sym).ok_or_else(|| BackendError::UnknownName {
                    name: self.name_text(sym).to_owned(),
                })?;
                self.line(&format!("PUSHR {reg}"));
                Ok(())
            }
            NodeKind::Operator(op) => match op {
                Op::Add | Op::Sub | Op::Mul | Op::Div | Op::Mod => {
                    let l = left.ok_or_else(|| self.unsupported(id))?;
                    let r = right.ok_or_else(|| self.unsupported(id))?;
                    self.expression(frame, l)?;
                    self.expression(frame, r)?;
                    self.line(match op {
                        Op::Add => "ADD",
                        Op::Sub => "SUB",
                        Op::Mul => "MUL",
                        Op::Div => "DIV",
                        _ => "MOD",
                    });
                    Ok(())
                }
                Op::Sqrt | Op::Sin | Op::Cos => {
                    let arg = left.ok_or_else(|| self.unsupported(id))?;
                    self.expression(frame, arg)?;
                    self.line(match op {
                        Op::Sqrt => "SQRT",
                        Op::Sin => "SIN",
                        _ => "COS",
                    });
                    Ok(())
                }
                Op::Assignment => self.assignment(frame, id, true),
                Op::Eq | Op::Neq | Op::Below | Op::Above | Op::BelowEq | Op::AboveEq
                | Op::And | Op::Or | Op::Not => self.comparison_value(frame, id),
                Op::Connector => {
                    // malformed trees only, but harmless to evaluate
                    if let Some(l) = left {
                        self.expression(frame, l)?;
                    }
                    if let Some(r) = right {
                        self.expression(frame, r)?;
                    }
                    Ok(())
                }
                _ => Err(self.unsupported(id)),
            },
            NodeKind::Keyword(Keyword::FuncCall) => self.call(frame, id),
            _ => Err(self.unsupported(id)),
        }
    }

    /// A comparison or logical operator in value position: run the
    /// conditional form, then materialize 0/1 at the two targets.
    fn comparison_value(&mut self, frame: &mut Frame, id: NodeId) -> Result<()> {
        self.tmp_counter += 1;
        let n = self.tmp_counter;
        let true_lbl = Self::label("cmp_true_", n, "");
        let false_lbl = Self::label("cmp_false_", n, "");
        let end_lbl = Self::label("cmp_end_", n, "");

        self.conditional(frame, id, &true_lbl, &false_lbl)?;
        self.line(&false_lbl);
        self.line("PUSH 0");
        self.line(&format!("JMP {end_lbl}"));
        self.line(&true_lbl);
        self.line("PUSH 1");
        self.line(&end_lbl);
        Ok(())
    }

    /// Two-target conditional: control reaches `true_lbl` when the
    /// expression is truthy, `false_lbl` otherwise.
    fn conditional(
        &mut self,
        frame: &mut Frame,
        id: NodeId,
        true_lbl: &str,
        false_lbl: &str,
    ) -> Result<()> {
        let (left, right) = self.children(id);

        if let NodeKind::Operator(op) = *self.kind(id) {
            match op {
                Op::And => {
                    self.tmp_counter += 1;
                    let mid = Self::label("if_and_", self.tmp_counter, "");
                    let l = left.ok_or_else(|| self.unsupported(id))?;
                    let r = right.ok_or_else(|| self.unsupported(id))?;
                    self.conditional(frame, l, &mid, false_lbl)?;
                    self.line(&mid);
                    return self.conditional(frame, r, true_lbl, false_lbl);
                }
                Op::Or => {
                    self.tmp_counter += 1;
                    let mid = Self::label("if_or_", self.tmp_counter, "");
                    let l = left.ok_or_else(|| self.unsupported(id))?;
                    let r = right.ok_or_else(|| self.unsupported(id))?;
                    self.conditional(frame, l, true_lbl, &mid)?;
                    self.line(&mid);
                    return self.conditional(frame, r, true_lbl, false_lbl);
                }
                Op::Not => {
                    let inner = left.or(right).ok_or_else(|| self.unsupported(id))?;
                    return self.conditional(frame, inner, false_lbl, true_lbl);
                }
                _ if op.is_comparison() => {
                    let l = left.ok_or_else(|| self.unsupported(id))?;
                    let r = right.ok_or_else(|| self.unsupported(id))?;
                    self.expression(frame, l)?;
                    self.expression(frame, r)?;
                    let jump = match op {
                        Op::Eq => "JE",
                        Op::Neq => "JNE",
                        Op::Below => "JB",
                        Op::Above => "JA",
                        Op::BelowEq => "JBE",
                        _ => "JAE",
                    };
                    self.line(&format!("{jump} {true_lbl}"));
                    self.line(&format!("JMP {false_lbl}"));
                    return Ok(());
                }
                _ => {}
            }
        }

        // any other expression: non-zero is truthy
        self.expression(frame, id)?;
        self.line("PUSH 0");
        self.line(&format!("JNE {true_lbl}"));
        self.line(&format!("JMP {false_lbl}"));
        Ok(())
    }

    // =========================================================================
    // Functions
    // =========================================================================

    fn function_list(&mut self, id: NodeId) -> Result<()> {
        if self.kind(id).is_delimiter(plabc_ast::Delim::Comma) {
            let (l, r) = self.children(id);
            if let Some(l) = l {
                self.function_list(l)?;
            }
            if let Some(r) = r {
                self.function_list(r)?;
            }
            return Ok(());
        }
        self.function(id)
    }

    /// Prologue (`:name`, one `POPR` per parameter in declared order), the
    /// body, and a `RET` unless the body already ended with one.
    fn function(&mut self, id: NodeId) -> Result<()> {
        let name = self.name_sym(id).ok_or_else(|| self.unsupported(id))?;
        let name_text = self.name_text(name).to_owned();
        let (params, body) = self.children(id);

        let mut frame = Frame::function(&name_text);
        let mut param_regs = Vec::new();
        self.collect_params(&mut frame, params, &mut param_regs)?;

        self.line(&format!(":{name_text}"));
        for reg in &param_regs {
            self.line(&format!("POPR {reg}"));
        }

        let mut body_ret = false;
        if let Some(body) = body {
            self.statement(&mut frame, body, &mut body_ret)?;
        }
        if !body_ret {
            self.line("RET");
        }
        Ok(())
    }

    /// Binds every parameter in declaration order, remembering its register.
    fn collect_params(
        &mut self,
        frame: &mut Frame,
        node: Option<NodeId>,
        regs: &mut Vec<&'static str>,
    ) -> Result<()> {
        let Some(id) = node else { return Ok(()) };
        if self.kind(id).is_delimiter(plabc_ast::Delim::Comma) {
            let (l, r) = self.children(id);
            self.collect_params(frame, l, regs)?;
            self.collect_params(frame, r, regs)?;
            return Ok(());
        }
        let sym = self.name_sym(id).ok_or_else(|| self.unsupported(id))?;
        let reg = frame.ensure(sym)?;
        regs.push(reg);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plabc_ast::deserialize;

    fn emit(tree: &str) -> Result<String> {
        let loaded = deserialize(tree).expect("test tree must load");
        emit_program(&loaded.arena, &loaded.symbols, loaded.root)
    }

    const DECL_X: &str = r#"( ; ( VAR_DECLARATION ( LITERAL 0 "x" nil nil ) nil )
                               ( = ( LITERAL 0 "x" nil nil ) ( 1 nil nil ) ) )"#;

    #[test]
    fn test_declaration_with_initializer() {
        let tree = format!("( ; nil {DECL_X} )");
        assert_eq!(emit(&tree).unwrap(), "PUSH 1\nPOPR RAX\nHLT\n");
    }

    #[test]
    fn test_out_statement() {
        let tree = format!("( ; nil ( ; {DECL_X} ( OUT ( LITERAL 0 \"x\" nil nil ) nil ) ) )");
        assert_eq!(
            emit(&tree).unwrap(),
            "PUSH 1\nPOPR RAX\nPUSHR RAX\nOUT\nHLT\n"
        );
    }

    #[test]
    fn test_in_statement_binds_target() {
        let tree = "( ; nil ( IN ( LITERAL 0 \"y\" nil nil ) nil ) )";
        assert_eq!(emit(tree).unwrap(), "IN\nPOPR RAX\nHLT\n");
    }

    #[test]
    fn test_if_else_layout() {
        // if x > 2 then OUT x else OUT 0
        let tree = format!(
            "( ; nil ( ; {DECL_X} \
               ( IF ( > ( LITERAL 0 \"x\" nil nil ) ( 2 nil nil ) ) \
                    ( THEN ( OUT ( LITERAL 0 \"x\" nil nil ) nil ) \
                           ( OUT ( 0 nil nil ) nil ) ) ) ) )"
        );
        let asm = emit(&tree).unwrap();
        let expected = "PUSH 1\nPOPR RAX\n\
                        PUSHR RAX\nPUSH 2\nJA :if_1_then\nJMP :if_1\n\
                        :if_1_then\nPUSHR RAX\nOUT\nJMP :if_1_end\n\
                        :if_1\nPUSH 0\nOUT\n:if_1_end\nHLT\n";
        assert_eq!(asm, expected);
    }

    #[test]
    fn test_if_without_else_falls_through_to_end() {
        let tree = format!(
            "( ; nil ( ; {DECL_X} \
               ( IF ( > ( LITERAL 0 \"x\" nil nil ) ( 2 nil nil ) ) \
                    ( THEN ( OUT ( LITERAL 0 \"x\" nil nil ) nil ) nil ) ) ) )"
        );
        let asm = emit(&tree).unwrap();
        // the false edge jumps straight to the end label; no else label
        assert!(asm.contains("JA :if_1_then\nJMP :if_1_end\n"));
        assert!(asm.contains(":if_1_then\nPUSHR RAX\nOUT\n:if_1_end\n"));
        assert!(!asm.contains(":if_1\nPUSH"));
    }

    #[test]
    fn test_while_layout() {
        // while x < 3 { x = x + 1 }
        let tree = format!(
            "( ; nil ( ; {DECL_X} \
               ( WHILE ( < ( LITERAL 0 \"x\" nil nil ) ( 3 nil nil ) ) \
                       ( = ( LITERAL 0 \"x\" nil nil ) \
                           ( + ( LITERAL 0 \"x\" nil nil ) ( 1 nil nil ) ) ) ) ) )"
        );
        let asm = emit(&tree).unwrap();
        let expected = "PUSH 1\nPOPR RAX\n\
                        :while_1\nPUSHR RAX\nPUSH 3\nJB :while_1_body\nJMP :while_1_end\n\
                        :while_1_body\nPUSHR RAX\nPUSH 1\nADD\nPOPR RAX\n\
                        JMP :while_1\n:while_1_end\nHLT\n";
        assert_eq!(asm, expected);
    }

    #[test]
    fn test_do_while_condition_after_body() {
        let tree = format!(
            "( ; nil ( ; {DECL_X} \
               ( DO-WHILE ( < ( LITERAL 0 \"x\" nil nil ) ( 3 nil nil ) ) \
                          ( = ( LITERAL 0 \"x\" nil nil ) \
                              ( + ( LITERAL 0 \"x\" nil nil ) ( 1 nil nil ) ) ) ) ) )"
        );
        let asm = emit(&tree).unwrap();
        let body_pos = asm.find(":do-while_1\n").unwrap();
        let jump_pos = asm.find("JB :do-while_1").unwrap();
        assert!(jump_pos > body_pos);
        assert!(asm.ends_with(":do-while_1_end\nHLT\n"));
    }

    #[test]
    fn test_function_call_and_prologue() {
        // formula f(a, b) { return a + b }; main: OUT f(2, 3)
        let tree = "( ; \
            ( LITERAL 0 \"f\" \
              ( COMA ( LITERAL 1 \"a\" nil nil ) ( LITERAL 2 \"b\" nil nil ) ) \
              ( RETURN ( + ( LITERAL 1 \"a\" nil nil ) ( LITERAL 2 \"b\" nil nil ) ) nil ) ) \
            ( OUT ( FUNC_CALL ( LITERAL 0 \"f\" nil nil ) \
                              ( COMA ( 2 nil nil ) ( 3 nil nil ) ) ) nil ) )";
        let asm = emit(tree).unwrap();
        let expected = "PUSH 3\nPUSH 2\nCALL :f\nOUT\nHLT\n\
                        :f\nPOPR RAX\nPOPR RBX\nPUSHR RAX\nPUSHR RBX\nADD\nRET\n";
        assert_eq!(asm, expected);
    }

    #[test]
    fn test_function_without_return_gets_epilogue() {
        let tree = "( ; \
            ( LITERAL 0 \"noop\" ( LITERAL 1 \"a\" nil nil ) \
              ( OUT ( LITERAL 1 \"a\" nil nil ) nil ) ) \
            ( OUT ( 1 nil nil ) nil ) )";
        let asm = emit(tree).unwrap();
        assert!(asm.ends_with(":noop\nPOPR RAX\nPUSHR RAX\nOUT\nRET\n"));
    }

    #[test]
    fn test_comparison_as_value() {
        let tree = format!(
            "( ; nil ( ; {DECL_X} \
               ( = ( LITERAL 0 \"x\" nil nil ) \
                   ( < ( LITERAL 0 \"x\" nil nil ) ( 2 nil nil ) ) ) ) )"
        );
        let asm = emit(&tree).unwrap();
        let expected_tail = "PUSHR RAX\nPUSH 2\nJB :cmp_true_1\nJMP :cmp_false_1\n\
                             :cmp_false_1\nPUSH 0\nJMP :cmp_end_1\n\
                             :cmp_true_1\nPUSH 1\n:cmp_end_1\nPOPR RAX\nHLT\n";
        assert!(asm.ends_with(expected_tail));
    }

    #[test]
    fn test_short_circuit_and() {
        let tree = format!(
            "( ; nil ( ; {DECL_X} \
               ( IF ( AND ( > ( LITERAL 0 \"x\" nil nil ) ( 0 nil nil ) ) \
                          ( < ( LITERAL 0 \"x\" nil nil ) ( 2 nil nil ) ) ) \
                    ( THEN ( OUT ( 1 nil nil ) nil ) nil ) ) ) )"
        );
        let asm = emit(&tree).unwrap();
        // left operand jumps to the mid label, which must precede the right
        assert!(asm.contains("JA :if_and_1\nJMP :if_1_end\n:if_and_1\n"));
        assert!(asm.contains("JB :if_1_then\n"));
    }

    #[test]
    fn test_unknown_name_fails() {
        let tree = "( ; nil ( OUT ( LITERAL 0 \"ghost\" nil nil ) nil ) )";
        match emit(tree).unwrap_err() {
            BackendError::UnknownName { name } => assert_eq!(name, "ghost"),
            other => panic!("wrong error: {other}"),
        }
    }

    #[test]
    fn test_unsupported_operator_fails() {
        let tree = "( ; nil ( OUT ( LN ( 5 nil nil ) nil ) nil ) )";
        assert!(matches!(
            emit(tree).unwrap_err(),
            BackendError::UnsupportedOp { .. }
        ));
    }

    #[test]
    fn test_too_many_locals() {
        // nine declarations in the main body
        let mut body = String::from("( VAR_DECLARATION ( LITERAL 0 \"v0\" nil nil ) nil )");
        for i in 1..9 {
            body = format!(
                "( ; {body} ( VAR_DECLARATION ( LITERAL {i} \"v{i}\" nil nil ) nil ) )"
            );
        }
        let tree = format!("( ; nil {body} )");
        assert!(matches!(
            emit(&tree).unwrap_err(),
            BackendError::TooManyLocals { required: 9, .. }
        ));
    }

    #[test]
    fn test_draw_intrinsic() {
        let tree = "( ; nil ( FUNC_CALL ( LITERAL 0 \"draw\" nil nil ) ( 25 nil nil ) ) )";
        assert_eq!(emit(tree).unwrap(), "DRAW 25\nHLT\n");
    }

    #[test]
    fn test_draw_rejects_expression_argument() {
        let tree = "( ; nil ( FUNC_CALL ( LITERAL 0 \"draw\" nil nil ) \
                     ( + ( 1 nil nil ) ( 2 nil nil ) ) ) )";
        assert!(matches!(
            emit(tree).unwrap_err(),
            BackendError::BadBuiltinArgs { builtin: "DRAW", .. }
        ));
    }

    #[test]
    fn test_set_pixel_intrinsic() {
        let tree = format!(
            "( ; nil ( ; {DECL_X} \
               ( FUNC_CALL ( LITERAL 1 \"set_pixel\" nil nil ) \
                           ( COMA ( LITERAL 0 \"x\" nil nil ) ( 7 nil nil ) ) ) ) )"
        );
        let asm = emit(&tree).unwrap();
        // index into the scratch register, value pushed last
        assert!(asm.ends_with("PUSH 7\nPOPR RBX\nPUSHR RAX\nPOPM [RBX]\nHLT\n"));
    }

    #[test]
    fn test_push_float_precision() {
        let tree = "( ; nil ( OUT ( 0.1 nil nil ) nil ) )";
        assert_eq!(emit(tree).unwrap(), "PUSH 0.1\nOUT\nHLT\n");
    }

    #[test]
    fn test_labels_stay_unique_across_statements() {
        let tree = format!(
            "( ; nil ( ; {DECL_X} ( ; \
               ( IF ( > ( LITERAL 0 \"x\" nil nil ) ( 0 nil nil ) ) \
                    ( THEN ( OUT ( 1 nil nil ) nil ) nil ) ) \
               ( IF ( > ( LITERAL 0 \"x\" nil nil ) ( 1 nil nil ) ) \
                    ( THEN ( OUT ( 2 nil nil ) nil ) nil ) ) ) ) )"
        );
        let asm = emit(&tree).unwrap();
        assert!(asm.contains(":if_1_then"));
        assert!(asm.contains(":if_2_then"));
        let labels: Vec<&str> = asm
            .lines()
            .filter(|l| l.starts_with(':'))
            .collect();
        let mut dedup = labels.clone();
        dedup.sort();
        dedup.dedup();
        assert_eq!(labels.len(), dedup.len());
    }
}
