//! Edge-case tests for the grammar: section boundaries, the three call
//! spellings, and the first-failure error policy.

use plabc_ast::{Delim, Keyword, NodeKind, Op};

use crate::tests::{parse_source, wrap_body};
use crate::ParserError;

#[test]
fn test_empty_experimental_section_with_results_body() {
    let source = "ЛАБОРАТОРНАЯ РАБОТА\n\
         АННОТАЦИЯ\nКОНЕЦ АННОТАЦИИ\n\
         ТЕОРЕТИЧЕСКИЕ СВЕДЕНИЯ\nКОНЕЦ ТЕОРИИ\n\
         ХОД РАБОТЫ\nКОНЕЦ РАБОТЫ\n\
         ОБСУЖДЕНИЕ РЕЗУЛЬТАТОВ\nВЕЛИЧИНА x\nКОНЕЦ РЕЗУЛЬТАТОВ\n\
         ВЫВОДЫ\nКОНЕЦ ВЫВОДОВ\n";
    let unit = parse_source(source).unwrap();
    let root = unit.arena.node(unit.root.unwrap());
    // the lone RESULTS statement becomes the whole body
    let body = unit.arena.node(root.right.unwrap());
    assert!(body.kind.is_keyword(Keyword::VarDeclaration));
}

#[test]
fn test_functions_with_empty_body() {
    let source = "ЛАБОРАТОРНАЯ РАБОТА\n\
         АННОТАЦИЯ\nКОНЕЦ АННОТАЦИИ\n\
         ТЕОРЕТИЧЕСКИЕ СВЕДЕНИЯ\n\
         ФОРМУЛА id (a)\nВОЗВРАТИТЬ a\nКОНЕЦ ФОРМУЛЫ\n\
         КОНЕЦ ТЕОРИИ\n\
         ХОД РАБОТЫ\nКОНЕЦ РАБОТЫ\n\
         ОБСУЖДЕНИЕ РЕЗУЛЬТАТОВ\nКОНЕЦ РЕЗУЛЬТАТОВ\n\
         ВЫВОДЫ\nКОНЕЦ ВЫВОДОВ\n";
    let unit = parse_source(source).unwrap();
    let root = unit.arena.node(unit.root.unwrap());
    assert!(root.kind.is_operator(Op::Connector));
    assert!(root.left.is_some());
    assert_eq!(root.right, None);
}

#[test]
fn test_fully_empty_program_fails() {
    let source = "ЛАБОРАТОРНАЯ РАБОТА\n\
         АННОТАЦИЯ\nКОНЕЦ АННОТАЦИИ\n\
         ТЕОРЕТИЧЕСКИЕ СВЕДЕНИЯ\nКОНЕЦ ТЕОРИИ\n\
         ХОД РАБОТЫ\nКОНЕЦ РАБОТЫ\n\
         ОБСУЖДЕНИЕ РЕЗУЛЬТАТОВ\nКОНЕЦ РЕЗУЛЬТАТОВ\n\
         ВЫВОДЫ\nКОНЕЦ ВЫВОДОВ\n";
    assert!(parse_source(source).is_err());
}

#[test]
fn test_missing_loop_end_keyword() {
    let err = parse_source(&wrap_body("ВЕЛИЧИНА i = 0\nПОКА i < 3 ПОВТОРЯЕМ i = i + 1"))
        .unwrap_err();
    // the statement list stops at КОНЕЦ РАБОТЫ, so СТОП is what is missing
    assert!(matches!(
        err,
        ParserError::MissingKeyword {
            expected: "СТОП",
            ..
        }
    ));
}

#[test]
fn test_missing_then_keyword() {
    let err = parse_source(&wrap_body("ВЕЛИЧИНА x = 1\nЕСЛИ x > 0 ПОКАЗАТЬ x")).unwrap_err();
    assert!(matches!(
        err,
        ParserError::MissingKeyword { expected: "ТО", .. }
    ));
}

#[test]
fn test_error_carries_token_position() {
    // line 8 of the wrapped source holds the broken statement
    let err = parse_source(&wrap_body("ВЕЛИЧИНА 5")).unwrap_err();
    match err {
        ParserError::Unexpected { line, column, found } => {
            assert!(line > 1);
            assert!(column >= 1);
            assert!(found.contains('5'), "found = {found}");
        }
        other => panic!("wrong error: {other}"),
    }
}

#[test]
fn test_call_with_marker_and_parens() {
    let source = "ЛАБОРАТОРНАЯ РАБОТА\n\
         АННОТАЦИЯ\nКОНЕЦ АННОТАЦИИ\n\
         ТЕОРЕТИЧЕСКИЕ СВЕДЕНИЯ\n\
         ФОРМУЛА g (v)\nВОЗВРАТИТЬ v\nКОНЕЦ ФОРМУЛЫ\n\
         КОНЕЦ ТЕОРИИ\n\
         ХОД РАБОТЫ\nПОКАЗАТЬ g ВЫЧИСЛЯЕМ (7)\nКОНЕЦ РАБОТЫ\n\
         ОБСУЖДЕНИЕ РЕЗУЛЬТАТОВ\nКОНЕЦ РЕЗУЛЬТАТОВ\n\
         ВЫВОДЫ\nКОНЕЦ ВЫВОДОВ\n";
    let unit = parse_source(source).unwrap();
    let root = unit.arena.node(unit.root.unwrap());
    let show = unit.arena.node(root.right.unwrap());
    let call = unit.arena.node(show.left.unwrap());
    assert!(call.kind.is_keyword(Keyword::FuncCall));
}

#[test]
fn test_multiword_call_marker_spelling() {
    let source = wrap_body("ВЕЛИЧИНА q\nq = f РАССЧИТЫВАЕТСЯ ИЗ 1, 2");
    let unit = parse_source(&source).unwrap();
    let root = unit.arena.node(unit.root.unwrap());
    let joint = unit.arena.node(root.right.unwrap());
    let assign = unit.arena.node(joint.right.unwrap());
    let call = unit.arena.node(assign.right.unwrap());
    assert!(call.kind.is_keyword(Keyword::FuncCall));
    assert!(unit
        .arena
        .node(call.right.unwrap())
        .kind
        .is_delimiter(Delim::Comma));
}

#[test]
fn test_annotation_swallows_control_keywords() {
    // annotation content is skipped wholesale, even when it happens to
    // contain statement keywords
    let source = "ЛАБОРАТОРНАЯ РАБОТА\n\
         АННОТАЦИЯ\nЕСЛИ ПОКА СТОП ВОЗВРАТИТЬ\nКОНЕЦ АННОТАЦИИ\n\
         ТЕОРЕТИЧЕСКИЕ СВЕДЕНИЯ\nКОНЕЦ ТЕОРИИ\n\
         ХОД РАБОТЫ\nВЕЛИЧИНА x\nКОНЕЦ РАБОТЫ\n\
         ОБСУЖДЕНИЕ РЕЗУЛЬТАТОВ\nКОНЕЦ РЕЗУЛЬТАТОВ\n\
         ВЫВОДЫ\nКОНЕЦ ВЫВОДОВ\n";
    assert!(parse_source(source).is_ok());
}

#[test]
fn test_nested_loops_and_branches() {
    let unit = parse_source(&wrap_body(
        "ВЕЛИЧИНА i = 0\n\
         ПОКА i < 10 ПОВТОРЯЕМ\n\
             ЕСЛИ i % 2 == 0 ТО ПОКАЗАТЬ i ИНАЧЕ ПОКАЗАТЬ 0\n\
             i = i + 1\n\
         СТОП",
    ))
    .unwrap();
    let root = unit.arena.node(unit.root.unwrap());
    let joint = unit.arena.node(root.right.unwrap());
    let while_node = unit.arena.node(joint.right.unwrap());
    assert!(while_node.kind.is_keyword(Keyword::While));
    // there is no end-if marker, so the trailing assignment belongs to the
    // else branch and the loop body is the if itself
    let body = unit.arena.node(while_node.right.unwrap());
    assert!(body.kind.is_keyword(Keyword::If));
    let then_tok = unit.arena.node(body.right.unwrap());
    let else_ops = unit.arena.node(then_tok.right.unwrap());
    assert!(else_ops.kind.is_operator(Op::Connector));
    assert!(unit
        .arena
        .node(else_ops.right.unwrap())
        .kind
        .is_operator(Op::Assignment));
}

#[test]
fn test_else_branch_is_greedy_until_section_close() {
    let unit = parse_source(&wrap_body(
        "ВЕЛИЧИНА x = 1\nЕСЛИ x > 0 ТО ПОКАЗАТЬ 1 ИНАЧЕ ПОКАЗАТЬ 2\nПОКАЗАТЬ 3",
    ))
    .unwrap();
    // statements after ИНАЧЕ join the else branch until КОНЕЦ РАБОТЫ
    let root = unit.arena.node(unit.root.unwrap());
    let outer = unit.arena.node(root.right.unwrap());
    assert!(outer.kind.is_operator(Op::Connector));
    let if_node = unit.arena.node(outer.right.unwrap());
    assert!(if_node.kind.is_keyword(Keyword::If));
    let then_tok = unit.arena.node(if_node.right.unwrap());
    let else_ops = unit.arena.node(then_tok.right.unwrap());
    assert!(else_ops.kind.is_operator(Op::Connector));
}

#[test]
fn test_string_argument_to_out() {
    let unit = parse_source(&wrap_body("ПОКАЗАТЬ \"итоги\"")).unwrap();
    let root = unit.arena.node(unit.root.unwrap());
    let out = unit.arena.node(root.right.unwrap());
    assert!(out.kind.is_operator(Op::Out));
    let arg = unit.arena.node(out.left.unwrap());
    let NodeKind::Literal(sym) = arg.kind else {
        panic!("expected literal argument");
    };
    assert_eq!(unit.symbols.get(sym), Some("итоги"));
}

#[test]
fn test_let_assignment_spelling_is_not_a_statement() {
    // ПУСТЬ lexes to its own keyword but no statement rule accepts it
    assert!(parse_source(&wrap_body("ПУСТЬ x = 1")).is_err());
}

#[test]
fn test_synthetic_nodes_share_the_token_array() {
    let unit = parse_source(&wrap_body("ВЕЛИЧИНА x = 1")).unwrap();
    let synthetic = unit.tokens.iter().filter(|t| t.is_synthetic()).count();
    // at least: two name clones, the decl/assign joint, the root joint
    assert!(synthetic >= 4, "synthetic tokens: {synthetic}");
    assert!(unit.tokens.len() > synthetic);
}
