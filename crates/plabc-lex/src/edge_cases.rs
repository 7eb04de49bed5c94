//! Edge-case tests for the tokenizer: boundary conditions around the fixed
//! table, positions, and the odd corners of the line-oriented literals.

use plabc_ast::{Delim, Keyword, NodeKind, Op};

use crate::lexer::{tokenize, tokenize_bytes};
use crate::LexerError;

fn kinds(source: &str) -> Vec<NodeKind> {
    let unit = tokenize(None, source).unwrap();
    unit.tokens
        .iter()
        .map(|t| *unit.arena.kind(t.node))
        .collect()
}

#[test]
fn test_empty_and_whitespace_inputs() {
    assert!(kinds("").is_empty());
    assert!(kinds("   \n\t  \n").is_empty());
}

#[test]
fn test_keyword_at_end_of_buffer() {
    assert_eq!(kinds("СТОП"), vec![NodeKind::Keyword(Keyword::EndWhile)]);
    // no trailing newline after a single-char operator either
    assert_eq!(kinds("+"), vec![NodeKind::Operator(Op::Add)]);
}

#[test]
fn test_comment_at_end_without_newline() {
    assert_eq!(kinds("1 // trailing"), vec![NodeKind::Number(1.0)]);
    assert!(kinds("// only a comment").is_empty());
}

#[test]
fn test_comment_is_not_two_divisions() {
    // '/' alone is division; '//' must never be
    let k = kinds("1 / 2");
    assert_eq!(k[1], NodeKind::Operator(Op::Div));
    let k = kinds("1 // 2\n3");
    assert_eq!(k, vec![NodeKind::Number(1.0), NodeKind::Number(3.0)]);
}

#[test]
fn test_number_with_trailing_dot() {
    assert_eq!(kinds("12.")[0], NodeKind::Number(12.0));
    let k = kinds("12.5.7");
    // second dot starts a fresh number
    assert_eq!(k[0], NodeKind::Number(12.5));
}

#[test]
fn test_word_boundary_only_applies_to_ascii_neighbours() {
    // an ASCII letter before the spelling blocks the match
    let unit = tokenize(None, "xSIN").unwrap();
    assert_eq!(unit.token_count(), 1);
    assert!(matches!(
        unit.arena.kind(unit.tokens[0].node),
        NodeKind::Identifier(_)
    ));

    // a digit after blocks it too
    let unit = tokenize(None, "SIN2").unwrap();
    assert_eq!(unit.token_count(), 1);
    assert!(matches!(
        unit.arena.kind(unit.tokens[0].node),
        NodeKind::Identifier(_)
    ));
}

#[test]
fn test_pow_entry_is_exact_case() {
    // POW carries no casefold flag: lowercase is a plain identifier
    assert_eq!(kinds("POW")[0], NodeKind::Operator(Op::Pow));
    let unit = tokenize(None, "pow").unwrap();
    assert!(matches!(
        unit.arena.kind(unit.tokens[0].node),
        NodeKind::Identifier(_)
    ));
}

#[test]
fn test_single_letter_cyrillic_operators() {
    assert_eq!(kinds("1 И 2")[1], NodeKind::Operator(Op::And));
    assert_eq!(kinds("1 ИЛИ 2")[1], NodeKind::Operator(Op::Or));
    assert_eq!(kinds("НЕ")[0], NodeKind::Operator(Op::Not));
}

#[test]
fn test_multi_word_keyword_positions() {
    // the whole phrase is one token; the next token's column accounts for
    // the characters of the phrase, not its bytes
    let unit = tokenize(None, "ХОД РАБОТЫ x").unwrap();
    assert_eq!(unit.tokens[0].span.column, 1);
    assert_eq!(unit.tokens[1].span.column, 12);
}

#[test]
fn test_string_directly_after_keyword() {
    let k = kinds("ПОКАЗАТЬ\"attached\"");
    assert_eq!(k[0], NodeKind::Operator(Op::Out));
    assert_eq!(k[1], NodeKind::Delimiter(Delim::Quote));
    assert!(matches!(k[2], NodeKind::Literal(_)));
    assert_eq!(k[3], NodeKind::Delimiter(Delim::Quote));
}

#[test]
fn test_empty_string_literal() {
    let unit = tokenize(None, "\"\"").unwrap();
    assert_eq!(unit.token_count(), 3);
    let NodeKind::Literal(sym) = unit.arena.kind(unit.tokens[1].node) else {
        panic!("expected literal");
    };
    assert_eq!(unit.symbols.get(*sym), Some(""));
}

#[test]
fn test_unterminated_string_reports_opening_position() {
    let err = tokenize(None, "ВЕЛИЧИНА x\n  \"oops").unwrap_err();
    match err {
        LexerError::UnterminatedString { line, column } => {
            assert_eq!(line, 2);
            assert_eq!(column, 3);
        }
        other => panic!("wrong error: {other}"),
    }
}

#[test]
fn test_free_literal_keeps_inner_spacing() {
    let unit = tokenize(None, "Опыт  с   пробелами").unwrap();
    assert_eq!(unit.token_count(), 1);
    let NodeKind::Literal(sym) = unit.arena.kind(unit.tokens[0].node) else {
        panic!("expected literal");
    };
    assert_eq!(unit.symbols.get(*sym), Some("Опыт  с   пробелами"));
}

#[test]
fn test_crlf_line_endings() {
    // '\r' is ASCII whitespace between tokens
    let k = kinds("1\r\n2");
    assert_eq!(k, vec![NodeKind::Number(1.0), NodeKind::Number(2.0)]);
}

#[test]
fn test_identifier_position_after_cyrillic_line() {
    let unit = tokenize(None, "Первая строка\nx").unwrap();
    assert_eq!(unit.tokens[1].span.line, 2);
    assert_eq!(unit.tokens[1].span.column, 1);
}

#[test]
fn test_invalid_utf8_rejected_midway() {
    let mut bytes = "ВЕЛИЧИНА x = ".as_bytes().to_vec();
    bytes.push(0xC3);
    assert!(matches!(
        tokenize_bytes(None, &bytes),
        Err(LexerError::Encoding(_))
    ));
}

#[test]
fn test_full_report_token_stream_shape() {
    let source = "ЛАБОРАТОРНАЯ РАБОТА Маятник\n\
                  АННОТАЦИЯ\nЦЕЛЬ: наблюдение\nКОНЕЦ АННОТАЦИИ\n\
                  ТЕОРЕТИЧЕСКИЕ СВЕДЕНИЯ\nКОНЕЦ ТЕОРИИ\n\
                  ХОД РАБОТЫ\nВЕЛИЧИНА t = 0\nКОНЕЦ РАБОТЫ\n\
                  ОБСУЖДЕНИЕ РЕЗУЛЬТАТОВ\nКОНЕЦ РЕЗУЛЬТАТОВ\n\
                  ВЫВОДЫ\nКОНЕЦ ВЫВОДОВ\n";
    let k = kinds(source);
    assert_eq!(k[0], NodeKind::Keyword(Keyword::Lab));
    assert!(matches!(k[1], NodeKind::Literal(_))); // title
    assert_eq!(k[2], NodeKind::Keyword(Keyword::Annotation));
    assert_eq!(k[3], NodeKind::Keyword(Keyword::GoalLiteral));
    assert_eq!(k[4], NodeKind::Delimiter(Delim::Colon));
    assert!(matches!(k[5], NodeKind::Literal(_))); // goal prose
    assert_eq!(k[6], NodeKind::Keyword(Keyword::EndAnnotation));
    assert_eq!(*k.last().unwrap(), NodeKind::Keyword(Keyword::EndConclusion));
}
