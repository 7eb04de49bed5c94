//! The tokenizer.
//!
//! One forward pass over the buffer. At each position, in order: skip
//! whitespace, discard `//` comments, try the fixed-token table, then
//! strings, numbers, identifiers; anything else starts a free-form
//! rest-of-line literal (section titles and prose are tokenized this way).

use plabc_ast::{CompileUnit, Delim, NodeKind};
use plabc_util::Span;

use crate::cursor::{is_ascii_word, Cursor};
use crate::error::LexerError;
use crate::table::{FixedToken, FIXED_TOKENS};

/// Tokenizes raw bytes, failing with [`LexerError::Encoding`] when the
/// input is not UTF-8.
pub fn tokenize_bytes(name: Option<&str>, bytes: &[u8]) -> Result<CompileUnit, LexerError> {
    let source = std::str::from_utf8(bytes)?;
    tokenize(name, source)
}

/// Tokenizes a source string into a fresh [`CompileUnit`].
///
/// On failure the partially built unit is discarded.
///
/// # Example
///
/// ```
/// let unit = plabc_lex::tokenize(None, "ВЕЛИЧИНА x = 1").unwrap();
/// assert_eq!(unit.token_count(), 4);
/// assert!(unit.symbols.contains("x"));
/// ```
pub fn tokenize(name: Option<&str>, source: &str) -> Result<CompileUnit, LexerError> {
    let mut unit = CompileUnit::new(name, source);
    let mut cursor = Cursor::new(source);

    while !cursor.is_at_end() {
        skip_whitespace(&mut cursor);
        if cursor.is_at_end() {
            break;
        }

        if cursor.starts_with("//") {
            skip_line(&mut cursor);
            continue;
        }

        if let Some(entry) = match_fixed(&cursor) {
            let span = span_here(&cursor, entry.text.len());
            unit.add_token(entry.kind, span);
            cursor.advance_bytes(entry.text.len());
            continue;
        }

        match cursor.byte() {
            Some(b'"') => lex_string(&mut unit, &mut cursor)?,
            Some(b) if b.is_ascii_digit() => lex_number(&mut unit, &mut cursor),
            Some(b) if b.is_ascii_alphabetic() || b == b'_' => {
                lex_identifier(&mut unit, &mut cursor)
            }
            _ => lex_free_literal(&mut unit, &mut cursor),
        }
    }

    Ok(unit)
}

/// Skips ASCII whitespace; newlines advance the line counter.
fn skip_whitespace(cursor: &mut Cursor) {
    while let Some(b) = cursor.byte() {
        if !b.is_ascii_whitespace() {
            break;
        }
        cursor.advance_bytes(1);
    }
}

/// Skips to the end of the current line (the newline itself stays).
fn skip_line(cursor: &mut Cursor) {
    while let Some(b) = cursor.byte() {
        if b == b'\n' {
            break;
        }
        cursor.advance_char();
    }
}

fn span_here(cursor: &Cursor, len: usize) -> Span {
    Span::new(
        cursor.position(),
        cursor.position() + len,
        cursor.line(),
        cursor.column(),
    )
}

/// Tries the fixed-token table at the cursor. First hit wins; the table is
/// ordered so that longer spellings shadow their prefixes.
fn match_fixed(cursor: &Cursor) -> Option<&'static FixedToken> {
    let rest = cursor.rest();
    FIXED_TOKENS.iter().find(|entry| {
        let text = entry.text.as_bytes();
        let Some(region) = rest.get(..text.len()) else {
            return false;
        };
        let matches = if entry.casefold {
            region
                .iter()
                .zip(text)
                .all(|(&src, &want)| src.to_ascii_uppercase() == want)
        } else {
            region == text
        };
        if !matches {
            return false;
        }
        if entry.word_boundary {
            if cursor.prev_byte().is_some_and(is_ascii_word) {
                return false;
            }
            if rest.get(text.len()).copied().is_some_and(is_ascii_word) {
                return false;
            }
        }
        true
    })
}

/// `"…"` emits three tokens: QUOTE, the interned LITERAL body, QUOTE.
fn lex_string(unit: &mut CompileUnit, cursor: &mut Cursor) -> Result<(), LexerError> {
    let open_span = span_here(cursor, 1);
    let (line, column) = (cursor.line(), cursor.column());
    cursor.advance_bytes(1);

    let content_start = cursor.position();
    loop {
        match cursor.byte() {
            Some(b'"') => break,
            Some(b'\n') | None => {
                return Err(LexerError::UnterminatedString { line, column });
            }
            Some(_) => cursor.advance_char(),
        }
    }

    let content = cursor.slice_from(content_start);
    let sym = unit.symbols.add(content);

    unit.add_token(NodeKind::Delimiter(Delim::Quote), open_span);
    unit.add_token(
        NodeKind::Literal(sym),
        Span::new(content_start, cursor.position(), line, column + 1),
    );
    unit.add_token(NodeKind::Delimiter(Delim::Quote), span_here(cursor, 1));
    cursor.advance_bytes(1);
    Ok(())
}

/// Digits with an optional fractional part; no exponent form.
fn lex_number(unit: &mut CompileUnit, cursor: &mut Cursor) {
    let start = cursor.position();
    let (line, column) = (cursor.line(), cursor.column());

    while cursor.byte().is_some_and(|b| b.is_ascii_digit()) {
        cursor.advance_bytes(1);
    }
    if cursor.byte() == Some(b'.') {
        cursor.advance_bytes(1);
        while cursor.byte().is_some_and(|b| b.is_ascii_digit()) {
            cursor.advance_bytes(1);
        }
    }

    let text = cursor.slice_from(start);
    let value = text.parse::<f64>().unwrap_or(0.0);
    unit.add_token(
        NodeKind::Number(value),
        Span::new(start, cursor.position(), line, column),
    );
}

/// ASCII identifier `[A-Za-z_][A-Za-z0-9_]*`, interned.
fn lex_identifier(unit: &mut CompileUnit, cursor: &mut Cursor) {
    let start = cursor.position();
    let (line, column) = (cursor.line(), cursor.column());

    cursor.advance_bytes(1);
    while cursor.byte().is_some_and(is_ascii_word) {
        cursor.advance_bytes(1);
    }

    let sym = unit.symbols.add(cursor.slice_from(start));
    unit.add_token(
        NodeKind::Identifier(sym),
        Span::new(start, cursor.position(), line, column),
    );
}

/// Anything else: the rest of the line becomes one interned literal. Lab
/// titles and conclusion prose arrive here.
fn lex_free_literal(unit: &mut CompileUnit, cursor: &mut Cursor) {
    let start = cursor.position();
    let (line, column) = (cursor.line(), cursor.column());
    skip_line(cursor);

    let sym = unit.symbols.add(cursor.slice_from(start));
    unit.add_token(
        NodeKind::Literal(sym),
        Span::new(start, cursor.position(), line, column),
    );
}
