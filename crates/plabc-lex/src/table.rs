//! Fixed-token table.
//!
//! Every keyword, operator and delimiter spelling the language knows, in
//! match priority order. The table is scanned top to bottom and the first
//! hit wins, so longer spellings come first: `ПОКАЗАТЬ` must be tried
//! before `ПОКА`, `ИЛИ` before `И`, `==` before `=`.
//!
//! `casefold` compares after ASCII-uppercasing the source bytes (bytes
//! outside ASCII compare verbatim, so Cyrillic keywords must be written in
//! upper case). `word_boundary` rejects a match whose neighbouring byte is
//! an ASCII letter, digit or underscore, which keeps `SIN` out of `SINUS`.

use plabc_ast::{Delim, Keyword, NodeKind, Op};

/// One entry of the match table.
pub struct FixedToken {
    /// The exact spelling, bytes as they must appear (after casefold).
    pub text: &'static str,
    /// Node kind to emit on a match.
    pub kind: NodeKind,
    /// Compare with ASCII uppercasing applied to the source region.
    pub casefold: bool,
    /// Reject the match when flanked by an ASCII word character.
    pub word_boundary: bool,
}

const fn kw(text: &'static str, keyword: Keyword) -> FixedToken {
    FixedToken {
        text,
        kind: NodeKind::Keyword(keyword),
        casefold: true,
        word_boundary: true,
    }
}

const fn op(text: &'static str, operator: Op) -> FixedToken {
    FixedToken {
        text,
        kind: NodeKind::Operator(operator),
        casefold: true,
        word_boundary: true,
    }
}

const fn sym(text: &'static str, operator: Op) -> FixedToken {
    FixedToken {
        text,
        kind: NodeKind::Operator(operator),
        casefold: false,
        word_boundary: false,
    }
}

const fn delim(text: &'static str, delimiter: Delim) -> FixedToken {
    FixedToken {
        text,
        kind: NodeKind::Delimiter(delimiter),
        casefold: false,
        word_boundary: false,
    }
}

/// The match table, priority-ordered.
pub const FIXED_TOKENS: &[FixedToken] = &[
    kw("ТЕОРЕТИЧЕСКИЕ СВЕДЕНИЯ", Keyword::Theoretical),
    kw("ОБСУЖДЕНИЕ РЕЗУЛЬТАТОВ", Keyword::Results),
    kw("ЛАБОРАТОРНАЯ РАБОТА", Keyword::Lab),
    kw("КОНЕЦ РЕЗУЛЬТАТОВ", Keyword::EndResults),
    kw("РАССЧИТЫВАЕТСЯ ИЗ", Keyword::FuncCall),
    kw("КОНЕЦ АННОТАЦИИ", Keyword::EndAnnotation),
    kw("КОНЕЦ ВЫВОДОВ", Keyword::EndConclusion),
    kw("КОНЕЦ ФОРМУЛЫ", Keyword::EndFormula),
    kw("КОНЕЦ ТЕОРИИ", Keyword::EndTheoretical),
    kw("КОНЕЦ РАБОТЫ", Keyword::EndExperimental),
    kw("КОНЕЦ ВЫВОДА", Keyword::EndConclusion),
    kw("ХОД РАБОТЫ", Keyword::Experimental),
    kw("ВОЗВРАТИТЬ", Keyword::Return),
    kw("АННОТАЦИЯ", Keyword::Annotation),
    kw("ПОВТОРЯЕМ", Keyword::While),
    kw("ПРИМЕНЯЕМ", Keyword::FuncCall),
    kw("ВЫЧИСЛЯЕМ", Keyword::FuncCall),
    kw("ВЕЛИЧИНА", Keyword::VarDeclaration),
    op("ПОКАЗАТЬ", Op::Out),
    op("ИЗМЕРИТЬ", Op::In),
    kw("ФОРМУЛА", Keyword::Formula),
    kw("ВЫРАЗИМ", Keyword::LetAssignment),
    op("ВЫВЕСТИ", Op::Out),
    op("ARCCTAN", Op::Actg),
    kw("ВЫВОДЫ", Keyword::Conclusion),
    op("ARCSIN", Op::Asin),
    op("ARCCOS", Op::Acos),
    op("ARCTAN", Op::Atan),
    op("ARCCTG", Op::Actg),
    kw("ПУСТЬ", Keyword::LetAssignment),
    kw("БУДЕТ", Keyword::LetAssignment),
    kw("ИНАЧЕ", Keyword::Else),
    op("ARCTG", Op::Atan),
    kw("ЦЕЛЬ", Keyword::GoalLiteral),
    kw("ПОКА", Keyword::WhileCondition),
    kw("СТОП", Keyword::EndWhile),
    kw("ЕСЛИ", Keyword::If),
    op("CTAN", Op::Ctg),
    op("ASIN", Op::Asin),
    op("ACOS", Op::Acos),
    op("ATAN", Op::Atan),
    op("ACTG", Op::Actg),
    op("SQRT", Op::Sqrt),
    op("COS", Op::Cos),
    op("SIN", Op::Sin),
    sym("POW", Op::Pow),
    op("TAN", Op::Tan),
    op("CTG", Op::Ctg),
    op("AND", Op::And),
    op("NOT", Op::Not),
    op("ИЛИ", Op::Or),
    kw("ТО", Keyword::Then),
    op("LN", Op::Ln),
    op("TG", Op::Tan),
    op("OR", Op::Or),
    op("НЕ", Op::Not),
    sym("==", Op::Eq),
    sym("!=", Op::Neq),
    sym("<=", Op::BelowEq),
    sym(">=", Op::AboveEq),
    op("И", Op::And),
    sym("=", Op::Assignment),
    sym("<", Op::Below),
    sym(">", Op::Above),
    sym("+", Op::Add),
    sym("-", Op::Sub),
    sym("*", Op::Mul),
    sym("/", Op::Div),
    sym("%", Op::Mod),
    delim("(", Delim::ParOpen),
    delim(")", Delim::ParClose),
    delim(",", Delim::Comma),
    delim(":", Delim::Colon),
];
