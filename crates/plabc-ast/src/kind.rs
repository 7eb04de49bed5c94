//! Node discriminants: keywords, operators, delimiters.
//!
//! The spellings returned by the `name` methods are the on-disk heads of the
//! serialized tree form; `from_name` is their inverse used by the loader.

use plabc_util::SymId;

/// Section markers, control flow, declarations, calls and return.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Keyword {
    Lab,
    Annotation,
    EndAnnotation,
    GoalLiteral,
    Theoretical,
    EndTheoretical,
    Experimental,
    EndExperimental,
    Results,
    EndResults,
    Conclusion,
    EndConclusion,
    If,
    Else,
    Then,
    While,
    DoWhile,
    WhileCondition,
    EndWhile,
    Formula,
    EndFormula,
    VarDeclaration,
    LetAssignment,
    FuncCall,
    Return,
}

impl Keyword {
    /// Enumerator spelling used by the serialized form.
    pub fn name(self) -> &'static str {
        match self {
            Keyword::Lab => "LAB",
            Keyword::Annotation => "ANNOTATION",
            Keyword::EndAnnotation => "END_ANNOTATION",
            Keyword::GoalLiteral => "GOAL_LITERAL",
            Keyword::Theoretical => "THEORETICAL",
            Keyword::EndTheoretical => "END_THEORETICAL",
            Keyword::Experimental => "EXPERIMENTAL",
            Keyword::EndExperimental => "END_EXPERIMENTAL",
            Keyword::Results => "RESULTS",
            Keyword::EndResults => "END_RESULTS",
            Keyword::Conclusion => "CONCLUSION",
            Keyword::EndConclusion => "END_CONCLUSION",
            Keyword::If => "IF",
            Keyword::Else => "ELSE",
            Keyword::Then => "THEN",
            Keyword::While => "WHILE",
            Keyword::DoWhile => "DO-WHILE",
            Keyword::WhileCondition => "WHILE_CONDITION",
            Keyword::EndWhile => "END_WHILE",
            Keyword::Formula => "FORMULA",
            Keyword::EndFormula => "END_FORMULA",
            Keyword::VarDeclaration => "VAR_DECLARATION",
            Keyword::LetAssignment => "LET_ASSIGNMENT",
            Keyword::FuncCall => "FUNC_CALL",
            Keyword::Return => "RETURN",
        }
    }

    /// Parses a serialized head back into a keyword.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "LAB" => Keyword::Lab,
            "ANNOTATION" => Keyword::Annotation,
            "END_ANNOTATION" => Keyword::EndAnnotation,
            "GOAL_LITERAL" => Keyword::GoalLiteral,
            "THEORETICAL" => Keyword::Theoretical,
            "END_THEORETICAL" => Keyword::EndTheoretical,
            "EXPERIMENTAL" => Keyword::Experimental,
            "END_EXPERIMENTAL" => Keyword::EndExperimental,
            "RESULTS" => Keyword::Results,
            "END_RESULTS" => Keyword::EndResults,
            "CONCLUSION" => Keyword::Conclusion,
            "END_CONCLUSION" => Keyword::EndConclusion,
            "IF" => Keyword::If,
            "ELSE" => Keyword::Else,
            "THEN" => Keyword::Then,
            "WHILE" => Keyword::While,
            "DO-WHILE" => Keyword::DoWhile,
            "WHILE_CONDITION" => Keyword::WhileCondition,
            "END_WHILE" => Keyword::EndWhile,
            "FORMULA" => Keyword::Formula,
            "END_FORMULA" => Keyword::EndFormula,
            "VAR_DECLARATION" => Keyword::VarDeclaration,
            "LET_ASSIGNMENT" => Keyword::LetAssignment,
            "FUNC_CALL" => Keyword::FuncCall,
            "RETURN" => Keyword::Return,
            _ => return None,
        })
    }
}

/// Arithmetic, comparison, logical, IO and structural operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    Ln,
    Sin,
    Cos,
    Tan,
    Ctg,
    Asin,
    Acos,
    Atan,
    Actg,
    Sqrt,
    Eq,
    Neq,
    Below,
    Above,
    BelowEq,
    AboveEq,
    And,
    Or,
    Not,
    In,
    Out,
    SetPixel,
    Draw,
    Assignment,
    Connector,
}

impl Op {
    /// Serialized spelling: symbolic where the surface syntax has a symbol,
    /// the enumerator name otherwise.
    pub fn name(self) -> &'static str {
        match self {
            Op::Add => "+",
            Op::Sub => "-",
            Op::Mul => "*",
            Op::Div => "/",
            Op::Mod => "%",
            Op::Pow => "^",
            Op::Ln => "LN",
            Op::Sin => "SIN",
            Op::Cos => "COS",
            Op::Tan => "TAN",
            Op::Ctg => "CTG",
            Op::Asin => "ASIN",
            Op::Acos => "ACOS",
            Op::Atan => "ATAN",
            Op::Actg => "ACTG",
            Op::Sqrt => "SQRT",
            Op::Eq => "==",
            Op::Neq => "!=",
            Op::Below => "<",
            Op::Above => ">",
            Op::BelowEq => "<=",
            Op::AboveEq => ">=",
            Op::And => "AND",
            Op::Or => "OR",
            Op::Not => "!",
            Op::In => "IN",
            Op::Out => "OUT",
            Op::SetPixel => "SET_PIXEL",
            Op::Draw => "DRAW",
            Op::Assignment => "=",
            Op::Connector => ";",
        }
    }

    /// Parses a serialized head back into an operator. `NOT` is accepted as
    /// an alias for `!`.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "+" => Op::Add,
            "-" => Op::Sub,
            "*" => Op::Mul,
            "/" => Op::Div,
            "%" => Op::Mod,
            "^" => Op::Pow,
            "LN" => Op::Ln,
            "SIN" => Op::Sin,
            "COS" => Op::Cos,
            "TAN" => Op::Tan,
            "CTG" => Op::Ctg,
            "ASIN" => Op::Asin,
            "ACOS" => Op::Acos,
            "ATAN" => Op::Atan,
            "ACTG" => Op::Actg,
            "SQRT" => Op::Sqrt,
            "==" => Op::Eq,
            "!=" => Op::Neq,
            "<" => Op::Below,
            ">" => Op::Above,
            "<=" => Op::BelowEq,
            ">=" => Op::AboveEq,
            "AND" => Op::And,
            "OR" => Op::Or,
            "!" | "NOT" => Op::Not,
            "IN" => Op::In,
            "OUT" => Op::Out,
            "SET_PIXEL" => Op::SetPixel,
            "DRAW" => Op::Draw,
            "=" => Op::Assignment,
            ";" => Op::Connector,
            _ => return None,
        })
    }

    /// True for the six relational operators.
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            Op::Eq | Op::Neq | Op::Below | Op::Above | Op::BelowEq | Op::AboveEq
        )
    }

    /// True for built-in functions taking one argument in call syntax.
    pub fn is_unary_builtin(self) -> bool {
        matches!(
            self,
            Op::Sin
                | Op::Cos
                | Op::Tan
                | Op::Ctg
                | Op::Asin
                | Op::Acos
                | Op::Atan
                | Op::Actg
                | Op::Sqrt
                | Op::Ln
                | Op::Not
        )
    }

    /// True for built-in functions taking two arguments in call syntax.
    pub fn is_binary_builtin(self) -> bool {
        matches!(self, Op::Pow)
    }
}

/// Punctuation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delim {
    ParOpen,
    ParClose,
    Quote,
    Comma,
    Colon,
}

impl Delim {
    /// Enumerator spelling used by the serialized form.
    pub fn name(self) -> &'static str {
        match self {
            Delim::ParOpen => "PAR_OPEN",
            Delim::ParClose => "PAR_CLOSE",
            Delim::Quote => "QUOTE",
            Delim::Comma => "COMA",
            Delim::Colon => "COLON",
        }
    }

    /// Parses a serialized head back into a delimiter.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "PAR_OPEN" => Delim::ParOpen,
            "PAR_CLOSE" => Delim::ParClose,
            "QUOTE" => Delim::Quote,
            "COMA" | "," => Delim::Comma,
            "COLON" => Delim::Colon,
            _ => return None,
        })
    }
}

/// The discriminated payload of a tree node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NodeKind {
    /// Numeric literal.
    Number(f64),
    /// Identifier reference; the index points into the symbol table.
    Identifier(SymId),
    /// String or cloned-name literal; the index points into the symbol table.
    Literal(SymId),
    Keyword(Keyword),
    Operator(Op),
    Delimiter(Delim),
}

impl NodeKind {
    /// True when this is the given keyword.
    #[inline]
    pub fn is_keyword(&self, kw: Keyword) -> bool {
        matches!(self, NodeKind::Keyword(k) if *k == kw)
    }

    /// True when this is the given operator.
    #[inline]
    pub fn is_operator(&self, op: Op) -> bool {
        matches!(self, NodeKind::Operator(o) if *o == op)
    }

    /// True when this is the given delimiter.
    #[inline]
    pub fn is_delimiter(&self, delim: Delim) -> bool {
        matches!(self, NodeKind::Delimiter(d) if *d == delim)
    }

    /// Symbol index of an `Identifier` or `Literal`.
    #[inline]
    pub fn sym(&self) -> Option<SymId> {
        match self {
            NodeKind::Identifier(id) | NodeKind::Literal(id) => Some(*id),
            _ => None,
        }
    }

    /// Whether a token with this kind can open a statement.
    pub fn starts_statement(&self) -> bool {
        match self {
            NodeKind::Keyword(kw) => matches!(
                kw,
                Keyword::VarDeclaration
                    | Keyword::If
                    | Keyword::While
                    | Keyword::WhileCondition
                    | Keyword::Return
                    | Keyword::FuncCall
            ),
            NodeKind::Identifier(_) => true,
            NodeKind::Operator(op) => matches!(op, Op::In | Op::Out),
            _ => false,
        }
    }

    /// Whether a token with this kind terminates a statement list opened
    /// under `stop`. Every section closer does, so a missing end keyword
    /// fails in the caller instead of swallowing the next section.
    pub fn stops_statements(&self, stop: Keyword) -> bool {
        let NodeKind::Keyword(kw) = self else {
            return false;
        };
        *kw == stop
            || matches!(
                kw,
                Keyword::Else
                    | Keyword::EndWhile
                    | Keyword::EndFormula
                    | Keyword::EndExperimental
                    | Keyword::EndResults
                    | Keyword::EndTheoretical
                    | Keyword::EndConclusion
                    | Keyword::EndAnnotation
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_names_round_trip() {
        let all = [
            Keyword::Lab,
            Keyword::Annotation,
            Keyword::EndAnnotation,
            Keyword::GoalLiteral,
            Keyword::Theoretical,
            Keyword::EndTheoretical,
            Keyword::Experimental,
            Keyword::EndExperimental,
            Keyword::Results,
            Keyword::EndResults,
            Keyword::Conclusion,
            Keyword::EndConclusion,
            Keyword::If,
            Keyword::Else,
            Keyword::Then,
            Keyword::While,
            Keyword::DoWhile,
            Keyword::WhileCondition,
            Keyword::EndWhile,
            Keyword::Formula,
            Keyword::EndFormula,
            Keyword::VarDeclaration,
            Keyword::LetAssignment,
            Keyword::FuncCall,
            Keyword::Return,
        ];
        for kw in all {
            assert_eq!(Keyword::from_name(kw.name()), Some(kw));
        }
        assert_eq!(Keyword::DoWhile.name(), "DO-WHILE");
        assert_eq!(Keyword::from_name("BANANA"), None);
    }

    #[test]
    fn test_operator_names_round_trip() {
        let all = [
            Op::Add,
            Op::Sub,
            Op::Mul,
            Op::Div,
            Op::Mod,
            Op::Pow,
            Op::Ln,
            Op::Sin,
            Op::Cos,
            Op::Tan,
            Op::Ctg,
            Op::Asin,
            Op::Acos,
            Op::Atan,
            Op::Actg,
            Op::Sqrt,
            Op::Eq,
            Op::Neq,
            Op::Below,
            Op::Above,
            Op::BelowEq,
            Op::AboveEq,
            Op::And,
            Op::Or,
            Op::Not,
            Op::In,
            Op::Out,
            Op::SetPixel,
            Op::Draw,
            Op::Assignment,
            Op::Connector,
        ];
        for op in all {
            assert_eq!(Op::from_name(op.name()), Some(op));
        }
        // loader alias
        assert_eq!(Op::from_name("NOT"), Some(Op::Not));
    }

    #[test]
    fn test_statement_start() {
        assert!(NodeKind::Keyword(Keyword::If).starts_statement());
        assert!(NodeKind::Keyword(Keyword::VarDeclaration).starts_statement());
        assert!(NodeKind::Identifier(SymId(0)).starts_statement());
        assert!(NodeKind::Operator(Op::Out).starts_statement());
        assert!(!NodeKind::Keyword(Keyword::EndWhile).starts_statement());
        assert!(!NodeKind::Operator(Op::Add).starts_statement());
        assert!(!NodeKind::Number(1.0).starts_statement());
    }

    #[test]
    fn test_statement_stop() {
        let end = NodeKind::Keyword(Keyword::EndExperimental);
        assert!(end.stops_statements(Keyword::EndExperimental));
        // any section closer stops the list, whatever was asked for
        assert!(end.stops_statements(Keyword::EndWhile));
        assert!(!NodeKind::Keyword(Keyword::If).stops_statements(Keyword::EndWhile));
        assert!(!NodeKind::Number(2.0).stops_statements(Keyword::EndWhile));
    }
}
