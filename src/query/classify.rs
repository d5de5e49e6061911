//! Token classification and the operator table.

use super::token::Token;
use std::fmt;

/// Role of a token inside an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenClass {
    /// `*` and `/`
    HighOp,
    /// `+ - < <= > >= == != & |`
    LowOp,
    Open,
    Close,
    Operand,
    /// Starts like an operator but is not one; aborts evaluation.
    Unknown,
}

/// Binary operators understood by the query language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Mul,
    Div,
    Add,
    Sub,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
    And,
    Or,
}

impl Operator {
    #[must_use]
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        let op = match symbol {
            "*" => Self::Mul,
            "/" => Self::Div,
            "+" => Self::Add,
            "-" => Self::Sub,
            "<" => Self::Lt,
            "<=" => Self::Le,
            ">" => Self::Gt,
            ">=" => Self::Ge,
            "==" => Self::Eq,
            "!=" => Self::Ne,
            "&" => Self::And,
            "|" => Self::Or,
            _ => return None,
        };
        Some(op)
    }

    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Mul => "*",
            Self::Div => "/",
            Self::Add => "+",
            Self::Sub => "-",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::And => "&",
            Self::Or => "|",
        }
    }

    /// Binding strength; higher binds tighter. All operators are
    /// left-associative.
    #[must_use]
    pub const fn precedence(self) -> u8 {
        match self {
            Self::Mul | Self::Div => 5,
            Self::Add | Self::Sub => 4,
            Self::Lt | Self::Le | Self::Gt | Self::Ge => 3,
            Self::Eq | Self::Ne => 2,
            Self::And => 1,
            Self::Or => 0,
        }
    }

    #[must_use]
    pub const fn class(self) -> TokenClass {
        match self {
            Self::Mul | Self::Div => TokenClass::HighOp,
            _ => TokenClass::LowOp,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

const fn is_operator_char(c: char) -> bool {
    matches!(
        c,
        '(' | ')' | '+' | '-' | '*' | '/' | '&' | '|' | '<' | '>' | '=' | '!'
    )
}

/// Decide the role of `token`.
///
/// Literal tokens are always operands. Bare tokens are judged by their text:
/// known operators and parentheses by symbol, anything that starts with an
/// operator character but is not a known symbol is [`TokenClass::Unknown`],
/// and everything else is an operand.
#[must_use]
pub fn classify(token: &Token) -> TokenClass {
    let Token::Bare(text) = token else {
        return TokenClass::Operand;
    };

    match text.as_str() {
        "(" => TokenClass::Open,
        ")" => TokenClass::Close,
        symbol => match Operator::from_symbol(symbol) {
            Some(op) => op.class(),
            None if symbol.starts_with(is_operator_char) => TokenClass::Unknown,
            None => TokenClass::Operand,
        },
    }
}
