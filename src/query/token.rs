//! Query expression tokenizer.

use std::fmt;
use thiserror::Error;

/// One lexical unit of a query expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Token {
    /// Text taken verbatim from the expression. Its role (operator,
    /// parenthesis, operand) is decided by the classifier when needed.
    Bare(String),
    /// A quoted literal, a substituted field value or the result of a
    /// reduction. Always an operand, whatever its text.
    Literal(String),
}

impl Token {
    #[must_use]
    pub fn bare(text: impl Into<String>) -> Self {
        Self::Bare(text.into())
    }

    #[must_use]
    pub fn literal(text: impl Into<String>) -> Self {
        Self::Literal(text.into())
    }

    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Bare(text) | Self::Literal(text) => text,
        }
    }

    #[must_use]
    pub fn into_text(self) -> String {
        match self {
            Self::Bare(text) | Self::Literal(text) => text,
        }
    }

    #[must_use]
    pub const fn is_literal(&self) -> bool {
        matches!(self, Self::Literal(_))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bare(text) => f.write_str(text),
            Self::Literal(text) => write!(f, "{text:?}"),
        }
    }
}

/// An ordered token sequence, produced once per query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Expression {
    tokens: Vec<Token>,
}

impl Expression {
    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }
}

impl FromIterator<Token> for Expression {
    fn from_iter<I: IntoIterator<Item = Token>>(iter: I) -> Self {
        Self {
            tokens: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Expression {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, token) in self.tokens.iter().enumerate() {
            if index > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{token}")?;
        }
        Ok(())
    }
}

/// Tokenizer failure, with the byte offset of the offending character.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenizeError {
    #[error("unexpected character '{ch}' at offset {offset} (did you mean '{ch}='?)")]
    UnexpectedCharacter { ch: char, offset: usize },
    #[error("unterminated quote starting at offset {offset}")]
    UnterminatedQuote { offset: usize },
}

const fn is_separator(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

const fn ends_operand(c: char) -> bool {
    is_separator(c)
        || matches!(
            c,
            '(' | ')' | '+' | '-' | '*' | '/' | '&' | '|' | '<' | '>' | '=' | '!' | '"' | '\''
        )
}

/// Split a raw expression into tokens.
///
/// Operators and parentheses are single tokens (`<=`, `>=`, `==` and `!=`
/// included), whitespace separates, quotes delimit literals, and any other
/// run of characters becomes one operand.
///
/// # Errors
///
/// Returns [`TokenizeError::UnexpectedCharacter`] for a `=` or `!` that is
/// not followed by `=`, and [`TokenizeError::UnterminatedQuote`] when a
/// quoted literal never closes.
pub fn tokenize(input: &str) -> Result<Expression, TokenizeError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some((offset, ch)) = chars.next() {
        match ch {
            c if is_separator(c) => {}
            '(' | ')' | '+' | '-' | '*' | '/' | '&' | '|' => tokens.push(Token::Bare(ch.to_string())),
            '<' | '>' => {
                if chars.next_if(|&(_, next)| next == '=').is_some() {
                    tokens.push(Token::Bare(format!("{ch}=")));
                } else {
                    tokens.push(Token::Bare(ch.to_string()));
                }
            }
            '=' | '!' => {
                if chars.next_if(|&(_, next)| next == '=').is_none() {
                    return Err(TokenizeError::UnexpectedCharacter { ch, offset });
                }
                tokens.push(Token::Bare(format!("{ch}=")));
            }
            '"' | '\'' => {
                let mut literal = String::new();
                let mut closed = false;
                for (_, next) in chars.by_ref() {
                    if next == ch {
                        closed = true;
                        break;
                    }
                    literal.push(next);
                }
                if !closed {
                    return Err(TokenizeError::UnterminatedQuote { offset });
                }
                tokens.push(Token::Literal(literal));
            }
            _ => {
                let mut operand = String::from(ch);
                while let Some((_, next)) = chars.next_if(|&(_, next)| !ends_operand(next)) {
                    operand.push(next);
                }
                tokens.push(Token::Bare(operand));
            }
        }
    }

    Ok(Expression { tokens })
}
