//! Operand typing and binary operations.
//!
//! Operands are untyped strings. Each operation decides how to read its two
//! operands, trying in order:
//!
//! 1. dates, when both parse as dates and at least one looks calendrical,
//!    compared as epoch seconds;
//! 2. 64-bit integers, decimal or `0x`-prefixed hexadecimal;
//! 3. plain strings, where `==` is a substring test.

use super::classify::{Operator, TokenClass, classify};
use super::eval::Domain;
use super::token::Token;
use crate::util::date::parse_date_on;
use chrono::{Local, NaiveDate};
use thiserror::Error;
use tracing::trace;

/// Failure of a single numeric operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OperationError {
    #[error("division by zero")]
    DivisionByZero,
    #[error("integer overflow in '{lhs} {op} {rhs}'")]
    Overflow { op: Operator, lhs: i64, rhs: i64 },
    #[error("'{0}' is not an operator")]
    UnsupportedOperator(String),
}

/// How a pair of operands was read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interpretation {
    Date,
    Integer,
    Text,
}

/// Parse an operand as a 64-bit integer.
///
/// `0x`/`0X` selects hexadecimal; the full 64-bit range is accepted and
/// reinterpreted as signed, so record GUIDs compare consistently. Anything
/// else is read as decimal with an optional sign.
#[must_use]
pub fn parse_integer(text: &str) -> Option<i64> {
    let hex = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"));
    match hex {
        Some(digits) if !digits.is_empty() && !digits.starts_with(['+', '-']) => {
            u64::from_str_radix(digits, 16)
                .ok()
                .map(|value| i64::from_ne_bytes(value.to_ne_bytes()))
        }
        Some(_) => None,
        None => text.parse().ok(),
    }
}

/// A string looks calendrical when some character after the first is not a
/// hex digit. Plain numbers and GUIDs never take the date path.
fn looks_calendrical(text: &str) -> bool {
    text.chars().skip(1).any(|c| !c.is_ascii_hexdigit())
}

fn as_dates(lhs: &str, rhs: &str, today: NaiveDate) -> Option<(i64, i64)> {
    if !looks_calendrical(lhs) && !looks_calendrical(rhs) {
        return None;
    }
    let lhs = parse_date_on(lhs, true, today).ok()?;
    let rhs = parse_date_on(rhs, true, today).ok()?;
    Some((lhs.timestamp(), rhs.timestamp()))
}

fn interpret(lhs: &str, rhs: &str, today: NaiveDate) -> (Interpretation, Option<(i64, i64)>) {
    if let Some(pair) = as_dates(lhs, rhs, today) {
        return (Interpretation::Date, Some(pair));
    }
    if let (Some(l), Some(r)) = (parse_integer(lhs), parse_integer(rhs)) {
        return (Interpretation::Integer, Some((l, r)));
    }
    (Interpretation::Text, None)
}

/// Apply `op` to two integers.
///
/// # Errors
///
/// [`OperationError::DivisionByZero`] and [`OperationError::Overflow`].
pub fn apply_numeric(op: Operator, lhs: i64, rhs: i64) -> Result<i64, OperationError> {
    let overflow = || OperationError::Overflow { op, lhs, rhs };
    let value = match op {
        Operator::Add => lhs.checked_add(rhs).ok_or_else(overflow)?,
        Operator::Sub => lhs.checked_sub(rhs).ok_or_else(overflow)?,
        Operator::Mul => lhs.checked_mul(rhs).ok_or_else(overflow)?,
        Operator::Div if rhs == 0 => return Err(OperationError::DivisionByZero),
        Operator::Div => lhs.checked_div(rhs).ok_or_else(overflow)?,
        Operator::Lt => i64::from(lhs < rhs),
        Operator::Le => i64::from(lhs <= rhs),
        Operator::Gt => i64::from(lhs > rhs),
        Operator::Ge => i64::from(lhs >= rhs),
        Operator::Eq => i64::from(lhs == rhs),
        Operator::Ne => i64::from(lhs != rhs),
        Operator::And => i64::from(lhs != 0 && rhs != 0),
        Operator::Or => i64::from(lhs != 0 || rhs != 0),
    };
    Ok(value)
}

/// String semantics: `==` asks whether `lhs` occurs in `rhs`.
fn apply_text(op: Operator, lhs: &str, rhs: &str) -> bool {
    match op {
        Operator::Eq => rhs.contains(lhs),
        Operator::Ne => !rhs.contains(lhs),
        _ => false,
    }
}

/// Evaluate `lhs op rhs`, reading dates relative to `today`.
///
/// # Errors
///
/// Returns an [`OperationError`] when the integer operation fails.
pub fn resolve_on(
    op: Operator,
    lhs: &str,
    rhs: &str,
    today: NaiveDate,
) -> Result<String, OperationError> {
    let (interpretation, numbers) = interpret(lhs, rhs, today);
    trace!(?interpretation, %op, lhs, rhs, "resolving operation");

    match numbers {
        Some((l, r)) => apply_numeric(op, l, r).map(|value| value.to_string()),
        None => Ok(if apply_text(op, lhs, rhs) { "1" } else { "0" }.to_string()),
    }
}

/// Evaluate `lhs op rhs` relative to the current local date.
///
/// # Errors
///
/// See [`resolve_on`].
pub fn resolve(op: Operator, lhs: &str, rhs: &str) -> Result<String, OperationError> {
    resolve_on(op, lhs, rhs, Local::now().date_naive())
}

/// The query language's value domain: untyped strings resolved per
/// operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryDomain {
    today: NaiveDate,
}

impl QueryDomain {
    #[must_use]
    pub const fn on(today: NaiveDate) -> Self {
        Self { today }
    }

    #[must_use]
    pub const fn today(&self) -> NaiveDate {
        self.today
    }
}

impl Default for QueryDomain {
    fn default() -> Self {
        Self::on(Local::now().date_naive())
    }
}

fn operator_of(token: &Token) -> Option<Operator> {
    match token {
        Token::Bare(text) => Operator::from_symbol(text),
        Token::Literal(_) => None,
    }
}

impl Domain for QueryDomain {
    type Token = Token;
    type Error = OperationError;

    fn classify(&self, token: &Token) -> TokenClass {
        classify(token)
    }

    fn precedence(&self, op: &Token) -> u8 {
        operator_of(op).map_or(0, Operator::precedence)
    }

    fn apply(&self, op: &Token, lhs: Token, rhs: Token) -> Result<Token, OperationError> {
        let op = operator_of(op).ok_or_else(|| OperationError::UnsupportedOperator(op.to_string()))?;
        resolve_on(op, lhs.text(), rhs.text(), self.today).map(Token::Literal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::init_test_logging;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).expect("valid date")
    }

    fn run(op: Operator, lhs: &str, rhs: &str) -> Result<String, OperationError> {
        resolve_on(op, lhs, rhs, today())
    }

    #[test]
    fn test_parse_integer() {
        init_test_logging();
        assert_eq!(parse_integer("42"), Some(42));
        assert_eq!(parse_integer("-7"), Some(-7));
        assert_eq!(parse_integer("+7"), Some(7));
        assert_eq!(parse_integer("0x1f"), Some(31));
        assert_eq!(parse_integer("0X1F"), Some(31));
        assert_eq!(parse_integer("0xffffffffffffffff"), Some(-1));
        assert_eq!(parse_integer("0x"), None);
        assert_eq!(parse_integer("0x-1"), None);
        assert_eq!(parse_integer(""), None);
        assert_eq!(parse_integer("open"), None);
    }

    #[test]
    fn test_integer_arithmetic() {
        init_test_logging();
        assert_eq!(run(Operator::Add, "5", "3").as_deref(), Ok("8"));
        assert_eq!(run(Operator::Sub, "5", "8").as_deref(), Ok("-3"));
        assert_eq!(run(Operator::Mul, "8", "2").as_deref(), Ok("16"));
        assert_eq!(run(Operator::Div, "7", "2").as_deref(), Ok("3"));
        assert_eq!(run(Operator::Add, "0x10", "1").as_deref(), Ok("17"));
    }

    #[test]
    fn test_comparisons_and_logic() {
        init_test_logging();
        assert_eq!(run(Operator::Ne, "5", "3").as_deref(), Ok("1"));
        assert_eq!(run(Operator::Eq, "5", "3").as_deref(), Ok("0"));
        assert_eq!(run(Operator::Le, "3", "3").as_deref(), Ok("1"));
        assert_eq!(run(Operator::Gt, "3", "4").as_deref(), Ok("0"));
        assert_eq!(run(Operator::And, "1", "0").as_deref(), Ok("0"));
        assert_eq!(run(Operator::And, "2", "-1").as_deref(), Ok("1"));
        assert_eq!(run(Operator::Or, "0", "0").as_deref(), Ok("0"));
        assert_eq!(run(Operator::Or, "0", "5").as_deref(), Ok("1"));
    }

    #[test]
    fn test_arithmetic_errors() {
        init_test_logging();
        assert_eq!(run(Operator::Div, "4", "0"), Err(OperationError::DivisionByZero));
        assert!(matches!(
            run(Operator::Mul, "0x7fffffffffffffff", "2"),
            Err(OperationError::Overflow { op: Operator::Mul, .. })
        ));
        assert!(matches!(
            run(Operator::Div, &i64::MIN.to_string(), "-1"),
            Err(OperationError::Overflow { .. })
        ));
    }

    #[test]
    fn test_string_matching_is_left_in_right() {
        init_test_logging();
        assert_eq!(run(Operator::Eq, "crash", "startup crash on boot").as_deref(), Ok("1"));
        assert_eq!(run(Operator::Eq, "startup crash on boot", "crash").as_deref(), Ok("0"));
        assert_eq!(run(Operator::Ne, "crash", "all good").as_deref(), Ok("1"));
        assert_eq!(run(Operator::Eq, "Crash", "crash").as_deref(), Ok("0"));
        assert_eq!(run(Operator::Eq, "", "").as_deref(), Ok("1"));
        assert_eq!(run(Operator::Lt, "abc", "abd").as_deref(), Ok("0"));
        assert_eq!(run(Operator::Add, "open", "closed").as_deref(), Ok("0"));
    }

    #[test]
    fn test_dates_compare_calendrically() {
        init_test_logging();
        assert_eq!(run(Operator::Eq, "12 Jun 2016", "June 12, 2016").as_deref(), Ok("1"));
        assert_eq!(run(Operator::Eq, "12-06-2016", "12/6/2016").as_deref(), Ok("1"));
        assert_eq!(
            run(Operator::Gt, "Sun Jun 12 10:30:00 2016", "12 Jun 2016").as_deref(),
            Ok("1")
        );
        assert_eq!(run(Operator::Lt, "Jan 2016", "Feb 2016").as_deref(), Ok("1"));
        // One day apart, in seconds.
        assert_eq!(run(Operator::Sub, "13 Jun 2016", "12 Jun 2016").as_deref(), Ok("86400"));
    }

    #[test]
    fn test_plain_numbers_skip_the_date_path() {
        init_test_logging();
        // Both would parse as dates (day 12, year 2016) but neither looks
        // calendrical, so they stay integers.
        assert_eq!(run(Operator::Sub, "2016", "12").as_deref(), Ok("2004"));
        assert_eq!(run(Operator::Eq, "0xabc", "2748").as_deref(), Ok("1"));
    }

    #[test]
    fn test_interpretation_choice() {
        init_test_logging();
        assert_eq!(interpret("June 12", "Jun 13", today()).0, Interpretation::Date);
        assert_eq!(interpret("12", "13", today()).0, Interpretation::Integer);
        assert_eq!(interpret("open", "open", today()).0, Interpretation::Text);
        assert_eq!(interpret("12 Foo", "12", today()).0, Interpretation::Text);
    }

    #[test]
    fn test_domain_results_are_literals() {
        init_test_logging();
        let domain = QueryDomain::on(today());
        let result = domain
            .apply(&Token::bare("+"), Token::bare("2"), Token::literal("3"))
            .expect("apply");
        assert_eq!(result, Token::literal("5"));
        assert!(matches!(
            domain.apply(&Token::literal("+"), Token::bare("2"), Token::bare("3")),
            Err(OperationError::UnsupportedOperator(_))
        ));
        assert!(domain.precedence(&Token::bare("*")) > domain.precedence(&Token::bare("|")));
    }
}
