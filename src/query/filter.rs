//! Query driver: tokenize once, evaluate per record.

use super::eval::{EvalError, Evaluator};
use super::resolve::{OperationError, QueryDomain};
use super::substitute::{FieldSource, substitute};
use super::token::{Expression, Token, TokenizeError, tokenize};
use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, warn};

/// Why a query could not be run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("query expression is empty")]
    EmptyExpression,
    #[error("there are no records to query")]
    NoRecords,
    #[error("cannot read query '{expr}': {source}")]
    Tokenize {
        expr: String,
        #[source]
        source: TokenizeError,
    },
    #[error("syntax error in query '{expr}': {source}")]
    Syntax {
        expr: String,
        #[source]
        source: EvalError<OperationError>,
    },
    #[error("cannot evaluate '{expr}': {source}")]
    Evaluation {
        expr: String,
        #[source]
        source: EvalError<OperationError>,
    },
}

/// A parsed query, ready to be matched against records.
#[derive(Debug, Clone)]
pub struct Query {
    source: String,
    template: Expression,
    evaluator: Evaluator<QueryDomain>,
}

impl Query {
    /// Parse `expr` with dates read relative to the current local date.
    ///
    /// # Errors
    ///
    /// [`QueryError::EmptyExpression`] for blank input,
    /// [`QueryError::Tokenize`] when the expression cannot be tokenized and
    /// [`QueryError::Syntax`] when the tokens are not a well-shaped
    /// expression.
    pub fn parse(expr: &str) -> Result<Self, QueryError> {
        Self::with_domain(expr, QueryDomain::default())
    }

    /// Parse `expr` with dates read relative to `today`.
    ///
    /// # Errors
    ///
    /// See [`Query::parse`].
    pub fn parse_on(expr: &str, today: NaiveDate) -> Result<Self, QueryError> {
        Self::with_domain(expr, QueryDomain::on(today))
    }

    fn with_domain(expr: &str, domain: QueryDomain) -> Result<Self, QueryError> {
        if expr.trim().is_empty() {
            return Err(QueryError::EmptyExpression);
        }
        let template = tokenize(expr).map_err(|source| QueryError::Tokenize {
            expr: expr.to_string(),
            source,
        })?;
        let evaluator = Evaluator::new(domain);
        evaluator
            .check(template.tokens())
            .map_err(|source| QueryError::Syntax {
                expr: expr.to_string(),
                source,
            })?;
        debug!(tokens = template.len(), expr, "parsed query");
        Ok(Self {
            source: expr.to_string(),
            template,
            evaluator,
        })
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub const fn expression(&self) -> &Expression {
        &self.template
    }

    /// Evaluate the query against one record and return the raw result.
    ///
    /// # Errors
    ///
    /// [`QueryError::Syntax`] for malformed expressions and
    /// [`QueryError::Evaluation`] for failed operations.
    pub fn evaluate<R: FieldSource + ?Sized>(&self, record: &R) -> Result<String, QueryError> {
        let expr = substitute(&self.template, record);
        self.evaluator
            .evaluate(expr.tokens())
            .map(Token::into_text)
            .map_err(|source| self.wrap(source))
    }

    /// `true` when the query evaluates to `1` for `record`.
    ///
    /// # Errors
    ///
    /// See [`Query::evaluate`].
    pub fn matches<R: FieldSource + ?Sized>(&self, record: &R) -> Result<bool, QueryError> {
        self.evaluate(record).map(|value| value == "1")
    }

    /// Records the query selects, in input order.
    ///
    /// A failed operation (division by zero, overflow) excludes only that
    /// record. A malformed expression aborts the whole query.
    ///
    /// # Errors
    ///
    /// [`QueryError::Syntax`].
    pub fn select<'a, R: FieldSource>(&self, records: &'a [R]) -> Result<Vec<&'a R>, QueryError> {
        let mut selected = Vec::new();
        for (index, record) in records.iter().enumerate() {
            match self.matches(record) {
                Ok(true) => selected.push(record),
                Ok(false) => {}
                Err(QueryError::Evaluation { source, .. }) => {
                    warn!(index, error = %source, query = %self.source, "record excluded");
                }
                Err(err) => return Err(err),
            }
        }
        debug!(
            matched = selected.len(),
            total = records.len(),
            query = %self.source,
            "query complete"
        );
        Ok(selected)
    }

    fn wrap(&self, source: EvalError<OperationError>) -> QueryError {
        let expr = self.source.clone();
        if source.is_structural() {
            QueryError::Syntax { expr, source }
        } else {
            QueryError::Evaluation { expr, source }
        }
    }
}

/// Select the records for which `expr` evaluates to `1`.
///
/// # Errors
///
/// [`QueryError::EmptyExpression`], [`QueryError::NoRecords`],
/// [`QueryError::Tokenize`] or [`QueryError::Syntax`].
pub fn filter<'a, R: FieldSource>(records: &'a [R], expr: &str) -> Result<Vec<&'a R>, QueryError> {
    if expr.trim().is_empty() {
        return Err(QueryError::EmptyExpression);
    }
    if records.is_empty() {
        return Err(QueryError::NoRecords);
    }
    Query::parse(expr)?.select(records)
}

/// Evaluate an expression that references no record.
///
/// # Errors
///
/// Any [`QueryError`] except [`QueryError::NoRecords`].
pub fn eval_str(expr: &str) -> Result<String, QueryError> {
    let empty: std::collections::HashMap<String, String> = std::collections::HashMap::new();
    Query::parse(expr)?.evaluate(&empty)
}
