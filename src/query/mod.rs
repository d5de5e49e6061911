//! Record query language.
//!
//! Expressions are infix over field names, literals and the operators
//! `* / + - < <= > >= == != & |`, with parentheses for grouping:
//!
//! ```text
//! status == open & opened_on > "12 Jun 2016"
//! (order + 1) * 2 == 8
//! crash == message
//! ```
//!
//! The pipeline is [`token`] → [`substitute`] → [`eval`] (with [`classify`]
//! and [`resolve`] supplying the query domain) → [`filter`].

pub mod classify;
pub mod eval;
pub mod filter;
pub mod resolve;
pub mod substitute;
pub mod token;

pub use classify::{Operator, TokenClass, classify};
pub use eval::{Domain, EvalError, Evaluator};
pub use filter::{Query, QueryError, eval_str, filter};
pub use resolve::{OperationError, QueryDomain, resolve};
pub use substitute::{FIELD_NAMES, FieldSource, substitute};
pub use token::{Expression, Token, TokenizeError, tokenize};
