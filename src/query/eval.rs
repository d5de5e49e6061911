//! Generic two-stack expression evaluator.
//!
//! The evaluator knows nothing about the values it combines. A [`Domain`]
//! tells it how to classify tokens, how tightly operators bind and how to
//! apply an operator to two operands; the evaluator supplies the grouping
//! and precedence rules.
//!
//! Evaluation is a single pass over the tokens with an operand stack and an
//! operator stack (shunting-yard, reducing as it goes). Both stacks belong to
//! one [`Evaluator::evaluate`] call and are dropped when it returns.

use super::classify::TokenClass;
use thiserror::Error;

/// Value domain plugged into the [`Evaluator`].
pub trait Domain {
    /// Token type; operands and operator symbols share it.
    type Token: Clone;
    /// Failure raised by [`Domain::apply`].
    type Error;

    fn classify(&self, token: &Self::Token) -> TokenClass;

    /// Binding strength of an operator token (higher binds tighter).
    ///
    /// The default only separates high-precedence from low-precedence
    /// operators.
    fn precedence(&self, op: &Self::Token) -> u8 {
        match self.classify(op) {
            TokenClass::HighOp => 1,
            _ => 0,
        }
    }

    /// Combine `lhs op rhs` into a single operand.
    ///
    /// # Errors
    ///
    /// Whatever the domain considers a failed operation.
    fn apply(
        &self,
        op: &Self::Token,
        lhs: Self::Token,
        rhs: Self::Token,
    ) -> Result<Self::Token, Self::Error>;
}

/// Why an expression could not be evaluated.
///
/// Every variant except [`EvalError::Operation`] describes the shape of the
/// expression rather than the values in it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError<E> {
    #[error("expression is empty")]
    Empty,
    #[error("unrecognised token at position {position}")]
    UnknownToken { position: usize },
    #[error("operand at position {position} follows another operand")]
    UnexpectedOperand { position: usize },
    #[error("operator at position {position} has no left operand")]
    UnexpectedOperator { position: usize },
    #[error("'(' at position {position} follows an operand")]
    UnexpectedOpen { position: usize },
    #[error("')' at position {position} closes an incomplete group")]
    UnexpectedClose { position: usize },
    #[error("')' at position {position} has no matching '('")]
    UnbalancedClose { position: usize },
    #[error("expression ends with an operator")]
    Incomplete,
    #[error("'(' is never closed")]
    UnterminatedGroup,
    #[error("operator is missing an operand")]
    MissingOperand,
    #[error("{operands} operands and {operators} operators left after evaluation")]
    Leftover { operands: usize, operators: usize },
    #[error("{0}")]
    Operation(E),
}

impl<E> EvalError<E> {
    /// `true` for errors caused by the expression's shape, `false` for
    /// failures of an individual operation.
    #[must_use]
    pub const fn is_structural(&self) -> bool {
        !matches!(self, Self::Operation(_))
    }
}

enum Pending<T> {
    Operator(T),
    Group,
}

/// Operand and operator stacks for one evaluation.
struct Context<T> {
    operands: Vec<T>,
    operators: Vec<Pending<T>>,
}

impl<T> Context<T> {
    const fn new() -> Self {
        Self {
            operands: Vec::new(),
            operators: Vec::new(),
        }
    }
}

/// Operator-precedence evaluator over a [`Domain`].
#[derive(Debug, Clone, Default)]
pub struct Evaluator<D> {
    domain: D,
}

impl<D: Domain> Evaluator<D> {
    #[must_use]
    pub const fn new(domain: D) -> Self {
        Self { domain }
    }

    #[must_use]
    pub const fn domain(&self) -> &D {
        &self.domain
    }

    /// Check that `tokens` form a well-shaped expression without applying
    /// any operator.
    ///
    /// Operands and operators must alternate, starting and ending with an
    /// operand, and parentheses must balance. Any token sequence that passes
    /// reduces to exactly one operand.
    ///
    /// # Errors
    ///
    /// The first structural [`EvalError`] found, scanning left to right.
    pub fn check(&self, tokens: &[D::Token]) -> Result<(), EvalError<D::Error>> {
        if tokens.is_empty() {
            return Err(EvalError::Empty);
        }

        let mut expect_operand = true;
        let mut depth = 0usize;

        for (position, token) in tokens.iter().enumerate() {
            match self.domain.classify(token) {
                TokenClass::Unknown => return Err(EvalError::UnknownToken { position }),
                TokenClass::Operand => {
                    if !expect_operand {
                        return Err(EvalError::UnexpectedOperand { position });
                    }
                    expect_operand = false;
                }
                TokenClass::HighOp | TokenClass::LowOp => {
                    if expect_operand {
                        return Err(EvalError::UnexpectedOperator { position });
                    }
                    expect_operand = true;
                }
                TokenClass::Open => {
                    if !expect_operand {
                        return Err(EvalError::UnexpectedOpen { position });
                    }
                    depth += 1;
                }
                TokenClass::Close => {
                    if expect_operand {
                        return Err(EvalError::UnexpectedClose { position });
                    }
                    depth = depth
                        .checked_sub(1)
                        .ok_or(EvalError::UnbalancedClose { position })?;
                }
            }
        }

        if expect_operand {
            return Err(EvalError::Incomplete);
        }
        if depth > 0 {
            return Err(EvalError::UnterminatedGroup);
        }
        Ok(())
    }

    /// Evaluate `tokens` to a single operand.
    ///
    /// Operators are binary and left-associative; parentheses group. The
    /// shape is checked in full before any operator is applied, so a
    /// malformed expression is always reported as such, whatever its
    /// operands hold.
    ///
    /// # Errors
    ///
    /// Returns a structural [`EvalError`] when the tokens do not form a
    /// well-shaped expression, or [`EvalError::Operation`] when the domain
    /// rejects an operation.
    pub fn evaluate(&self, tokens: &[D::Token]) -> Result<D::Token, EvalError<D::Error>> {
        self.check(tokens)?;

        let mut ctx = Context::new();
        let mut expect_operand = true;

        for (position, token) in tokens.iter().enumerate() {
            match self.domain.classify(token) {
                TokenClass::Unknown => return Err(EvalError::UnknownToken { position }),
                TokenClass::Operand => {
                    if !expect_operand {
                        return Err(EvalError::UnexpectedOperand { position });
                    }
                    ctx.operands.push(token.clone());
                    expect_operand = false;
                }
                TokenClass::HighOp | TokenClass::LowOp => {
                    if expect_operand {
                        return Err(EvalError::UnexpectedOperator { position });
                    }
                    let power = self.domain.precedence(token);
                    while self.top_binds_at_least(&ctx, power) {
                        if let Some(Pending::Operator(op)) = ctx.operators.pop() {
                            self.reduce(&op, &mut ctx.operands)?;
                        }
                    }
                    ctx.operators.push(Pending::Operator(token.clone()));
                    expect_operand = true;
                }
                TokenClass::Open => {
                    if !expect_operand {
                        return Err(EvalError::UnexpectedOpen { position });
                    }
                    ctx.operators.push(Pending::Group);
                }
                TokenClass::Close => {
                    if expect_operand {
                        return Err(EvalError::UnexpectedClose { position });
                    }
                    loop {
                        match ctx.operators.pop() {
                            Some(Pending::Group) => break,
                            Some(Pending::Operator(op)) => self.reduce(&op, &mut ctx.operands)?,
                            None => return Err(EvalError::UnbalancedClose { position }),
                        }
                    }
                }
            }
        }

        if expect_operand {
            return Err(EvalError::Incomplete);
        }

        while let Some(pending) = ctx.operators.pop() {
            match pending {
                Pending::Group => return Err(EvalError::UnterminatedGroup),
                Pending::Operator(op) => self.reduce(&op, &mut ctx.operands)?,
            }
        }

        if ctx.operands.len() != 1 {
            return Err(EvalError::Leftover {
                operands: ctx.operands.len(),
                operators: ctx.operators.len(),
            });
        }
        ctx.operands.pop().ok_or(EvalError::Leftover {
            operands: 0,
            operators: 0,
        })
    }

    fn top_binds_at_least(&self, ctx: &Context<D::Token>, power: u8) -> bool {
        match ctx.operators.last() {
            Some(Pending::Operator(top)) => self.domain.precedence(top) >= power,
            _ => false,
        }
    }

    /// Pop two operands, combine them with `op` and push the result.
    fn reduce(
        &self,
        op: &D::Token,
        operands: &mut Vec<D::Token>,
    ) -> Result<(), EvalError<D::Error>> {
        let (Some(rhs), Some(lhs)) = (operands.pop(), operands.pop()) else {
            return Err(EvalError::MissingOperand);
        };
        let result = self
            .domain
            .apply(op, lhs, rhs)
            .map_err(EvalError::Operation)?;
        operands.push(result);
        Ok(())
    }
}
