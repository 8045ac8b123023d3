//! The numeric evaluator: performs a single binary operation on two operands, and decides whether
//! a piece of text is a bare constant.

pub mod fmt;

use crate::{op::BinOpKind, tokenizer::{tokenize_significant, TokenKind}};
use rug::{ops::Pow, Assign, Float};

/// The number of bits of precision to use when computing values.
pub const PRECISION: u32 = 1 << 9;

/// Creates a [`Float`] with the given value.
pub fn float<T>(n: T) -> Float
where
    Float: Assign<T>,
{
    Float::with_val(PRECISION, n)
}

/// Parses a [`Float`] from a string slice containing a decimal number, optionally signed.
pub fn float_from_str(s: &str) -> Option<Float> {
    Float::parse(s).ok().map(float)
}

/// The reasons a single operation can fail to produce a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalError {
    /// The right operand of a division is zero.
    DivisionByZero,

    /// The result is NaN or infinite.
    NonFinite,
}

/// Evaluates `left op right`.
pub fn evaluate(op: BinOpKind, left: &Float, right: &Float) -> Result<Float, EvalError> {
    let result = match op {
        BinOpKind::Exp => float(left.pow(right)),
        BinOpKind::Mul => float(left * right),
        BinOpKind::Div => {
            if right.is_zero() {
                return Err(EvalError::DivisionByZero);
            }
            float(left / right)
        },
        BinOpKind::Add => float(left + right),
        BinOpKind::Sub => float(left - right),
    };

    if result.is_finite() {
        Ok(result)
    } else {
        Err(EvalError::NonFinite)
    }
}

/// Returns true if the given text is a bare constant: after stripping one pair of enclosing
/// parentheses and one leading sign, what remains is a single number.
///
/// Whitespace is ignored.
pub fn is_constant(text: &str) -> bool {
    let tokens = tokenize_significant(text);
    let mut tokens = tokens.as_slice();

    if let [first, inner @ .., last] = tokens {
        if first.kind == TokenKind::OpenParen && last.kind == TokenKind::CloseParen {
            tokens = inner;
        }
    }

    if let [first, rest @ ..] = tokens {
        if matches!(first.kind, TokenKind::Sub | TokenKind::Add) {
            tokens = rest;
        }
    }

    matches!(tokens, [token] if token.kind == TokenKind::Number)
}
