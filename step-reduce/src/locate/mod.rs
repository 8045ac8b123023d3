//! Finds the single next atomic operation to reduce in an expression.
//!
//! Rules are tried in this order, and the first that applies wins:
//!
//! 1. The most deeply nested parenthesis group is selected (leftmost among equally deep groups).
//!    A group containing only a constant is itself the atomic operation: its parentheses are
//!    dropped. Otherwise the remaining rules run on the group's interior.
//! 2. Two adjacent minus signs in front of an operand cancel out.
//! 3. Exponentiation (`^` chains are reduced from the right).
//! 4. Multiplication and division, leftmost first.
//! 5. Addition and subtraction, leftmost first. A `-` that is the sign of an operand is never
//!    mistaken for a subtraction.
//! 6. Otherwise the text is a bare constant and there is nothing left to do.
//!
//! A negative constant group directly followed by `^`, such as the `(-2)` in `(-2)^2`, is kept as
//! the base of that power, since dropping its parentheses would turn it into `-(2^2)`.
//!
//! All spans are byte offsets into the full expression text, no matter how deeply the operation
//! is nested.

pub mod operand;

use crate::{
    error::{kind, Error},
    op::{BinOpKind, Precedence},
    tokenizer::{tokenize_significant, Token, TokenKind},
};
use operand::{find_double_negative, is_unary_sign, items, left_operand, right_operand, Item, Operand};
use std::ops::Range;

/// What kind of atomic reduction was located.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReductionKind {
    /// A binary operation on two operands, evaluated numerically.
    Operation {
        op: BinOpKind,
        left: Operand,
        right: Operand,
    },

    /// Two minus signs in front of an operand. The signs are dropped (or replaced by `+`) without
    /// evaluating anything.
    DoubleNegative {
        /// The operand the signs apply to.
        operand: Range<usize>,
    },

    /// A parenthesized constant, whose parentheses are dropped.
    Parenthesized {
        /// The constant inside the parentheses.
        inner: Range<usize>,
    },

    /// The text is a single, possibly negative, constant. Nothing is left to reduce.
    Constant,
}

/// The next atomic operation in an expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located {
    /// The kind of reduction to perform.
    pub kind: ReductionKind,

    /// The region of the expression that the reduction replaces.
    pub span: Range<usize>,
}

impl Located {
    /// Returns the text of the atomic operation in the given expression.
    pub fn text<'a>(&self, expr: &'a str) -> &'a str {
        &expr[self.span.clone()]
    }

    /// Returns true if this is a double negative collapse.
    pub fn is_double_negative(&self) -> bool {
        matches!(self.kind, ReductionKind::DoubleNegative { .. })
    }

    /// Returns true if there is nothing left to reduce.
    pub fn is_constant(&self) -> bool {
        matches!(self.kind, ReductionKind::Constant)
    }
}

/// A parenthesis group found while scanning for the innermost one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NestingFrame {
    /// How many groups enclose this one.
    pub level: usize,

    /// Token index of the opening parenthesis.
    pub start: usize,

    /// Token index of the closing parenthesis.
    pub end: usize,
}

/// Pairs every parenthesis in the token stream, returning the groups ordered from most to least
/// deeply nested, and left to right among groups at the same depth.
pub fn nesting_frames(tokens: &[Token]) -> Result<Vec<NestingFrame>, Error> {
    let mut open = Vec::new();
    let mut frames = Vec::new();

    for (i, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::OpenParen => open.push(i),
            TokenKind::CloseParen => {
                let start = open.pop().ok_or_else(|| {
                    Error::new(vec![token.span.clone()], kind::UnclosedParenthesis { opening: false })
                })?;
                frames.push(NestingFrame { level: open.len(), start, end: i });
            },
            _ => {},
        }
    }

    if let Some(&start) = open.last() {
        return Err(Error::new(vec![tokens[start].span.clone()], kind::UnclosedParenthesis { opening: true }));
    }

    // stable sort keeps the left-to-right order of groups at the same depth
    frames.sort_by(|a, b| b.level.cmp(&a.level).then(a.start.cmp(&b.start)));
    Ok(frames)
}

/// Returns the constant inside a parenthesis group, as `(negative, number token)`, if the group
/// contains only a constant.
fn constant_group<'a, 'source>(
    tokens: &'a [Token<'source>],
    frame: &NestingFrame,
) -> Option<(bool, &'a Token<'source>)> {
    match &tokens[frame.start + 1..frame.end] {
        [number] if number.kind == TokenKind::Number => Some((false, number)),
        [sign, number] if sign.kind == TokenKind::Sub && number.kind == TokenKind::Number => Some((true, number)),
        _ => None,
    }
}

/// Locates the next atomic operation in the given expression text.
pub fn locate(expr: &str) -> Result<Located, Error> {
    let tokens = tokenize_significant(expr);
    let malformed = || Error::new(vec![0..expr.len()], kind::MalformedExpression);

    for frame in nesting_frames(&tokens)? {
        let open = &tokens[frame.start];
        let close = &tokens[frame.end];

        if let Some((negative, number)) = constant_group(&tokens, &frame) {
            let powered = tokens.get(frame.end + 1).is_some_and(|t| t.kind == TokenKind::Exp);
            if negative && powered {
                tracing::trace!(group = ?(open.span.start..close.span.end), "keeping negative base");
                continue;
            }

            let inner_start = if negative { number.span.start - 1 } else { number.span.start };
            return Ok(Located {
                kind: ReductionKind::Parenthesized { inner: inner_start..number.span.end },
                span: open.span.start..close.span.end,
            });
        }

        tracing::trace!(level = frame.level, group = ?(open.span.start..close.span.end), "innermost group");
        return match locate_segment(&tokens[frame.start + 1..frame.end]) {
            Some(located) if !located.is_constant() => Ok(located),
            _ => Err(Error::new(vec![open.span.start..close.span.end], kind::MalformedExpression)),
        };
    }

    locate_segment(&tokens).ok_or_else(malformed)
}

/// Applies rules 2 to 6 to a segment that contains no parentheses, other than parenthesized
/// constants kept as the bases of powers.
fn locate_segment(tokens: &[Token]) -> Option<Located> {
    let items = items(tokens)?;

    if let Some(k) = find_double_negative(&items) {
        let operand = items[k + 2].span();
        return Some(Located {
            kind: ReductionKind::DoubleNegative { operand: operand.clone() },
            span: items[k].span().start..operand.end,
        });
    }

    if let Some(located) = locate_power(&items) {
        return Some(located);
    }

    for precedence in [Precedence::Factor, Precedence::Term] {
        let op_index = items.iter().enumerate().position(|(k, item)| {
            item.op().is_some_and(|op| op.precedence() == precedence) && !is_unary_sign(&items, k)
        });
        if let Some(k) = op_index {
            return binary_operation(&items, k, true);
        }
    }

    match items.as_slice() {
        [operand] | [Item::Op { op: BinOpKind::Sub, .. }, operand] if operand.is_operand() => Some(Located {
            kind: ReductionKind::Constant,
            span: items[0].span().start..operand.span().end,
        }),
        _ => None,
    }
}

/// Finds the power to reduce: the first `^` in the segment, following a chain such as `a^b^c` to
/// its last link.
fn locate_power(items: &[Item]) -> Option<Located> {
    let mut k = items.iter().position(|item| item.op() == Some(BinOpKind::Exp))?;
    loop {
        let (_, right_end) = right_operand(items, k)?;
        match items.get(right_end + 1) {
            Some(item) if item.op() == Some(BinOpKind::Exp) => k = right_end + 1,
            _ => break,
        }
    }

    // the base never takes a sign: `-3^2` is `-(3^2)`
    binary_operation(items, k, false)
}

/// Builds the located operation for the operator at index `k`.
fn binary_operation(items: &[Item], k: usize, absorb_sign: bool) -> Option<Located> {
    let op = items[k].op()?;
    let (left, _) = left_operand(items, k, absorb_sign)?;
    let (right, _) = right_operand(items, k)?;
    Some(Located {
        span: left.span.start..right.span.end,
        kind: ReductionKind::Operation { op, left, right },
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    /// Returns the text of the located operation.
    fn next(expr: &str) -> &str {
        locate(expr).unwrap().text(expr)
    }

    fn op_of(expr: &str) -> BinOpKind {
        match locate(expr).unwrap().kind {
            ReductionKind::Operation { op, .. } => op,
            kind => panic!("expected an operation, found {:?}", kind),
        }
    }

    #[test]
    fn precedence_order() {
        assert_eq!(next("2+3*4"), "3*4");
        assert_eq!(next("2*3+4"), "2*3");
        assert_eq!(next("2+3^2*4"), "3^2");
        assert_eq!(next("8/4*2"), "8/4");
        assert_eq!(next("8*4/2"), "8*4");
        assert_eq!(next("1-2+3"), "1-2");
        assert_eq!(next("1+2-3"), "1+2");
    }

    #[test]
    fn innermost_parenthesis_first() {
        assert_eq!(next("(3+(2+3-3^4))*(3+2)"), "3^4");
        assert_eq!(next("(3+(2+3-81))*(3+2)"), "2+3");
        assert_eq!(next("(1+2)*(3+4)"), "1+2");
        assert_eq!(next("(1+2)*((3+4))"), "3+4");
    }

    #[test]
    fn absolute_offsets() {
        let located = locate("10*(2+(7-1))").unwrap();
        assert_eq!(located.span, 7..10);
        assert_eq!(op_of("10*(2+(7-1))"), BinOpKind::Sub);
    }

    #[test]
    fn constant_groups() {
        let expr = "(3+(-76))*5";
        let located = locate(expr).unwrap();
        assert_eq!(located.text(expr), "(-76)");
        assert_eq!(located.kind, ReductionKind::Parenthesized { inner: 4..7 });

        assert_eq!(next("(5)"), "(5)");
        assert_eq!(next("-(-2)"), "(-2)");
    }

    #[test]
    fn negative_base_is_kept() {
        assert_eq!(next("(-2)^2"), "(-2)^2");
        assert_eq!(next("1+(-2)^2"), "(-2)^2");
        assert_eq!(next("3*((-2)^3)"), "(-2)^3");
        assert_eq!(next("(2)^2"), "(2)");
    }

    #[test]
    fn negative_base_waits_for_exponent() {
        assert_eq!(next("(-2)^(1+1)"), "1+1");
        assert_eq!(next("(-2)^2^3"), "2^3");
    }

    #[test]
    fn double_negative() {
        let expr = "5--2";
        let located = locate(expr).unwrap();
        assert!(located.is_double_negative());
        assert_eq!(located.text(expr), "--2");
        assert_eq!(located.kind, ReductionKind::DoubleNegative { operand: 3..4 });

        assert_eq!(next("2*--3"), "--3");
        assert_eq!(next("---3"), "--3");
        assert_eq!(next("(--3)"), "--3");
    }

    #[test]
    fn power_chains_reduce_from_the_right() {
        assert_eq!(next("2^3^2"), "3^2");
        assert_eq!(next("2^-3^2"), "3^2");
        assert_eq!(next("2^3*4^5"), "2^3");
    }

    #[test]
    fn power_base_takes_no_sign() {
        assert_eq!(next("-3^2"), "3^2");
        assert_eq!(next("2^-2"), "2^-2");
    }

    #[test]
    fn unary_minus_is_not_subtraction() {
        assert_eq!(next("-3+4"), "-3+4");
        assert_eq!(next("-3-4"), "-3-4");
        assert_eq!(next("-2*3"), "-2*3");
        assert_eq!(next("5*-2"), "5*-2");
        assert_eq!(next("4+-10"), "4+-10");
        assert_eq!(next("5-2*3"), "2*3");
    }

    #[test]
    fn constants_are_terminal() {
        for expr in ["42", "-7", "0.5", "-365"] {
            let located = locate(expr).unwrap();
            assert!(located.is_constant(), "{expr}");
            assert_eq!(located.span, 0..expr.len());
        }
    }

    #[test]
    fn unbalanced() {
        assert!(locate("(1+2").unwrap_err().is::<kind::UnclosedParenthesis>());
        assert!(locate("1+2)").unwrap_err().is::<kind::UnclosedParenthesis>());
    }

    #[test]
    fn nesting_frame_order() {
        let tokens = tokenize_significant("(1+(2))*(3)");
        let frames = nesting_frames(&tokens).unwrap();
        let starts = frames.iter().map(|f| (f.level, f.start)).collect::<Vec<_>>();
        assert_eq!(starts, [(1, 3), (0, 0), (0, 8)]);
    }
}
