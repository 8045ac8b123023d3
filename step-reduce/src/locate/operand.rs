//! Segment items and the operand-extraction helpers shared by every precedence rule.

use crate::{
    numeric::float_from_str,
    op::BinOpKind,
    tokenizer::{tokenize_significant, Token, TokenKind},
};
use rug::Float;
use std::ops::Range;

/// An operand of an atomic operation: a number, optionally signed, or a parenthesized constant
/// such as `(-2)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operand {
    /// The full extent of the operand, including its sign and parentheses.
    pub span: Range<usize>,

    /// The extent of the digits of the operand.
    pub literal: Range<usize>,

    /// Whether the operand's value is negative. A sign in front of a negative parenthesized
    /// constant cancels out.
    pub negative: bool,
}

impl Operand {
    /// Returns the value of the operand in the given expression text.
    pub fn value(&self, expr: &str) -> Option<Float> {
        let value = float_from_str(expr.get(self.literal.clone())?)?;
        Some(if self.negative { -value } else { value })
    }
}

/// An element of a parenthesis-free segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    /// A binary operator, or a `-` sign.
    Op {
        op: BinOpKind,
        span: Range<usize>,
    },

    /// A number, or a parenthesized constant.
    Operand {
        span: Range<usize>,
        literal: Range<usize>,
        negative: bool,
    },
}

impl Item {
    /// Returns the span of the item.
    pub fn span(&self) -> Range<usize> {
        match self {
            Self::Op { span, .. } | Self::Operand { span, .. } => span.clone(),
        }
    }

    /// Returns the operator of this item, if it is one.
    pub fn op(&self) -> Option<BinOpKind> {
        match self {
            Self::Op { op, .. } => Some(*op),
            Self::Operand { .. } => None,
        }
    }

    /// Returns true if the item is an operand.
    pub fn is_operand(&self) -> bool {
        matches!(self, Self::Operand { .. })
    }

    /// Returns true if the item is a parenthesized constant.
    pub fn is_grouped(&self) -> bool {
        matches!(self, Self::Operand { span, literal, .. } if span.start < literal.start && span.end > literal.end)
    }
}

/// Groups the given tokens into segment items. Parenthesized constants become single operands;
/// any other parenthesis makes the segment invalid, and [`None`] is returned.
pub fn items(tokens: &[Token]) -> Option<Vec<Item>> {
    let mut items = Vec::with_capacity(tokens.len());
    let mut i = 0;

    while i < tokens.len() {
        let token = &tokens[i];
        match token.kind {
            TokenKind::Number => {
                items.push(Item::Operand {
                    span: token.span.clone(),
                    literal: token.span.clone(),
                    negative: false,
                });
                i += 1;
            },
            TokenKind::OpenParen => {
                let (negative, number, close) = match tokens.get(i + 1..i + 4) {
                    Some([sign, number, close])
                        if sign.kind == TokenKind::Sub
                            && number.kind == TokenKind::Number
                            && close.kind == TokenKind::CloseParen => (true, number, close),
                    _ => match tokens.get(i + 1..i + 3) {
                        Some([number, close])
                            if number.kind == TokenKind::Number
                                && close.kind == TokenKind::CloseParen => (false, number, close),
                        _ => return None,
                    },
                };
                items.push(Item::Operand {
                    span: token.span.start..close.span.end,
                    literal: number.span.clone(),
                    negative,
                });
                i += if negative { 4 } else { 3 };
            },
            kind => {
                items.push(Item::Op { op: BinOpKind::from_token(kind)?, span: token.span.clone() });
                i += 1;
            },
        }
    }

    Some(items)
}

/// Returns true if the item at index `k` is a `-` acting as the sign of the operand after it,
/// rather than a subtraction: it starts the segment, or it follows another operator.
pub fn is_unary_sign(items: &[Item], k: usize) -> bool {
    items.get(k).and_then(Item::op) == Some(BinOpKind::Sub)
        && (k == 0 || items[k - 1].op().is_some())
}

/// Returns the index of the first of two adjacent `-` items that are immediately followed by an
/// operand.
pub fn find_double_negative(items: &[Item]) -> Option<usize> {
    items.windows(3).position(|window| {
        window[0].op() == Some(BinOpKind::Sub)
            && window[1].op() == Some(BinOpKind::Sub)
            && window[2].is_operand()
    })
}

/// Converts the operand item at index `k` into an [`Operand`], applying the `-` sign at
/// `sign`, if any.
fn to_operand(items: &[Item], k: usize, sign: Option<usize>) -> Option<Operand> {
    let Item::Operand { span, literal, negative } = items.get(k)? else {
        return None;
    };
    let start = sign.map_or(span.start, |s| items[s].span().start);
    Some(Operand {
        span: start..span.end,
        literal: literal.clone(),
        negative: *negative != sign.is_some(),
    })
}

/// Extracts the left operand of the operator at index `op`. If `absorb_sign` is set and the
/// operand is preceded by a unary `-`, the sign becomes part of the operand.
///
/// Returns the operand and the index of its first item.
pub fn left_operand(items: &[Item], op: usize, absorb_sign: bool) -> Option<(Operand, usize)> {
    let k = op.checked_sub(1)?;
    let sign = k
        .checked_sub(1)
        .filter(|&s| absorb_sign && is_unary_sign(items, s));
    Some((to_operand(items, k, sign)?, sign.unwrap_or(k)))
}

/// Extracts the right operand of the operator at index `op`, including a leading `-` if there is
/// one.
///
/// Returns the operand and the index of its last item.
pub fn right_operand(items: &[Item], op: usize) -> Option<(Operand, usize)> {
    let k = op + 1;
    if items.get(k)?.op() == Some(BinOpKind::Sub) {
        Some((to_operand(items, k + 1, Some(k))?, k + 1))
    } else {
        Some((to_operand(items, k, None)?, k))
    }
}

/// Returns the items of a whole, parenthesis-free piece of text, or [`None`] if the text contains
/// parentheses that are not parenthesized constants.
fn text_items(text: &str) -> Option<Vec<Item>> {
    items(&tokenize_significant(text))
}

/// Returns true if the `-` at byte offset `pos` of the given text is the sign of an operand
/// rather than a subtraction.
pub fn is_unary_sign_at(text: &str, pos: usize) -> bool {
    let Some(items) = text_items(text) else {
        return false;
    };
    items
        .iter()
        .position(|item| item.span().start == pos)
        .is_some_and(|k| is_unary_sign(&items, k))
}

/// Returns true if the text contains two adjacent minus signs immediately followed by an operand.
pub fn has_double_negative(text: &str) -> bool {
    text_items(text).is_some_and(|items| find_double_negative(&items).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unary_signs() {
        assert!(is_unary_sign_at("-3+4", 0));
        assert!(!is_unary_sign_at("5-3", 1));
        assert!(is_unary_sign_at("5*-3", 2));
        assert!(!is_unary_sign_at("5--3", 1));
        assert!(is_unary_sign_at("5--3", 2));
        assert!(is_unary_sign_at("2^-3", 2));
        assert!(!is_unary_sign_at("(-2)-3", 4));
        assert!(!is_unary_sign_at("5+3", 1));
    }

    #[test]
    fn double_negatives() {
        assert!(has_double_negative("5--2"));
        assert!(has_double_negative("--2"));
        assert!(has_double_negative("2*--3"));
        assert!(has_double_negative("---3"));
        assert!(has_double_negative("2^--(-2)^2"));
        assert!(!has_double_negative("5-2"));
        assert!(!has_double_negative("5-+2"));
        assert!(!has_double_negative("5-2-3"));
    }

    #[test]
    fn grouped_items() {
        let items = text_items("(-2)^(3)").unwrap();
        assert_eq!(items.len(), 3);
        assert!(items[0].is_grouped());
        assert!(items[2].is_grouped());
        assert!(text_items("(1+2)").is_none());
    }

    #[test]
    fn operand_extraction() {
        let text = "5*-2";
        let items = text_items(text).unwrap();
        let (left, start) = left_operand(&items, 1, true).unwrap();
        let (right, end) = right_operand(&items, 1).unwrap();
        assert_eq!((left.span.clone(), start), (0..1, 0));
        assert_eq!((right.span.clone(), end), (2..4, 3));
        assert_eq!(right.value(text).unwrap(), -2);
        assert_eq!(left.value(text).unwrap(), 5);
    }

    #[test]
    fn sign_absorption() {
        let text = "-3+4";
        let items = text_items(text).unwrap();
        let (left, start) = left_operand(&items, 2, true).unwrap();
        assert_eq!((left.span, start), (0..2, 0));

        let (left, start) = left_operand(&items, 2, false).unwrap();
        assert_eq!((left.span, start), (1..2, 1));
    }

    #[test]
    fn negated_group_cancels() {
        let text = "2^-(-3)";
        let items = text_items(text).unwrap();
        let (right, _) = right_operand(&items, 1).unwrap();
        assert!(!right.negative);
        assert_eq!(right.value(text).unwrap(), 3);
    }
}
