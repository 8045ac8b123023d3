//! The binary operators that can appear in an expression.

use crate::tokenizer::TokenKind;
use std::fmt::{Display, Formatter};

/// The precedence class of a binary operator. Higher variants bind tighter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    /// `+` and `-`.
    Term,

    /// `*` and `/`.
    Factor,

    /// `^`.
    Exp,
}

/// The binary operation that is being performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BinOpKind {
    Exp,
    Mul,
    Div,
    Add,
    Sub,
}

impl BinOpKind {
    /// All operators, in precedence order.
    pub const ALL: [BinOpKind; 5] = [Self::Exp, Self::Mul, Self::Div, Self::Add, Self::Sub];

    /// Returns the precedence of the binary operation.
    pub fn precedence(self) -> Precedence {
        match self {
            Self::Exp => Precedence::Exp,
            Self::Mul | Self::Div => Precedence::Factor,
            Self::Add | Self::Sub => Precedence::Term,
        }
    }

    /// Returns the character used to write this operator.
    pub fn symbol(self) -> char {
        match self {
            Self::Exp => '^',
            Self::Mul => '*',
            Self::Div => '/',
            Self::Add => '+',
            Self::Sub => '-',
        }
    }

    /// Returns the operator written with the given character, if any.
    pub fn from_symbol(c: char) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.symbol() == c)
    }

    /// Returns the operator represented by the given token kind, if any.
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Exp => Some(Self::Exp),
            TokenKind::Mul => Some(Self::Mul),
            TokenKind::Div => Some(Self::Div),
            TokenKind::Add => Some(Self::Add),
            TokenKind::Sub => Some(Self::Sub),
            _ => None,
        }
    }
}

impl Display for BinOpKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precedence_order() {
        assert!(BinOpKind::Exp.precedence() > BinOpKind::Mul.precedence());
        assert_eq!(BinOpKind::Mul.precedence(), BinOpKind::Div.precedence());
        assert!(BinOpKind::Div.precedence() > BinOpKind::Sub.precedence());
    }

    #[test]
    fn symbols_round_trip() {
        for op in BinOpKind::ALL {
            assert_eq!(BinOpKind::from_symbol(op.symbol()), Some(op));
        }
        assert_eq!(BinOpKind::from_symbol('%'), None);
    }
}
