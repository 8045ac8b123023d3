//! The [`Expression`] type: a validated, whitespace-free arithmetic expression.

use crate::{
    error::{kind, Error},
    tokenizer::{tokenize_significant, Token, TokenKind},
};
use std::{fmt::{Display, Formatter}, ops::Range};

/// Returns true if the character is one of the characters counted as an operator: `^ * / + - ( )`.
pub fn is_operator_char(c: char) -> bool {
    matches!(c, '^' | '*' | '/' | '+' | '-' | '(' | ')')
}

/// A well-formed arithmetic expression over numbers, `+ - * / ^`, unary minus and balanced
/// parentheses, with all whitespace removed.
///
/// An [`Expression`] is never mutated; each reduction step produces a new one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Expression {
    text: String,
}

impl Expression {
    /// Validates the given source and strips its whitespace.
    ///
    /// The spans of a returned error point into `source` as given, whitespace included.
    pub fn parse(source: &str) -> Result<Self, Error> {
        let tokens = tokenize_significant(source);
        Validator::new(&tokens, source.len()).validate()?;

        Ok(Self {
            text: tokens.iter().map(|token| token.lexeme).collect(),
        })
    }

    /// Returns the text of the expression.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Consumes the expression, returning its text.
    pub fn into_string(self) -> String {
        self.text
    }

    /// Returns the number of tokens in the expression: numbers, operators, signs and parentheses.
    ///
    /// Every reduction step strictly decreases this count.
    pub fn token_count(&self) -> usize {
        tokenize_significant(&self.text).len()
    }

    /// Returns the number of operator characters (`^ * / + - ( )`) in the expression, signs
    /// included.
    pub fn operator_count(&self) -> usize {
        self.text.chars().filter(|&c| is_operator_char(c)).count()
    }

    /// Returns true if the expression is a single number, optionally preceded by one `-`.
    pub fn is_solved(&self) -> bool {
        let tokens = tokenize_significant(&self.text);
        matches!(
            tokens.iter().map(|token| token.kind).collect::<Vec<_>>().as_slice(),
            [TokenKind::Number] | [TokenKind::Sub, TokenKind::Number]
        )
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}

impl AsRef<str> for Expression {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

/// Checks a token stream against the grammar
///
/// ```text
/// expr    := operand (binop operand)*
/// operand := '-'* (number | '(' expr ')')
/// ```
struct Validator<'a, 'source> {
    /// The significant tokens of the source.
    tokens: &'a [Token<'source>],

    /// The index of the **next** token to be checked.
    cursor: usize,

    /// Length of the source, used to point at its end.
    source_len: usize,
}

impl<'a, 'source> Validator<'a, 'source> {
    fn new(tokens: &'a [Token<'source>], source_len: usize) -> Self {
        Self { tokens, cursor: 0, source_len }
    }

    /// Returns a span pointing at the end of the source code.
    fn eof_span(&self) -> Range<usize> {
        self.tokens.last().map_or(self.source_len..self.source_len, |token| token.span.end..token.span.end)
    }

    fn current(&self) -> Option<&Token<'source>> {
        self.tokens.get(self.cursor)
    }

    fn validate(mut self) -> Result<(), Error> {
        if let Some(symbol) = self.tokens.iter().find(|token| token.kind == TokenKind::Symbol) {
            return Err(Error::new(vec![symbol.span.clone()], kind::InvalidCharacter {
                character: symbol.lexeme.to_string(),
            }));
        }

        if self.tokens.is_empty() {
            return Err(Error::new(vec![0..self.source_len], kind::EmptyExpression));
        }

        self.expr()?;

        match self.current() {
            None => Ok(()),
            Some(token) if token.kind == TokenKind::CloseParen => {
                Err(Error::new(vec![token.span.clone()], kind::UnclosedParenthesis { opening: false }))
            },
            Some(token) => Err(Error::new(vec![token.span.clone()], kind::UnexpectedToken {
                expected: &[TokenKind::Add, TokenKind::Sub, TokenKind::Mul, TokenKind::Div, TokenKind::Exp],
                found: token.kind,
            })),
        }
    }

    fn expr(&mut self) -> Result<(), Error> {
        self.operand()?;
        while self.current().is_some_and(|token| token.kind.is_operator()) {
            self.cursor += 1;
            self.operand()?;
        }
        Ok(())
    }

    fn operand(&mut self) -> Result<(), Error> {
        while self.current().is_some_and(|token| token.kind == TokenKind::Sub) {
            self.cursor += 1;
        }

        let Some(token) = self.current().cloned() else {
            return Err(Error::new(vec![self.eof_span()], kind::UnexpectedEof));
        };
        self.cursor += 1;

        match token.kind {
            TokenKind::Number => Ok(()),
            TokenKind::OpenParen => {
                if let Some(close) = self.current().filter(|t| t.kind == TokenKind::CloseParen) {
                    return Err(Error::new(vec![token.span.start..close.span.end], kind::EmptyParenthesis));
                }

                self.expr()?;
                match self.current() {
                    Some(close) if close.kind == TokenKind::CloseParen => {
                        self.cursor += 1;
                        Ok(())
                    },
                    _ => Err(Error::new(vec![token.span], kind::UnclosedParenthesis { opening: true })),
                }
            },
            found => Err(Error::new(vec![token.span], kind::UnexpectedToken {
                expected: &[TokenKind::Number, TokenKind::OpenParen, TokenKind::Sub],
                found,
            })),
        }
    }
}
