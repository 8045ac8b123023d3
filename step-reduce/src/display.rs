//! Cosmetic formatting of expression text for display.

use crate::tokenizer::{tokenize_significant, TokenKind};

/// Whether to put spaces around binary operators.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Spacing {
    /// Surround every binary operator with a single space: `(3 + -76) * 5`. Signs stay attached
    /// to their operands, and parentheses are not padded.
    Always,

    /// Leave the text as it is: `(3+-76)*5`.
    ///
    /// This is the default option.
    #[default]
    Never,
}

/// Formatting options for expressions.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FormatOptions {
    /// Whether to put spaces around binary operators.
    pub spacing: Spacing,
}

impl Spacing {
    /// Utility function to create a new [`FormatOptions`] with the same formating options as the
    /// given [`FormatOptions`], but with the spacing set to this value.
    pub fn inside(self, options: FormatOptions) -> FormatOptions {
        FormatOptions {
            spacing: self,
            ..options
        }
    }
}

/// Formats the given expression text for display. This never changes the meaning of the
/// expression.
pub fn format_expression(text: &str, options: FormatOptions) -> String {
    let tokens = tokenize_significant(text);
    if options.spacing == Spacing::Never {
        return tokens.iter().map(|token| token.lexeme).collect();
    }

    let mut out = String::with_capacity(text.len() * 2);
    let mut prev: Option<TokenKind> = None;

    for token in &tokens {
        let unary = token.kind == TokenKind::Sub
            && prev.map_or(true, |kind| kind.is_operator() || kind == TokenKind::OpenParen);

        if token.kind.is_operator() && !unary {
            out.push(' ');
            out.push_str(token.lexeme);
            out.push(' ');
        } else {
            out.push_str(token.lexeme);
        }

        prev = Some(token.kind);
    }

    out
}
