pub mod token;

use logos::{Lexer, Logos};
pub use token::{Token, TokenKind};

/// Returns an iterator over the token kinds produced by the tokenizer.
pub fn tokenize(input: &str) -> Lexer<TokenKind> {
    TokenKind::lexer(input)
}

/// Returns an owned array containing all of the tokens produced by the tokenizer, including
/// whitespace. Characters the lexer cannot match at all are reported as [`TokenKind::Symbol`].
pub fn tokenize_complete(input: &str) -> Box<[Token]> {
    let mut lexer = tokenize(input);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        tokens.push(Token {
            span: lexer.span(),
            kind: result.unwrap_or(TokenKind::Symbol),
            lexeme: lexer.slice(),
        });
    }

    tokens.into_boxed_slice()
}

/// Returns the tokens of the given input with whitespace removed.
pub fn tokenize_significant(input: &str) -> Vec<Token> {
    tokenize_complete(input)
        .into_vec()
        .into_iter()
        .filter(|token| !token.is_whitespace())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Compares the tokens produced by the tokenizer to the raw expected tokens.
    fn compare_tokens<'source, const N: usize>(input: &'source str, expected: [(TokenKind, &'source str); N]) {
        let mut lexer = tokenize(input);

        for (expected_kind, expected_lexeme) in expected.into_iter() {
            assert_eq!(lexer.next(), Some(Ok(expected_kind)));
            assert_eq!(lexer.slice(), expected_lexeme);
        }

        assert_eq!(lexer.next(), None);
    }

    #[test]
    fn basic_expr() {
        compare_tokens(
            "1 + 2",
            [
                (TokenKind::Number, "1"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Add, "+"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Number, "2"),
            ],
        );
    }

    #[test]
    fn decimals_and_signs() {
        compare_tokens(
            "(3.25*-.5)^2",
            [
                (TokenKind::OpenParen, "("),
                (TokenKind::Number, "3.25"),
                (TokenKind::Mul, "*"),
                (TokenKind::Sub, "-"),
                (TokenKind::Number, ".5"),
                (TokenKind::CloseParen, ")"),
                (TokenKind::Exp, "^"),
                (TokenKind::Number, "2"),
            ],
        );
    }

    #[test]
    fn unknown_symbol() {
        compare_tokens(
            "3 % x",
            [
                (TokenKind::Number, "3"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Symbol, "%"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Symbol, "x"),
            ],
        );
    }

    #[test]
    fn significant_tokens_skip_whitespace() {
        let tokens = tokenize_significant(" 5 -\t-2 ");
        let kinds = tokens.iter().map(|t| t.kind).collect::<Vec<_>>();
        assert_eq!(kinds, [TokenKind::Number, TokenKind::Sub, TokenKind::Sub, TokenKind::Number]);
        assert_eq!(tokens[3].span, 6..7);
    }
}
