//! Frequency counts of the operators and operands in an expression.

use crate::{expr::is_operator_char, tokenizer::{tokenize_significant, TokenKind}};
use std::collections::BTreeMap;

/// Counts the occurrences of each operator character (`^ * / + - ( )`) in the text. Signs are
/// counted as `-`.
pub fn operator_counts(text: &str) -> BTreeMap<char, usize> {
    let mut counts = BTreeMap::new();
    for c in text.chars().filter(|&c| is_operator_char(c)) {
        *counts.entry(c).or_insert(0) += 1;
    }
    counts
}

/// Counts the occurrences of each number in the text. Numbers are counted as written, without
/// their signs.
pub fn operand_counts(text: &str) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for token in tokenize_significant(text).into_iter().filter(|t| t.kind == TokenKind::Number) {
        *counts.entry(token.lexeme.to_string()).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn operators() {
        let counts = operator_counts("(3+(2+3-3^4))*(3+2)");
        assert_eq!(
            counts.into_iter().collect::<Vec<_>>(),
            [('(', 3), (')', 3), ('*', 1), ('+', 3), ('-', 1), ('^', 1)],
        );
    }

    #[test]
    fn operands() {
        let counts = operand_counts("(3+(2+3-3^4))*(3+2)");
        assert_eq!(
            counts.into_iter().collect::<Vec<_>>(),
            [("2".to_string(), 2), ("3".to_string(), 4), ("4".to_string(), 1)],
        );
    }

    #[test]
    fn whitespace_and_signs() {
        assert_eq!(operand_counts("5 - -2.5").get("2.5"), Some(&1));
        assert_eq!(operator_counts("5 - -2.5").get(&'-'), Some(&2));
        assert!(operator_counts("42").is_empty());
    }
}
