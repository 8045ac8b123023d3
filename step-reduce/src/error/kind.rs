use ariadne::Fmt;
use step_attrs::ErrorKind;
use step_error::{ErrorKind, EXPR};
use crate::tokenizer::TokenKind;

/// A character that cannot appear in an arithmetic expression.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("unexpected character `{}`", character),
    labels = ["this character"],
    help = format!(
        "expressions may only contain {}, {}, and parentheses",
        "numbers".fg(EXPR),
        "+ - * / ^".fg(EXPR),
    ),
)]
pub struct InvalidCharacter {
    /// The offending character(s).
    pub character: String,
}

/// An unexpected token was encountered.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unexpected token",
    labels = [format!("expected one of: {}", expected.iter().map(|t| format!("{:?}", t)).collect::<Vec<_>>().join(", "))],
    help = format!("found {:?}", found),
)]
pub struct UnexpectedToken {
    /// The token(s) that were expected.
    pub expected: &'static [TokenKind],

    /// The token that was found.
    pub found: TokenKind,
}

/// The end of the expression was reached unexpectedly.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unexpected end of expression",
    labels = [format!("you might need to add another {} here", "operand".fg(EXPR))],
)]
pub struct UnexpectedEof;

/// The expression contains nothing to evaluate.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "empty expression",
    labels = ["add an expression here"],
)]
pub struct EmptyExpression;

/// A parenthesis was not closed.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unclosed parenthesis",
    labels = ["this parenthesis is not closed"],
    help = if *opening {
        "add a closing parenthesis `)` somewhere after this"
    } else {
        "add an opening parenthesis `(` somewhere before this"
    },
)]
pub struct UnclosedParenthesis {
    /// Whether the parenthesis was an opening parenthesis `(`. Otherwise, the parenthesis was a
    /// closing parenthesis `)`.
    pub opening: bool,
}

/// There was no expression inside a pair of parentheses.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "missing expression inside parenthesis",
    labels = ["add an expression here"],
)]
pub struct EmptyParenthesis;

/// Operators remain in the expression, but none of them can be reduced.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "malformed expression",
    labels = ["I could not find an operation to reduce in here"],
    help = "you should never see this error for an expression that was accepted; please report this as a bug",
)]
pub struct MalformedExpression;

/// The right operand of a division evaluated to zero.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "cannot divide by zero",
    labels = ["this division".to_string(), format!("this divisor is {}", "zero".fg(EXPR))],
    help = format!("`{}` has no value", operation),
)]
pub struct DivisionByZero {
    /// The text of the offending division.
    pub operation: String,
}

/// An operation produced a result that is not a finite number.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("`{}` does not evaluate to a finite number", operation),
    labels = ["this operation"],
    help = "negative numbers cannot be raised to fractional powers, and zero cannot be raised to a negative power",
)]
pub struct NonFiniteResult {
    /// The text of the offending operation.
    pub operation: String,
}

/// An operation produced a result too large to be written out in full.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("the result of `{}` is too large", operation),
    labels = [format!("this evaluates to a number with about {} digits", digits)],
    help = format!("results may have at most {} digits before the decimal point", max),
)]
pub struct MagnitudeOverflow {
    /// The text of the offending operation.
    pub operation: String,

    /// Approximate number of digits before the decimal point of the result.
    pub digits: usize,

    /// The configured maximum.
    pub max: usize,
}

/// A reduction step did not make the expression any simpler.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "reduction stalled",
    labels = [format!("reducing this left {} tokens, up from {}", after, before)],
    help = "you should never see this error; please report this as a bug",
)]
pub struct ReductionStalled {
    /// Token count of the expression before the step.
    pub before: usize,

    /// Token count of the expression after the step.
    pub after: usize,
}
