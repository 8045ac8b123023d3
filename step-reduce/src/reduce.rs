//! The step engine: repeatedly locates, evaluates and substitutes the next atomic operation until
//! a single constant remains, recording every intermediate expression.

use crate::{
    error::{kind, Error, ReduceError},
    expr::Expression,
    locate::{locate, Located, ReductionKind},
    numeric::{evaluate, fmt::{fmt_decimal, written_digits}, EvalError},
};
use std::ops::Range;

/// Options controlling how results are written back into the expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReduceOptions {
    /// The number of significant digits to write for each result. If [`None`], results are
    /// written with full working precision.
    ///
    /// Rounding happens every time a result is substituted, so small values here trade accuracy
    /// for shorter intermediate expressions.
    pub precision: Option<usize>,

    /// The maximum number of digits a result may need to be written out in decimal form, counting
    /// digits before the decimal point of large numbers and leading zeros of small ones. Larger
    /// results fail with [`MagnitudeOverflow`](kind::MagnitudeOverflow).
    pub max_digits: usize,
}

impl Default for ReduceOptions {
    fn default() -> Self {
        Self {
            precision: None,
            max_digits: 1000,
        }
    }
}

impl ReduceOptions {
    /// Wraps the given [`ReduceOptions`] into a builder for further customization.
    pub fn into_builder(self) -> ReduceOptionsBuilder {
        ReduceOptionsBuilder(self)
    }
}

/// Helper struct to build a [`ReduceOptions`] struct.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReduceOptionsBuilder(ReduceOptions);

impl ReduceOptionsBuilder {
    /// Creates a new builder with the default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of significant digits written for each result. See
    /// [`ReduceOptions::precision`] for more information.
    pub fn precision(mut self, precision: Option<usize>) -> Self {
        self.0.precision = precision;
        self
    }

    /// Sets the maximum number of digits of a result. See [`ReduceOptions::max_digits`] for more
    /// information.
    pub fn max_digits(mut self, max_digits: usize) -> Self {
        self.0.max_digits = max_digits;
        self
    }

    /// Builds the [`ReduceOptions`] struct.
    pub fn build(self) -> ReduceOptions {
        self.0
    }
}

/// One step of a reduction trace.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReductionStep {
    /// The position of this step in the trace, starting at zero.
    pub index: usize,

    /// The expression after this step was applied.
    pub expression: String,
}

/// The ordered steps that reduce an expression to a constant.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Trace {
    /// The expression that was reduced, with whitespace removed.
    pub source: String,

    /// The steps, in order. Empty if the source was already a constant.
    pub steps: Vec<ReductionStep>,
}

impl Trace {
    /// Returns the final value of the expression, as text.
    pub fn result(&self) -> &str {
        self.steps.last().map_or(self.source.as_str(), |step| step.expression.as_str())
    }

    /// Returns the number of steps in the trace.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns true if the source needed no reduction.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Returns an iterator over the expression after each step.
    pub fn states(&self) -> impl Iterator<Item = &str> + '_ {
        self.steps.iter().map(|step| step.expression.as_str())
    }
}

/// The outcome of a single tick of the step engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tick {
    /// The expression is already a constant.
    Solved,

    /// One atomic operation was reduced.
    Reduced {
        /// The operation that was reduced, with spans into the expression before this tick.
        located: Located,

        /// The expression after this tick.
        expression: Expression,
    },
}

/// Returns true if a `+` must stand in for signs removed right before `pos`: the previous
/// character ends an operand, so dropping the signs would fuse two operands together.
fn needs_plus_sign(expr: &str, pos: usize) -> bool {
    expr[..pos]
        .chars()
        .next_back()
        .is_some_and(|c| c.is_ascii_digit() || c == '.' || c == ')')
}

/// Reduces expressions one atomic operation at a time.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Reducer {
    /// The options to use when substituting results.
    pub options: ReduceOptions,
}

impl Reducer {
    /// Creates a reducer with the given options.
    pub fn new(options: ReduceOptions) -> Self {
        Self { options }
    }

    /// Computes the replacement text for the located operation.
    fn replacement(&self, expr: &str, located: &Located) -> Result<String, Error> {
        match &located.kind {
            ReductionKind::Operation { op, left, right } => {
                let operation = located.text(expr).to_string();
                let malformed = || Error::new(vec![located.span.clone()], kind::MalformedExpression);
                let lhs = left.value(expr).ok_or_else(malformed)?;
                let rhs = right.value(expr).ok_or_else(malformed)?;

                let result = match evaluate(*op, &lhs, &rhs) {
                    Ok(result) => result,
                    Err(EvalError::DivisionByZero) => return Err(Error::new(
                        vec![located.span.clone(), right.span.clone()],
                        kind::DivisionByZero { operation },
                    )),
                    Err(EvalError::NonFinite) => return Err(Error::new(
                        vec![located.span.clone()],
                        kind::NonFiniteResult { operation },
                    )),
                };

                let digits = written_digits(&result);
                if !result.is_zero() && digits > self.options.max_digits {
                    return Err(Error::new(vec![located.span.clone()], kind::MagnitudeOverflow {
                        operation,
                        digits,
                        max: self.options.max_digits,
                    }));
                }

                Ok(fmt_decimal(&result, self.options.precision))
            },
            ReductionKind::DoubleNegative { operand } => Ok(expr[operand.clone()].to_string()),
            ReductionKind::Parenthesized { inner } => Ok(expr[inner.clone()].to_string()),
            ReductionKind::Constant => Err(Error::new(vec![located.span.clone()], kind::MalformedExpression)),
        }
    }

    /// Performs one tick: locates the next atomic operation in `expr`, evaluates it and splices
    /// the result back in.
    pub fn tick(&self, expr: &Expression) -> Result<Tick, Error> {
        if expr.is_solved() {
            return Ok(Tick::Solved);
        }

        let text = expr.as_str();
        let located = locate(text)?;
        let replacement = self.replacement(text, &located)?;
        let Range { start, end } = located.span;

        let plus = if located.is_double_negative() && needs_plus_sign(text, start) { "+" } else { "" };
        let new_text = format!("{}{}{}{}", &text[..start], plus, replacement, &text[end..]);

        let new_expr = Expression::parse(&new_text)
            .map_err(|_| Error::new(vec![located.span.clone()], kind::MalformedExpression))?;

        let (before, after) = (expr.token_count(), new_expr.token_count());
        if after >= before {
            return Err(Error::new(vec![located.span.clone()], kind::ReductionStalled { before, after }));
        }

        Ok(Tick::Reduced { located, expression: new_expr })
    }

    /// Reduces the given expression to a constant, returning every intermediate step.
    ///
    /// Whitespace in the source is ignored. Any failure aborts the whole reduction: no partial
    /// trace is returned.
    pub fn reduce(&self, source: &str) -> Result<Trace, ReduceError> {
        let mut expr = Expression::parse(source).map_err(|err| {
            tracing::debug!(source, "rejected malformed expression");
            ReduceError::new(source, 0, err)
        })?;
        let stripped = expr.to_string();
        let mut steps = Vec::new();

        loop {
            match self.tick(&expr) {
                Ok(Tick::Solved) => break,
                Ok(Tick::Reduced { located, expression }) => {
                    tracing::debug!(
                        step = steps.len(),
                        kind = ?located.kind,
                        span = ?located.span,
                        expression = expression.as_str(),
                        "reduced atomic operation"
                    );
                    steps.push(ReductionStep {
                        index: steps.len(),
                        expression: expression.to_string(),
                    });
                    expr = expression;
                },
                Err(err) => {
                    tracing::debug!(expression = expr.as_str(), error = ?err.kind, "reduction failed");
                    return Err(ReduceError::new(expr.into_string(), steps.len(), err));
                },
            }
        }

        Ok(Trace { source: stripped, steps })
    }
}

/// Reduces the given expression with the default options.
pub fn reduce(source: &str) -> Result<Trace, ReduceError> {
    Reducer::default().reduce(source)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    /// Reduces the expression and returns the intermediate states.
    fn states(source: &str) -> Vec<String> {
        reduce(source).unwrap().states().map(str::to_string).collect()
    }

    #[test]
    fn precedence_scenario() {
        assert_eq!(states("2 + 3 * 4"), ["2+12", "14"]);
    }

    #[test]
    fn nested_parentheses_scenario() {
        assert_eq!(states("(3+(2+3-3^4))*(3+2)"), [
            "(3+(2+3-81))*(3+2)",
            "(3+(5-81))*(3+2)",
            "(3+(-76))*(3+2)",
            "(3+-76)*(3+2)",
            "(-73)*(3+2)",
            "-73*(3+2)",
            "-73*(5)",
            "-73*5",
            "-365",
        ]);
    }

    #[test]
    fn double_negative_scenario() {
        assert_eq!(states("5 - -2"), ["5+2", "7"]);
    }

    #[test]
    fn double_negative_without_plus() {
        assert_eq!(states("--2"), ["2"]);
        assert_eq!(states("2*--3"), ["2*3", "6"]);
        assert_eq!(states("-(-(-3))"), ["-(--3)", "-(3)", "-3"]);
    }

    #[test]
    fn subtraction_of_negative_result() {
        assert_eq!(states("4-5*-2"), ["4--10", "4+10", "14"]);
    }

    #[test]
    fn division_by_zero_scenario() {
        let err = reduce("8 / 0").unwrap_err();
        assert!(err.is::<kind::DivisionByZero>());
        assert_eq!(err.expression, "8/0");
        assert_eq!(err.steps, 0);
        assert_eq!(err.error.spans, vec![0..3, 2..3]);
    }

    #[test]
    fn division_by_zero_after_steps() {
        let err = reduce("1/(2-2)").unwrap_err();
        assert!(err.is::<kind::DivisionByZero>());
        assert_eq!(err.expression, "1/0");
        assert_eq!(err.steps, 2);
    }

    #[test]
    fn non_finite_result() {
        assert!(reduce("(-8)^0.5").unwrap_err().is::<kind::NonFiniteResult>());
        assert!(reduce("0^-1").unwrap_err().is::<kind::NonFiniteResult>());
    }

    #[test]
    fn magnitude_overflow() {
        let reducer = Reducer::new(ReduceOptionsBuilder::new().max_digits(10).build());
        assert!(reducer.reduce("10^20").unwrap_err().is::<kind::MagnitudeOverflow>());
        assert_eq!(reducer.reduce("10^5").unwrap().result(), "100000");
    }

    #[test]
    fn malformed_input() {
        let err = reduce("(1+2").unwrap_err();
        assert!(err.is::<kind::UnclosedParenthesis>());
        assert_eq!(err.expression, "(1+2");
        assert!(reduce("2 $ 3").unwrap_err().is::<kind::InvalidCharacter>());
    }

    #[test]
    fn constants() {
        let trace = reduce("42").unwrap();
        assert!(trace.is_empty());
        assert_eq!(trace.result(), "42");

        let trace = reduce(" -7 ").unwrap();
        assert!(trace.is_empty());
        assert_eq!(trace.result(), "-7");

        assert_eq!(states("(42)"), ["42"]);
    }

    #[test]
    fn unary_minus_binds_looser_than_power() {
        assert_eq!(states("-3^2"), ["-9"]);
        assert_eq!(states("(-3)^2"), ["9"]);
        assert_eq!(states("2^-1"), ["0.5"]);
        assert_eq!(states("2^3^2"), ["2^9", "512"]);
        assert_eq!(states("(-2)^2^3"), ["(-2)^8", "256"]);
    }

    #[test]
    fn decimal_results() {
        assert_eq!(states("1/4+0.5"), ["0.25+0.5", "0.75"]);
        assert_eq!(states("0.1+0.2"), ["0.3"]);
        assert_eq!(states("7/2*2"), ["3.5*2", "7"]);
    }

    #[test]
    fn limited_precision() {
        let reducer = Reducer::new(ReduceOptionsBuilder::new().precision(Some(4)).build());
        assert_eq!(reducer.reduce("2/3").unwrap().result(), "0.6667");
    }

    #[test]
    fn tick_on_solved() {
        let expr = Expression::parse("-365").unwrap();
        assert_eq!(Reducer::default().tick(&expr).unwrap(), Tick::Solved);
    }

    #[test]
    fn plus_sign_context() {
        assert!(needs_plus_sign("5--2", 1));
        assert!(needs_plus_sign("(1)--2", 3));
        assert!(!needs_plus_sign("--2", 0));
        assert!(!needs_plus_sign("2*--3", 2));
        assert!(!needs_plus_sign("(--3)", 1));
    }
}
