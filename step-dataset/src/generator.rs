use crate::options::{GeneratorOptions, OptionsError};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use std::collections::HashSet;
use step_reduce::{op::BinOpKind, Reducer};

/// Number of attempts per requested sample before [`ExpressionGenerator::generate_dataset`] gives
/// up.
const ATTEMPTS_PER_SAMPLE: usize = 100;

/// Returns the precedence rank used when deciding where parentheses go.
fn rank(op: BinOpKind) -> u8 {
    match op {
        BinOpKind::Add | BinOpKind::Sub => 1,
        BinOpKind::Mul | BinOpKind::Div => 2,
        BinOpKind::Exp => 3,
    }
}

/// Returns true if a sub-expression whose loosest operator is `current` must be parenthesized
/// when it is an operand of `prev`.
///
/// A tighter `current` never needs parentheses. At equal precedence, only `^` needs them, and
/// only on the left, since `^` is right-associative. A looser `current` always needs them.
pub fn needs_parentheses(prev: Option<BinOpKind>, current: Option<BinOpKind>, is_right: bool) -> bool {
    let (Some(prev), Some(current)) = (prev, current) else {
        return false;
    };

    match rank(current).cmp(&rank(prev)) {
        std::cmp::Ordering::Greater => false,
        std::cmp::Ordering::Equal => current == BinOpKind::Exp && !is_right,
        std::cmp::Ordering::Less => true,
    }
}

/// Generates random arithmetic expressions.
#[derive(Debug, Clone)]
pub struct ExpressionGenerator {
    options: GeneratorOptions,
    rng: StdRng,
}

impl ExpressionGenerator {
    /// Creates a new generator with the given options.
    pub fn new(options: GeneratorOptions) -> Result<Self, OptionsError> {
        options.validate()?;
        let rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self { options, rng })
    }

    /// Returns the options of this generator.
    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    /// Generates a single operand, uniformly chosen from the operand range.
    pub fn generate_operand(&mut self) -> String {
        self.rng.gen_range(self.options.min_value..self.options.max_value).to_string()
    }

    fn generate_operator(&mut self) -> BinOpKind {
        // `validate` guarantees at least one operator
        *self.options.operators
            .choose(&mut self.rng)
            .unwrap_or(&BinOpKind::Add)
    }

    /// Generates an expression that will be the operand of `prev_operator`, on its right side if
    /// `is_right` is true. The expression is parenthesized if its loosest operator requires it.
    ///
    /// At `nesting_level >= max_nesting`, a single operand is generated.
    pub fn generate_expression(
        &mut self,
        nesting_level: usize,
        prev_operator: Option<BinOpKind>,
        is_right: bool,
    ) -> String {
        let (text, loosest) = self.generate_part(nesting_level);
        if needs_parentheses(prev_operator, loosest, is_right) {
            format!("({})", text)
        } else {
            text
        }
    }

    /// Generates an unparenthesized expression and returns it with its loosest operator.
    fn generate_part(&mut self, nesting_level: usize) -> (String, Option<BinOpKind>) {
        if nesting_level >= self.options.max_nesting {
            return (self.generate_operand(), None);
        }

        let parts: usize = self.rng.gen_range(2..4);
        let operators = (1..parts).map(|_| self.generate_operator()).collect::<Vec<_>>();
        let mut loosest = operators.iter().copied().min_by_key(|&op| rank(op));
        let mut text = String::new();

        for i in 0..parts {
            let left = i.checked_sub(1).map(|j| operators[j]);
            let right = operators.get(i).copied();
            if let Some(op) = left {
                text.push(' ');
                text.push(op.symbol());
                text.push(' ');
            }

            if nesting_level + 1 < self.options.max_nesting && self.rng.gen_bool(0.5) {
                // the operand binds to whichever neighbour is tighter, the left one on ties
                let (context, is_right) = match (left, right) {
                    (Some(l), Some(r)) if rank(r) > rank(l) => (Some(r), false),
                    (Some(l), _) => (Some(l), true),
                    (None, r) => (r, false),
                };
                let (sub, sub_loosest) = self.generate_part(nesting_level + 1);
                if needs_parentheses(context, sub_loosest, is_right) {
                    text.push('(');
                    text.push_str(&sub);
                    text.push(')');
                } else {
                    text.push_str(&sub);
                    loosest = [loosest, sub_loosest].into_iter().flatten().min_by_key(|&op| rank(op));
                }
            } else {
                text.push_str(&self.generate_operand());
            }
        }

        (text, loosest)
    }

    /// Generates `num_samples` distinct expressions that reduce without error. Expressions that
    /// fail to reduce, or that were already generated, are discarded.
    ///
    /// If the options make it impossible to find enough expressions, fewer are returned.
    pub fn generate_dataset(&mut self, num_samples: usize) -> Vec<String> {
        let reducer = Reducer::default();
        let mut seen = HashSet::new();
        let mut dataset = Vec::with_capacity(num_samples);
        let mut attempts = 0;

        while dataset.len() < num_samples {
            if attempts >= num_samples.saturating_mul(ATTEMPTS_PER_SAMPLE) {
                tracing::warn!(attempts, found = dataset.len(), num_samples, "giving up on generating more samples");
                break;
            }
            attempts += 1;

            let expression = self.generate_expression(0, None, false);
            if seen.contains(&expression) {
                continue;
            }

            match reducer.reduce(&expression) {
                Ok(_) => {
                    seen.insert(expression.clone());
                    dataset.push(expression);
                },
                Err(err) => {
                    tracing::debug!(expression = expression.as_str(), error = ?err.error.kind, "discarding expression");
                    seen.insert(expression);
                },
            }
        }

        dataset
    }
}

#[cfg(test)]
mod tests {
    use crate::options::GeneratorOptionsBuilder;
    use pretty_assertions::assert_eq;
    use step_reduce::Expression;
    use super::*;

    fn generator(seed: u64) -> ExpressionGenerator {
        ExpressionGenerator::new(GeneratorOptionsBuilder::new().seed(seed).build()).unwrap()
    }

    #[test]
    fn parentheses_by_precedence() {
        use BinOpKind::*;
        assert!(!needs_parentheses(None, Some(Add), false));
        assert!(!needs_parentheses(Some(Add), None, false));
        assert!(!needs_parentheses(Some(Add), Some(Mul), false));
        assert!(!needs_parentheses(Some(Mul), Some(Div), true));
        assert!(!needs_parentheses(Some(Exp), Some(Exp), true));
        assert!(needs_parentheses(Some(Exp), Some(Exp), false));
        assert!(needs_parentheses(Some(Mul), Some(Sub), false));
        assert!(needs_parentheses(Some(Exp), Some(Mul), true));
    }

    #[test]
    fn operands_in_range() {
        let mut gen = ExpressionGenerator::new(GeneratorOptionsBuilder::new().range(-3, 3).seed(1).build()).unwrap();
        for _ in 0..200 {
            let n = gen.generate_operand().parse::<i64>().unwrap();
            assert!((-3..3).contains(&n));
        }
    }

    #[test]
    fn flat_expressions() {
        let mut gen = ExpressionGenerator::new(GeneratorOptionsBuilder::new().max_nesting(1).seed(2).build()).unwrap();
        for _ in 0..50 {
            let expr = gen.generate_expression(0, None, false);
            assert!(!expr.contains('('), "{expr}");
            let parts = expr.split(' ').count();
            assert!(parts == 3 || parts == 5, "{expr}");
        }
    }

    #[test]
    fn expressions_are_well_formed() {
        let mut gen = ExpressionGenerator::new(
            GeneratorOptionsBuilder::new()
                .range(-20, 20)
                .operators(BinOpKind::ALL)
                .max_nesting(4)
                .seed(3)
                .build(),
        ).unwrap();
        for _ in 0..200 {
            let expr = gen.generate_expression(0, None, false);
            assert!(Expression::parse(&expr).is_ok(), "{expr}");
        }
    }

    #[test]
    fn seeded_generators_agree() {
        let a = generator(42).generate_dataset(20);
        let b = generator(42).generate_dataset(20);
        assert_eq!(a, b);
        assert_eq!(a.len(), 20);
    }

    #[test]
    fn dataset_is_distinct() {
        let dataset = generator(9).generate_dataset(50);
        let distinct = dataset.iter().collect::<HashSet<_>>();
        assert_eq!(distinct.len(), dataset.len());
    }

    #[test]
    fn impossible_dataset_gives_up() {
        // only `0 / 0` style expressions exist, all of which divide by zero
        let mut gen = ExpressionGenerator::new(
            GeneratorOptionsBuilder::new()
                .range(0, 1)
                .operators([BinOpKind::Div])
                .max_nesting(1)
                .seed(4)
                .build(),
        ).unwrap();
        assert!(gen.generate_dataset(3).is_empty());
    }
}
