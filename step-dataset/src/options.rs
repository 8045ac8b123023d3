use step_reduce::op::BinOpKind;
use std::{error::Error, fmt::{self, Display, Formatter}};

/// Options for the [`ExpressionGenerator`](crate::ExpressionGenerator).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// The smallest operand that can be generated.
    ///
    /// The default value is `1`.
    pub min_value: i64,

    /// One more than the largest operand that can be generated.
    ///
    /// The default value is `100`.
    pub max_value: i64,

    /// The operators to choose from.
    ///
    /// The default value is `* / + -`.
    pub operators: Vec<BinOpKind>,

    /// The maximum depth of nested sub-expressions. A value of `1` generates flat expressions.
    ///
    /// The default value is `3`.
    pub max_nesting: usize,

    /// The seed for the random number generator. If [`None`], the generator is seeded from the
    /// operating system.
    ///
    /// The default value is [`None`].
    pub seed: Option<u64>,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            min_value: 1,
            max_value: 100,
            operators: vec![BinOpKind::Mul, BinOpKind::Div, BinOpKind::Add, BinOpKind::Sub],
            max_nesting: 3,
            seed: None,
        }
    }
}

impl GeneratorOptions {
    /// Checks that the options describe a non-empty sample space.
    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.min_value >= self.max_value {
            return Err(OptionsError::EmptyRange { min: self.min_value, max: self.max_value });
        }
        if self.operators.is_empty() {
            return Err(OptionsError::NoOperators);
        }
        Ok(())
    }
}

/// A builder for [`GeneratorOptions`].
#[derive(Debug, Default, Clone)]
pub struct GeneratorOptionsBuilder(GeneratorOptions);

impl GeneratorOptionsBuilder {
    /// Creates a new builder with the default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the half-open range of operands.
    pub fn range(mut self, min_value: i64, max_value: i64) -> Self {
        self.0.min_value = min_value;
        self.0.max_value = max_value;
        self
    }

    /// Sets the operators to choose from.
    pub fn operators(mut self, operators: impl IntoIterator<Item = BinOpKind>) -> Self {
        self.0.operators = operators.into_iter().collect();
        self
    }

    /// Sets the maximum nesting depth.
    pub fn max_nesting(mut self, max_nesting: usize) -> Self {
        self.0.max_nesting = max_nesting;
        self
    }

    /// Sets the seed of the random number generator.
    pub fn seed(mut self, seed: u64) -> Self {
        self.0.seed = Some(seed);
        self
    }

    /// Builds the options.
    pub fn build(self) -> GeneratorOptions {
        self.0
    }
}

/// The generator options describe nothing that can be generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionsError {
    /// The operand range is empty.
    EmptyRange { min: i64, max: i64 },

    /// There are no operators to choose from.
    NoOperators,
}

impl Display for OptionsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyRange { min, max } => write!(f, "operand range {}..{} is empty", min, max),
            Self::NoOperators => write!(f, "no operators to choose from"),
        }
    }
}

impl Error for OptionsError {}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn builder() {
        let options = GeneratorOptionsBuilder::new()
            .range(-5, 5)
            .operators([BinOpKind::Exp])
            .max_nesting(1)
            .seed(7)
            .build();
        assert_eq!(options.min_value, -5);
        assert_eq!(options.operators, vec![BinOpKind::Exp]);
        assert_eq!(options.seed, Some(7));
        assert_eq!(options.validate(), Ok(()));
    }

    #[test]
    fn invalid() {
        let empty = GeneratorOptionsBuilder::new().range(3, 3).build();
        assert_eq!(empty.validate(), Err(OptionsError::EmptyRange { min: 3, max: 3 }));

        let none = GeneratorOptionsBuilder::new().operators([]).build();
        assert_eq!(none.validate(), Err(OptionsError::NoOperators));
    }
}
