use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use step_reduce::{
    count::{operand_counts, operator_counts},
    display::{format_expression, FormatOptions},
    ReduceError,
    Reducer,
};

/// A single expression with its reduction steps and the frequency of its operators and operands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    /// The expression, with whitespace removed.
    pub expression: String,

    /// The expression after each reduction step. The last step is the value of the expression.
    pub steps: Vec<String>,

    /// The number of times each operator character appears in the expression.
    pub operator_counts: BTreeMap<char, usize>,

    /// The number of times each number appears in the expression.
    pub operand_counts: BTreeMap<String, usize>,
}

/// Turns expressions into [`Sample`]s.
#[derive(Debug, Default, Clone, Copy)]
pub struct Processor {
    /// Reduces each expression.
    pub reducer: Reducer,

    /// How the steps of each sample are formatted.
    pub format: FormatOptions,
}

impl Processor {
    /// Creates a new processor.
    pub fn new(reducer: Reducer, format: FormatOptions) -> Self {
        Self { reducer, format }
    }

    /// Reduces the expression and collects its statistics.
    pub fn process_sample(&self, expression: &str) -> Result<Sample, ReduceError> {
        let trace = self.reducer.reduce(expression)?;
        let steps = trace.states()
            .map(|state| format_expression(state, self.format))
            .collect();

        Ok(Sample {
            operator_counts: operator_counts(&trace.source),
            operand_counts: operand_counts(&trace.source),
            expression: trace.source,
            steps,
        })
    }

    /// Processes the expressions in parallel, keeping their order. Expressions that fail to reduce
    /// are dropped.
    pub fn process_dataset<S: AsRef<str> + Sync>(&self, expressions: &[S]) -> Vec<Sample> {
        expressions.par_iter()
            .filter_map(|expression| {
                let expression = expression.as_ref();
                match self.process_sample(expression) {
                    Ok(sample) => Some(sample),
                    Err(err) => {
                        tracing::warn!(expression, error = ?err.error.kind, "dropping sample");
                        None
                    },
                }
            })
            .collect()
    }
}

/// Processes a single expression with the default [`Processor`].
pub fn process_sample(expression: &str) -> Result<Sample, ReduceError> {
    Processor::default().process_sample(expression)
}

/// Processes many expressions with the default [`Processor`].
pub fn process_dataset<S: AsRef<str> + Sync>(expressions: &[S]) -> Vec<Sample> {
    Processor::default().process_dataset(expressions)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use step_reduce::display::Spacing;
    use super::*;

    #[test]
    fn sample_of_scenario() {
        let sample = process_sample("(3 + (2 + 3 - 3^4)) * (3 + 2)").unwrap();
        assert_eq!(sample.expression, "(3+(2+3-3^4))*(3+2)");
        assert_eq!(sample.steps.first().map(String::as_str), Some("(3+(2+3-81))*(3+2)"));
        assert_eq!(sample.steps.last().map(String::as_str), Some("-365"));
        assert_eq!(sample.operator_counts.get(&'('), Some(&3));
        assert_eq!(sample.operand_counts.get("3"), Some(&4));
    }

    #[test]
    fn spaced_steps() {
        let processor = Processor::new(Reducer::default(), Spacing::Always.inside(FormatOptions::default()));
        let sample = processor.process_sample("5--2").unwrap();
        assert_eq!(sample.steps, vec!["5 + 2".to_string(), "7".to_string()]);
    }

    #[test]
    fn failures_are_dropped() {
        let samples = process_dataset(&["1+1", "8/0", "2*3", "2+"][..]);
        let expressions = samples.iter().map(|s| s.expression.as_str()).collect::<Vec<_>>();
        assert_eq!(expressions, ["1+1", "2*3"]);
    }

    #[test]
    fn serializes_to_json() {
        let sample = process_sample("2 + 2").unwrap();
        let json = serde_json::to_string(&sample).unwrap();
        assert_eq!(
            json,
            r#"{"expression":"2+2","steps":["4"],"operator_counts":{"+":1},"operand_counts":{"2":2}}"#,
        );
        assert_eq!(serde_json::from_str::<Sample>(&json).unwrap(), sample);
    }
}
