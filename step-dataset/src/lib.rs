//! Generates datasets of random arithmetic expressions, each paired with the steps that reduce it
//! to a constant.
//!
//! ```
//! use step_dataset::{ExpressionGenerator, GeneratorOptionsBuilder, process_dataset};
//!
//! let mut generator = ExpressionGenerator::new(GeneratorOptionsBuilder::new().seed(1).build()).unwrap();
//! let expressions = generator.generate_dataset(10);
//! let samples = process_dataset(&expressions[..]);
//! assert_eq!(samples.len(), 10);
//! ```

pub mod generator;
pub mod options;
pub mod sample;

pub use generator::{needs_parentheses, ExpressionGenerator};
pub use options::{GeneratorOptions, GeneratorOptionsBuilder, OptionsError};
pub use sample::{process_dataset, process_sample, Processor, Sample};
