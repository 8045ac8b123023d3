//! Stepwise reduction of arithmetic expressions.
//!
//! Given an expression over numbers, `+ - * / ^`, unary minus and parentheses, the [`Reducer`]
//! repeatedly finds the single highest-precedence atomic operation, evaluates it, and substitutes
//! the result back into the text, until only a constant remains. Every intermediate expression is
//! recorded in a [`Trace`]:
//!
//! ```
//! use step_reduce::reduce;
//!
//! let trace = reduce("(3 + (2 + 3 - 3^4)) * (3 + 2)").unwrap();
//! assert_eq!(trace.states().next(), Some("(3+(2+3-81))*(3+2)"));
//! assert_eq!(trace.result(), "-365");
//! ```
//!
//! # Features
//!
//! - `serde`: Derives `Serialize` and `Deserialize` for [`Trace`], [`ReductionStep`] and
//!   [`BinOpKind`](op::BinOpKind).

pub mod count;
pub mod display;
pub mod error;
pub mod expr;
pub mod locate;
pub mod numeric;
pub mod op;
pub mod reduce;
pub mod tokenizer;

pub use error::ReduceError;
pub use expr::Expression;
pub use reduce::{reduce, ReduceOptions, ReduceOptionsBuilder, Reducer, ReductionStep, Tick, Trace};
