pub mod kind;

use ariadne::{Report, Source};
use std::ops::Range;

pub use step_error::Error;

/// An error that aborted the reduction of an expression.
///
/// The spans of the inner [`Error`] point into [`ReduceError::expression`], which is the state of
/// the expression at the moment reduction failed (the raw input, for validation errors).
#[derive(Debug)]
pub struct ReduceError {
    /// The expression text that the error's spans refer to.
    pub expression: String,

    /// The number of steps that were committed before the failure. These steps are discarded.
    pub steps: usize,

    /// The error that occurred.
    pub error: Error,
}

impl ReduceError {
    /// Creates a new reduction error for the given expression state.
    pub fn new(expression: impl Into<String>, steps: usize, error: Error) -> Self {
        Self { expression: expression.into(), steps, error }
    }

    /// Returns true if the kind of the inner error is `K`.
    pub fn is<K: step_error::ErrorKind + 'static>(&self) -> bool {
        self.error.is::<K>()
    }

    /// Build a report from the inner error.
    pub fn build_report<'a>(&self, src_id: &'a str) -> Report<(&'a str, Range<usize>)> {
        self.error.build_report(src_id)
    }

    /// Report this error to stderr.
    ///
    /// The `ariadne` crate's [`Report`] type actually does not have a `Display` implementation, so
    /// we can only use its `eprint` method to print to stderr.
    pub fn report_to_stderr(&self) {
        let report = self.build_report("input");
        if let Err(err) = report.eprint(("input", Source::from(self.expression.as_str()))) {
            tracing::warn!(%err, "could not render error report");
        }
    }
}
