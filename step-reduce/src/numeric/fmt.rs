//! Canonical decimal formatting of numeric results.
//!
//! The reducer treats the expression purely as text, so every result is written back in a form
//! that the tokenizer reads as a single number (plus an optional leading `-`): no exponent, no
//! superfluous trailing zeros, and no trailing decimal point.

use rug::{float::Round, Float};
use std::cmp::Ordering;

/// The number of significant digits written when no precision is requested. This is slightly
/// less than what [`PRECISION`](super::PRECISION) bits can represent, which rounds away the noise
/// introduced by binary floating point (`0.1 + 0.2` is written as `0.3`).
pub const FULL_PRECISION_DIGITS: usize = 145;

/// Trims trailing zeros of the fractional part, and the decimal point if nothing is left after
/// it.
fn trim_trailing(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

/// Returns an estimate of the number of digits needed to write the given number out in decimal
/// notation, counting digits before the decimal point for large numbers and leading fractional
/// zeros for small ones.
pub fn written_digits(n: &Float) -> usize {
    match n.get_exp() {
        // `n = m * 2^exp` with `0.5 <= |m| < 1`
        Some(exp) => (f64::from(exp).abs() * std::f64::consts::LOG10_2).ceil() as usize,
        None => 1,
    }
}

/// Formats a finite float in canonical decimal form, using at most `precision` significant
/// digits (or [`FULL_PRECISION_DIGITS`] if [`None`]).
///
/// Zero is always written as `0`, never `-0`.
pub fn fmt_decimal(n: &Float, precision: Option<usize>) -> String {
    if n.is_zero() || !n.is_finite() {
        return "0".to_string();
    }

    let digits = precision.unwrap_or(FULL_PRECISION_DIGITS).max(1);
    let (sign, mut s, exponent) = n.to_sign_string_exp_round(10, Some(digits), Round::Nearest);
    let Some(exponent) = exponent else {
        return "0".to_string();
    };

    // add decimal point
    match exponent.cmp(&0) {
        Ordering::Less => s.insert_str(0, &format!("0.{}", "0".repeat(exponent.unsigned_abs() as usize))),
        Ordering::Equal => s.insert_str(0, "0."),
        Ordering::Greater => {
            let exponent = exponent as usize;
            match s.len().cmp(&exponent) {
                // if there are not enough digits before the decimal point, add zeros
                Ordering::Less => s.push_str(&"0".repeat(exponent - s.len())),

                // place the decimal point in the correct place
                Ordering::Greater => s.insert(exponent, '.'),

                // if len == exponent, the decimal point would be at the end of the string, so we
                // don't add anything
                Ordering::Equal => {},
            }
        },
    }

    let trimmed = trim_trailing(&s);
    if sign && trimmed != "0" {
        format!("-{}", trimmed)
    } else {
        trimmed.to_string()
    }
}
