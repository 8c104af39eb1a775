//! Runtime value representation
//!
//! The tracer has no type system: every variable holds either a number or a
//! piece of text. Numbers are `f64` so that integer and decimal snippets are
//! traced alike.
//!
//! # Display
//!
//! [`Value`] renders the way a scripting console prints values: integral
//! numbers without a trailing `.0`, very large or very small magnitudes in
//! exponent form (`1e+21`), text verbatim.

use std::fmt;

/// Runtime values held in the variable store
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
}

impl Value {
    /// Build a value from raw text: numeric when the text parses as a finite
    /// number, otherwise the text itself.
    pub fn from_token(token: &str) -> Self {
        match parse_number(token) {
            Some(n) => Value::Number(n),
            None => Value::Text(token.to_string()),
        }
    }

    /// Numeric view of this value, if it has one
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) if n.is_finite() => Some(*n),
            Value::Number(_) => None,
            Value::Text(s) => parse_number(s),
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::Text(s) => f.write_str(s),
        }
    }
}

/// Parse text as a finite decimal number.
///
/// Surrounding whitespace is ignored. `inf`/`nan` spellings are rejected.
pub fn parse_number(text: &str) -> Option<f64> {
    let t = text.trim();
    if t.is_empty() || t.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') {
        return None;
    }
    t.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Format a number the way a scripting console prints it
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        // -0 prints as 0
        return "0".to_string();
    }

    let magnitude = n.abs();
    if magnitude >= 1e21 || magnitude < 1e-6 {
        let formatted = format!("{:e}", n);
        return match formatted.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{}e+{}", mantissa, exp),
            _ => formatted,
        };
    }

    format!("{}", n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_numbers_have_no_fraction() {
        assert_eq!(Value::Number(10.0).to_string(), "10");
        assert_eq!(Value::Number(-3.0).to_string(), "-3");
        assert_eq!(Value::Number(-0.0).to_string(), "0");
    }

    #[test]
    fn fractions_and_exponents() {
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(0.1 + 0.2), "0.30000000000000004");
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(1e-7), "1e-7");
    }

    #[test]
    fn tokens_become_numbers_when_possible() {
        assert_eq!(Value::from_token("42"), Value::Number(42.0));
        assert_eq!(Value::from_token("-1.5"), Value::Number(-1.5));
        assert_eq!(Value::from_token("abc"), Value::Text("abc".to_string()));
        assert_eq!(Value::from_token("inf"), Value::Text("inf".to_string()));
    }
}
