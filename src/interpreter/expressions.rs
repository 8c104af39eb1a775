//! Expression evaluation
//!
//! Expressions are never parsed against a language grammar. Known variable
//! names are substituted textually with their current values, and whatever
//! remains must fit a small arithmetic grammar:
//!
//! ```text
//! digits  .  + - * / % **  ( )  < > <= >= == != === !==  && || & |  !  whitespace
//! ```
//!
//! Anything else (an unknown identifier, a string, a call) makes the result
//! indeterminate. Callers decide what indeterminate means: numeric
//! evaluation reports `None`, conditions are treated as true, and string
//! evaluation falls back to the literal text.

use crate::memory::value::format_number;
use crate::memory::VariableStore;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Za-z_]\w*\b").expect("identifier pattern"));
static BARE_IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_]\w*$").expect("bare identifier pattern"));
static QUOTED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^["']([\s\S]*)["']$"#).expect("quoted literal pattern"));

/// Evaluates expression text against a variable store snapshot
#[derive(Debug, Clone, Copy)]
pub struct Evaluator<'a> {
    vars: &'a VariableStore,
}

impl<'a> Evaluator<'a> {
    pub fn new(vars: &'a VariableStore) -> Self {
        Evaluator { vars }
    }

    /// Finite numeric value of `text`, or `None` when indeterminate.
    /// Boolean results count as 1 and 0.
    pub fn eval_number(&self, text: &str) -> Option<f64> {
        let cleaned = trim_statement(text);
        match self.evaluate(cleaned) {
            Some(Scalar::Num(n)) if n.is_finite() => return Some(n),
            Some(Scalar::Bool(b)) => return Some(if b { 1.0 } else { 0.0 }),
            _ => {}
        }

        if BARE_IDENTIFIER.is_match(cleaned) {
            return self.vars.get(cleaned).and_then(|v| v.as_number());
        }
        None
    }

    /// Truth value of a condition. Indeterminate conditions are true.
    pub fn eval_bool(&self, text: &str) -> bool {
        self.evaluate(trim_statement(text))
            .map_or(true, Scalar::truthy)
    }

    /// Display text of `text`: its number, the inside of a quoted literal,
    /// the value of a bare variable, or the trimmed text itself.
    pub fn eval_string(&self, text: &str) -> String {
        let cleaned = trim_statement(text);

        if let Some(n) = self.eval_number(cleaned) {
            return format_number(n);
        }
        if let Some(caps) = QUOTED.captures(cleaned) {
            return caps[1].to_string();
        }
        if BARE_IDENTIFIER.is_match(cleaned) {
            if let Some(value) = self.vars.get(cleaned) {
                return value.to_string();
            }
        }
        cleaned.to_string()
    }

    /// Replace every bound identifier in `text` by its value
    pub fn substitute(&self, text: &str) -> String {
        IDENTIFIER
            .replace_all(text, |caps: &Captures| match self.vars.get(&caps[0]) {
                Some(value) => value.to_string(),
                None => caps[0].to_string(),
            })
            .into_owned()
    }

    fn evaluate(&self, text: &str) -> Option<Scalar> {
        let substituted = self.substitute(text);
        if substituted
            .chars()
            .any(|c| c.is_ascii_alphabetic() || c == '_')
        {
            return None;
        }
        if !substituted.chars().all(is_safe_char) {
            return None;
        }
        let tokens = tokenize(&substituted)?;
        let mut parser = ExprParser { tokens, pos: 0 };
        let value = parser.parse_or()?;
        (parser.pos == parser.tokens.len()).then_some(value)
    }
}

/// Trim whitespace and trailing semicolons
pub fn trim_statement(text: &str) -> &str {
    text.trim().trim_end_matches(|c: char| c == ';' || c.is_whitespace())
}

fn is_safe_char(c: char) -> bool {
    c.is_ascii_digit() || c.is_whitespace() || "+-*/%()<>=!&|.".contains(c)
}

/// Intermediate result of the restricted grammar
#[derive(Debug, Clone, Copy, PartialEq)]
enum Scalar {
    Num(f64),
    Bool(bool),
}

impl Scalar {
    fn number(self) -> f64 {
        match self {
            Scalar::Num(n) => n,
            Scalar::Bool(b) => {
                if b {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }

    fn truthy(self) -> bool {
        match self {
            Scalar::Num(n) => n != 0.0 && !n.is_nan(),
            Scalar::Bool(b) => b,
        }
    }

    fn int32(self) -> i32 {
        let n = self.number();
        if n.is_finite() {
            n.trunc() as i64 as i32
        } else {
            0
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Num(f64),
    Op(&'static str),
    LParen,
    RParen,
}

const OPERATORS: [&str; 20] = [
    "===", "!==", "**", "==", "!=", "<=", ">=", "&&", "||", "<", ">", "+", "-", "*", "/", "%",
    "!", "&", "|", "=",
];

fn tokenize(text: &str) -> Option<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut rest = text;

    while let Some(c) = rest.chars().next() {
        if c.is_whitespace() {
            rest = &rest[c.len_utf8()..];
            continue;
        }
        if c.is_ascii_digit() || c == '.' {
            let len = rest
                .find(|ch: char| !(ch.is_ascii_digit() || ch == '.'))
                .unwrap_or(rest.len());
            tokens.push(Token::Num(rest[..len].parse().ok()?));
            rest = &rest[len..];
            continue;
        }
        if c == '(' || c == ')' {
            tokens.push(if c == '(' { Token::LParen } else { Token::RParen });
            rest = &rest[1..];
            continue;
        }
        let op = OPERATORS.iter().find(|op| rest.starts_with(**op))?;
        tokens.push(Token::Op(*op));
        rest = &rest[op.len()..];
    }

    Some(tokens)
}

/// Recursive-descent evaluator with the usual precedence, loosest first:
/// `||`, `&&`, `|`, `&`, equality, relational, additive, multiplicative,
/// `**`, unary.
struct ExprParser {
    tokens: Vec<Token>,
    pos: usize,
}

impl ExprParser {
    fn eat(&mut self, ops: &[&str]) -> Option<&'static str> {
        match self.tokens.get(self.pos) {
            Some(Token::Op(op)) if ops.contains(op) => {
                let op = *op;
                self.pos += 1;
                Some(op)
            }
            _ => None,
        }
    }

    fn parse_or(&mut self) -> Option<Scalar> {
        let mut left = self.parse_and()?;
        while self.eat(&["||"]).is_some() {
            let right = self.parse_and()?;
            left = if left.truthy() { left } else { right };
        }
        Some(left)
    }

    fn parse_and(&mut self) -> Option<Scalar> {
        let mut left = self.parse_bit_or()?;
        while self.eat(&["&&"]).is_some() {
            let right = self.parse_bit_or()?;
            left = if left.truthy() { right } else { left };
        }
        Some(left)
    }

    fn parse_bit_or(&mut self) -> Option<Scalar> {
        let mut left = self.parse_bit_and()?;
        while self.eat(&["|"]).is_some() {
            let right = self.parse_bit_and()?;
            left = Scalar::Num((left.int32() | right.int32()) as f64);
        }
        Some(left)
    }

    fn parse_bit_and(&mut self) -> Option<Scalar> {
        let mut left = self.parse_equality()?;
        while self.eat(&["&"]).is_some() {
            let right = self.parse_equality()?;
            left = Scalar::Num((left.int32() & right.int32()) as f64);
        }
        Some(left)
    }

    fn parse_equality(&mut self) -> Option<Scalar> {
        let mut left = self.parse_relational()?;
        while let Some(op) = self.eat(&["===", "!==", "==", "!="]) {
            let right = self.parse_relational()?;
            let strict_equal = match (left, right) {
                (Scalar::Num(a), Scalar::Num(b)) => a == b,
                (Scalar::Bool(a), Scalar::Bool(b)) => a == b,
                _ => false,
            };
            let loose_equal = left.number() == right.number();
            left = Scalar::Bool(match op {
                "===" => strict_equal,
                "!==" => !strict_equal,
                "==" => loose_equal,
                _ => !loose_equal,
            });
        }
        Some(left)
    }

    fn parse_relational(&mut self) -> Option<Scalar> {
        let mut left = self.parse_additive()?;
        while let Some(op) = self.eat(&["<=", ">=", "<", ">"]) {
            let (a, b) = (left.number(), self.parse_additive()?.number());
            left = Scalar::Bool(match op {
                "<=" => a <= b,
                ">=" => a >= b,
                "<" => a < b,
                _ => a > b,
            });
        }
        Some(left)
    }

    fn parse_additive(&mut self) -> Option<Scalar> {
        let mut left = self.parse_multiplicative()?;
        while let Some(op) = self.eat(&["+", "-"]) {
            let (a, b) = (left.number(), self.parse_multiplicative()?.number());
            left = Scalar::Num(if op == "+" { a + b } else { a - b });
        }
        Some(left)
    }

    fn parse_multiplicative(&mut self) -> Option<Scalar> {
        let mut left = self.parse_power()?;
        while let Some(op) = self.eat(&["*", "/", "%"]) {
            let (a, b) = (left.number(), self.parse_power()?.number());
            left = Scalar::Num(match op {
                "*" => a * b,
                "/" => a / b,
                _ => a % b,
            });
        }
        Some(left)
    }

    fn parse_power(&mut self) -> Option<Scalar> {
        let base = self.parse_unary()?;
        if self.eat(&["**"]).is_some() {
            // right-associative
            let exponent = self.parse_power()?;
            return Some(Scalar::Num(base.number().powf(exponent.number())));
        }
        Some(base)
    }

    fn parse_unary(&mut self) -> Option<Scalar> {
        match self.eat(&["!", "-", "+"]) {
            Some("!") => Some(Scalar::Bool(!self.parse_unary()?.truthy())),
            Some("-") => Some(Scalar::Num(-self.parse_unary()?.number())),
            Some(_) => Some(Scalar::Num(self.parse_unary()?.number())),
            None => self.parse_primary(),
        }
    }

    fn parse_primary(&mut self) -> Option<Scalar> {
        match self.tokens.get(self.pos)? {
            Token::Num(n) => {
                let n = *n;
                self.pos += 1;
                Some(Scalar::Num(n))
            }
            Token::LParen => {
                self.pos += 1;
                let inner = self.parse_or()?;
                match self.tokens.get(self.pos) {
                    Some(Token::RParen) => {
                        self.pos += 1;
                        Some(inner)
                    }
                    _ => None,
                }
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::Value;
    use rstest::rstest;

    fn store() -> VariableStore {
        let mut vars = VariableStore::new();
        vars.set("i", Value::Number(3.0));
        vars.set("n", Value::Number(5.0));
        vars.set("name", Value::Text("Ada".to_string()));
        vars.set("neg", Value::Number(-2.0));
        vars
    }

    #[rstest]
    #[case("1 + 2 * 3", Some(7.0))]
    #[case("(1 + 2) * 3", Some(9.0))]
    #[case("i + n;", Some(8.0))]
    #[case("n % i", Some(2.0))]
    #[case("7 / 2", Some(3.5))]
    #[case("i - neg", Some(5.0))]
    #[case("2 ** 3 ** 2", Some(512.0))]
    #[case("i < n", Some(1.0))]
    #[case("i > n", Some(0.0))]
    #[case("-(i)", Some(-3.0))]
    #[case("1 / 0", None)]
    #[case("unknown + 1", None)]
    #[case("name", None)]
    #[case("\"5\"", None)]
    #[case("i = 4", None)]
    #[case("1 2", None)]
    #[case("", None)]
    fn numbers(#[case] text: &str, #[case] expected: Option<f64>) {
        let vars = store();
        assert_eq!(Evaluator::new(&vars).eval_number(text), expected);
    }

    #[rstest]
    #[case("i < n", true)]
    #[case("i >= n", false)]
    #[case("i == 3 && n != 5", false)]
    #[case("i == 3 || n != 5", true)]
    #[case("!(i < n)", false)]
    #[case("i === 3", true)]
    #[case("0", false)]
    #[case("k < 10", true)]
    #[case("i < strlen(s)", true)]
    fn conditions(#[case] text: &str, #[case] expected: bool) {
        let vars = store();
        assert_eq!(Evaluator::new(&vars).eval_bool(text), expected);
    }

    #[rstest]
    #[case("i * 2", "6")]
    #[case("\"hello world\"", "hello world")]
    #[case("'x'", "x")]
    #[case("name", "Ada")]
    #[case("  mystery() ;", "mystery()")]
    #[case("0.5 + 0.25", "0.75")]
    fn strings(#[case] text: &str, #[case] expected: &str) {
        let vars = store();
        assert_eq!(Evaluator::new(&vars).eval_string(text), expected);
    }

    #[test]
    fn substitution_is_textual() {
        let vars = store();
        assert_eq!(Evaluator::new(&vars).substitute("i+n*idx"), "3+5*idx");
    }
}
