//! Output call rendering
//!
//! The classifier recognizes six output syntaxes and hands their raw
//! argument text here. This module turns that text into the emitted output
//! fragment.
//!
//! # Supported Calls
//!
//! - `printf(fmt, ...)` and `System.out.printf(fmt, ...)`: formatted output
//! - `System.out.print(x)` / `System.out.println(x)`: one value, optional newline
//! - `console.log(a, b)` and `print(a, b)`: values joined by spaces, then a newline.
//!   A bare `print()` still emits the newline; a bare `console.log()` emits nothing.
//! - `cout << a << endl`: values concatenated, `endl` becomes a newline
//!
//! # Format Specifiers
//!
//! `%d %i %u %f %F %e %E %g %G %s %c %x %X %o` each consume one argument in
//! order; `%%` is a literal percent. Width, `-` and `0` flags and `.N`
//! precision are honoured. A missing argument renders as nothing.

use crate::interpreter::expressions::{trim_statement, Evaluator};
use crate::memory::value::{format_number, parse_number};

const CONVERSIONS: &str = "diufFeEgGxXosc";

/// Which of the recognized output syntaxes a call used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputSyntax {
    /// `printf(...)`
    Printf,
    /// `System.out.printf(...)`
    ObjectPrintf,
    /// `System.out.print(...)` / `System.out.println(...)`
    ObjectPrint { newline: bool },
    /// `console.log(...)`
    ConsoleLog,
    /// `print(...)` or `print x`
    PythonPrint,
    /// `cout << ...`
    StreamInsert,
}

/// A classified output statement with its unevaluated arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputCall {
    pub syntax: OutputSyntax,
    pub args: Vec<String>,
}

impl OutputCall {
    /// Evaluate the arguments and produce the emitted text
    pub fn render(&self, eval: &Evaluator<'_>) -> String {
        match self.syntax {
            OutputSyntax::Printf | OutputSyntax::ObjectPrintf => format_printf(&self.args, eval),
            OutputSyntax::ObjectPrint { newline } => {
                let mut text = self
                    .args
                    .first()
                    .map(|arg| display_arg(arg, eval))
                    .unwrap_or_default();
                if newline {
                    text.push('\n');
                }
                text
            }
            OutputSyntax::ConsoleLog if self.args.is_empty() => String::new(),
            OutputSyntax::ConsoleLog | OutputSyntax::PythonPrint => {
                let parts: Vec<String> = self.args.iter().map(|a| display_arg(a, eval)).collect();
                format!("{}\n", parts.join(" "))
            }
            OutputSyntax::StreamInsert => self
                .args
                .iter()
                .map(|part| part.trim())
                .filter(|part| !part.is_empty())
                .map(|part| match part {
                    "endl" | "std::endl" => "\n".to_string(),
                    _ => display_arg(part, eval),
                })
                .collect(),
        }
    }
}

/// Split an argument list at top-level commas.
///
/// Commas inside quotes or nested parentheses do not split. Empty
/// arguments are dropped.
pub fn split_args(inner: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut escape = false;
    let mut depth = 0i32;

    for ch in inner.chars() {
        if escape {
            current.push(ch);
            escape = false;
            continue;
        }
        if ch == '\\' {
            current.push(ch);
            escape = true;
            continue;
        }
        if let Some(q) = quote {
            current.push(ch);
            if ch == q {
                quote = None;
            }
            continue;
        }

        match ch {
            '"' | '\'' => {
                quote = Some(ch);
                current.push(ch);
            }
            '(' => {
                depth += 1;
                current.push(ch);
            }
            ')' => {
                depth -= 1;
                current.push(ch);
            }
            ',' if depth == 0 => {
                push_arg(&mut args, &current);
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    push_arg(&mut args, &current);

    args
}

fn push_arg(args: &mut Vec<String>, current: &str) {
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        args.push(trimmed.to_string());
    }
}

/// Expand `\n` and `\t`; any other escaped character stands for itself
pub fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

/// Emitted text as shown in the execution log: newlines and tabs visible
pub fn log_text(text: &str) -> String {
    text.replace('\n', "\\n").replace('\t', "\\t")
}

fn is_quoted(arg: &str) -> bool {
    let arg = trim_statement(arg);
    arg.len() >= 2
        && (arg.starts_with('"') || arg.starts_with('\''))
        && (arg.ends_with('"') || arg.ends_with('\''))
}

/// Display text of one printed argument; quoted literals get escapes expanded
fn display_arg(arg: &str, eval: &Evaluator<'_>) -> String {
    let text = eval.eval_string(arg);
    if is_quoted(arg) {
        unescape(&text)
    } else {
        text
    }
}

/// Parsed `%[flags][width][.precision]conversion`
#[derive(Debug, Default)]
struct Spec {
    left: bool,
    zero: bool,
    width: usize,
    precision: Option<usize>,
    conversion: char,
}

impl Spec {
    fn parse(body: &str) -> Spec {
        let mut spec = Spec {
            conversion: body.chars().last().unwrap_or('s'),
            ..Default::default()
        };
        let mut rest = body.strip_suffix(spec.conversion).unwrap_or(body);

        while let Some(flag) = rest.chars().next().filter(|c| "-0+ #".contains(*c)) {
            match flag {
                '-' => spec.left = true,
                '0' => spec.zero = true,
                _ => {}
            }
            rest = &rest[1..];
        }

        let (width, precision) = rest.split_once('.').map_or((rest, None), |(w, p)| (w, Some(p)));
        spec.width = leading_digits(width).parse().unwrap_or(0);
        spec.precision = precision.map(|p| leading_digits(p).parse().unwrap_or(0));
        spec
    }

    fn pad(&self, text: String) -> String {
        let len = text.chars().count();
        if len >= self.width {
            return text;
        }
        let fill = self.width - len;
        if self.left {
            format!("{}{}", text, " ".repeat(fill))
        } else if self.zero && self.conversion != 's' && self.conversion != 'c' {
            match text.strip_prefix('-') {
                Some(digits) => format!("-{}{}", "0".repeat(fill), digits),
                None => format!("{}{}", "0".repeat(fill), text),
            }
        } else {
            format!("{}{}", " ".repeat(fill), text)
        }
    }
}

fn leading_digits(s: &str) -> &str {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    &s[..end]
}

/// Render a printf-style call. `args[0]` is the format.
pub fn format_printf(args: &[String], eval: &Evaluator<'_>) -> String {
    let Some(raw_format) = args.first() else {
        return String::new();
    };
    let format = if is_quoted(raw_format) {
        let t = trim_statement(raw_format);
        t[1..t.len() - 1].to_string()
    } else {
        eval.eval_string(raw_format)
    };

    let mut output = String::new();
    let mut rest = args[1..].iter();
    let chars: Vec<char> = format.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];

        if ch == '\\' && i + 1 < chars.len() {
            match chars[i + 1] {
                'n' => output.push('\n'),
                't' => output.push('\t'),
                other => output.push(other),
            }
            i += 2;
            continue;
        }

        if ch == '%' && i + 1 < chars.len() {
            if chars[i + 1] == '%' {
                output.push('%');
                i += 2;
                continue;
            }

            let mut j = i + 1;
            while j < chars.len() && !CONVERSIONS.contains(chars[j]) {
                j += 1;
            }
            let end = j.min(chars.len() - 1);
            let body: String = chars[i + 1..=end].iter().collect();
            i = end + 1;

            let spec = Spec::parse(&body);
            let rendered = rest
                .next()
                .map(|arg| format_arg(&spec, arg, eval))
                .unwrap_or_default();
            output.push_str(&spec.pad(rendered));
            continue;
        }

        output.push(ch);
        i += 1;
    }

    output
}

fn format_arg(spec: &Spec, arg: &str, eval: &Evaluator<'_>) -> String {
    let text = eval.eval_string(arg);
    let number = eval.eval_number(arg).or_else(|| parse_number(&text));

    match (spec.conversion, number) {
        ('d' | 'i' | 'u', Some(n)) => format_number(n.trunc()),
        ('f' | 'F', Some(n)) => match spec.precision {
            Some(p) => format!("{:.*}", p, n),
            None => format_number(n),
        },
        ('e' | 'E' | 'g' | 'G', Some(n)) => format_number(n),
        ('x', Some(n)) => format!("{:x}", n.trunc() as i64 as u32),
        ('X', Some(n)) => format!("{:X}", n.trunc() as i64 as u32),
        ('o', Some(n)) => format!("{:o}", n.trunc() as i64 as u32),
        ('c', _) => text.chars().next().map(String::from).unwrap_or_default(),
        ('s', _) => match spec.precision {
            Some(p) => text.chars().take(p).collect(),
            None => text,
        },
        _ => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{Value, VariableStore};
    use rstest::rstest;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[rstest]
    #[case("\"%d-%d\", 2, 3", vec!["\"%d-%d\"", "2", "3"])]
    #[case("\"a, b\", x", vec!["\"a, b\"", "x"])]
    #[case("max(a, b), 'c,'", vec!["max(a, b)", "'c,'"])]
    #[case("\"q\\\",\", y", vec!["\"q\\\",\"", "y"])]
    #[case(" , x ,", vec!["x"])]
    fn splits_top_level_commas(#[case] inner: &str, #[case] expected: Vec<&str>) {
        assert_eq!(split_args(inner), expected);
    }

    #[rstest]
    #[case(&["\"%d-%d\"", "2", "3"], "2-3")]
    #[case(&["\"sum=%d\\n\"", "x"], "sum=7\n")]
    #[case(&["\"%s is %d\\t!\"", "name", "x / 2"], "Ada is 3\t!")]
    #[case(&["\"%.2f\"", "x / 4"], "1.75")]
    #[case(&["\"[%5d|%-3d|%03d]\"", "x", "1", "-4"], "[    7|1  |-04]")]
    #[case(&["\"%x %X %o\"", "255", "255", "8"], "ff FF 10")]
    #[case(&["\"%c%c\"", "name", "'z'"], "Az")]
    #[case(&["\"100%% %d\"", "x"], "100% 7")]
    #[case(&["\"%d %d\"", "1"], "1 ")]
    #[case(&["\"%f\"", "2.5"], "2.5")]
    #[case(&["\"%i|%u\"", "x / 2", "-7.9"], "3|-7")]
    #[case(&["\"%F %.1F\"", "-0.25", "x / 3"], "-0.25 2.3")]
    #[case(&["\"%e %E\"", "x / 4", "-1.5"], "1.75 -1.5")]
    #[case(&["\"%g|%G\"", "x * 100", "0.125"], "700|0.125")]
    #[case(&["\"%d %e\"", "name", "name"], "Ada Ada")]
    fn printf_formatting(#[case] call: &[&str], #[case] expected: &str) {
        let mut vars = VariableStore::new();
        vars.set("x", Value::Number(7.0));
        vars.set("name", Value::Text("Ada".to_string()));
        assert_eq!(format_printf(&args(call), &Evaluator::new(&vars)), expected);
    }

    #[test]
    fn stream_insertion_places_newlines_inline() {
        let mut vars = VariableStore::new();
        vars.set("n", Value::Number(4.0));
        let call = OutputCall {
            syntax: OutputSyntax::StreamInsert,
            args: args(&["\"n = \"", "n", "endl", "\"done\\n\""]),
        };
        assert_eq!(call.render(&Evaluator::new(&vars)), "n = 4\ndone\n");
    }

    #[test]
    fn print_style_calls_join_with_spaces() {
        let vars = VariableStore::new();
        let call = OutputCall {
            syntax: OutputSyntax::PythonPrint,
            args: args(&["\"total\"", "1 + 2"]),
        };
        assert_eq!(call.render(&Evaluator::new(&vars)), "total 3\n");

        let bare_print = OutputCall {
            syntax: OutputSyntax::PythonPrint,
            args: Vec::new(),
        };
        assert_eq!(bare_print.render(&Evaluator::new(&vars)), "\n");

        let bare_log = OutputCall {
            syntax: OutputSyntax::ConsoleLog,
            args: Vec::new(),
        };
        assert_eq!(bare_log.render(&Evaluator::new(&vars)), "");
    }

    #[test]
    fn log_text_shows_escapes() {
        assert_eq!(log_text("a\nb\tc"), "a\\nb\\tc");
    }
}
