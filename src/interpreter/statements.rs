//! Statement classification and execution.
//!
//! A line is classified once into a [`Statement`] by walking
//! [`RECOGNIZERS`] in order; the first recognizer that accepts the text
//! wins. The order matters because the syntaxes overlap: `x = input()` is
//! also a plain assignment, and `print x` would otherwise be nothing at all.
//!
//! Each syntax family sits behind its own recognizer function, so adding a
//! new input or output syntax means adding one function and one table row.

use crate::interpreter::builtins::{log_text, split_args, OutputCall, OutputSyntax};
use crate::interpreter::expressions::{trim_statement, Evaluator};
use crate::memory::Value;
use crate::program::strip_comments;
use crate::snapshot::{InputRequest, RuntimeState};
use once_cell::sync::Lazy;
use regex::Regex;

/// Declaration keywords shared by the C-like, Java-like and JavaScript-like syntaxes
const TYPE_KEYWORDS: &str = "int|long|short|float|double|char|bool|boolean|String|let|const|var";

fn pattern(source: &str) -> Regex {
    let source = source.replace("TYPE", TYPE_KEYWORDS);
    Regex::new(&source).expect("statement pattern")
}

static SCANF_CALL: Lazy<Regex> = Lazy::new(|| pattern(r"scanf\s*\((.*)\)"));
static SCANF_TARGET: Lazy<Regex> = Lazy::new(|| pattern(r"&\s*([A-Za-z_]\w*)"));
static SCANF_FORMAT: Lazy<Regex> = Lazy::new(|| pattern(r#""([^"]*)""#));
static CIN: Lazy<Regex> = Lazy::new(|| pattern(r"^(?:std::)?cin\s*>>(.*)$"));
static IDENT: Lazy<Regex> = Lazy::new(|| pattern(r"[A-Za-z_]\w*"));
static READ_CALL: Lazy<Regex> = Lazy::new(|| {
    pattern(
        r"^(?:(?:TYPE)\s+)?([A-Za-z_]\w*)\s*=\s*(?:(?:int|float|str|Number|parseInt|parseFloat)\s*\(\s*)?input\s*\((.*?)\)\s*\)?\s*;?$",
    )
});
static SCANNER_CALL: Lazy<Regex> = Lazy::new(|| {
    pattern(
        r"^(?:(?:TYPE)\s+)?([A-Za-z_]\w*)\s*=\s*[A-Za-z_]\w*\.next(?:Int|Long|Double|Float|Line)?\s*\(\)\s*;?$",
    )
});
static PROMPT_CALL: Lazy<Regex> = Lazy::new(|| {
    pattern(
        r"^(?:(?:TYPE)\s+)?([A-Za-z_]\w*)\s*=\s*(?:(?:Number|parseInt|parseFloat)\s*\(\s*)?prompt\s*\((.*?)\)\s*\)?\s*;?$",
    )
});

static PRINTF: Lazy<Regex> = Lazy::new(|| pattern(r"^printf\s*\((.*)\)\s*;?$"));
static OBJECT_PRINTF: Lazy<Regex> = Lazy::new(|| pattern(r"^System\.out\.printf\s*\((.*)\)\s*;?$"));
static OBJECT_PRINT: Lazy<Regex> =
    Lazy::new(|| pattern(r"^System\.out\.(println|print)\s*\((.*)\)\s*;?$"));
static CONSOLE_LOG: Lazy<Regex> = Lazy::new(|| pattern(r"^console\.log\s*\((.*)\)\s*;?$"));
static PYTHON_PRINT_CALL: Lazy<Regex> = Lazy::new(|| pattern(r"^print\s*\((.*)\)\s*;?$"));
static PYTHON_PRINT_BARE: Lazy<Regex> = Lazy::new(|| pattern(r"^print\s+(.*)$"));
static COUT: Lazy<Regex> = Lazy::new(|| pattern(r"^(?:std::)?cout\s*<<(.*)$"));

static DECLARATION: Lazy<Regex> =
    Lazy::new(|| pattern(r"^(?:TYPE)\s+([A-Za-z_]\w*)\s*=\s*(.+)$"));
static BARE_DECLARATION: Lazy<Regex> =
    Lazy::new(|| pattern(r"^(?:TYPE)\s+([A-Za-z_]\w*)\s*;?$"));
static POSTFIX_STEP: Lazy<Regex> = Lazy::new(|| pattern(r"^([A-Za-z_]\w*)\s*(\+\+|--)\s*;?$"));
static PREFIX_STEP: Lazy<Regex> = Lazy::new(|| pattern(r"^(\+\+|--)\s*([A-Za-z_]\w*)\s*;?$"));
static COMPOUND: Lazy<Regex> =
    Lazy::new(|| pattern(r"^([A-Za-z_]\w*)\s*([+\-*/%])=\s*(.+)$"));
static ASSIGNMENT: Lazy<Regex> = Lazy::new(|| pattern(r"^([A-Za-z_]\w*)\s*=\s*([^=].*)$"));

/// Where a piece of text is being executed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Context {
    /// An ordinary program line
    Statement,
    /// The init clause of a loop header
    LoopInit,
    /// The update clause of a loop header
    LoopUpdate,
}

impl Context {
    pub fn label(self) -> Option<&'static str> {
        match self {
            Context::Statement => None,
            Context::LoopInit => Some("for-init"),
            Context::LoopUpdate => Some("for-update"),
        }
    }
}

/// The recognized input syntaxes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSyntax {
    /// `scanf("%d %d", &a, &b)`
    AddressOf,
    /// `cin >> a >> b`
    StreamExtract,
    /// `x = input("prompt")`
    ReadCall,
    /// `n = sc.nextInt()`
    Scanner,
    /// `x = prompt("prompt")`
    Prompt,
}

impl InputSyntax {
    fn name(self) -> &'static str {
        match self {
            InputSyntax::AddressOf => "scanf",
            InputSyntax::StreamExtract => "cin",
            InputSyntax::ReadCall => "input()",
            InputSyntax::Scanner => "Scanner",
            InputSyntax::Prompt => "prompt()",
        }
    }
}

/// A classified input statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputCall {
    pub syntax: InputSyntax,
    pub targets: Vec<String>,
    pub description: String,
}

/// The shape of one line of source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// Nothing left after comments are removed
    Blank,
    /// A line holding only `{` or `}`
    Delimiter,
    Input(InputCall),
    Output(OutputCall),
    /// `int x = expr`
    Declare { name: String, expr: String },
    /// `int x`
    DeclareBare { name: String },
    /// `x++`, `x--`, `++x`, `--x`
    Step { name: String, increment: bool },
    /// `x += expr` and friends
    CompoundAssign { name: String, op: char, expr: String },
    /// `x = expr`
    Assign { name: String, expr: String },
    Unrecognized,
}

/// Groups of recognizers with the same context restrictions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    Input,
    Output,
    Binding,
}

impl Family {
    /// Input and output are only recognized on ordinary lines
    pub fn allowed_in(self, context: Context) -> bool {
        match self {
            Family::Input | Family::Output => context == Context::Statement,
            Family::Binding => true,
        }
    }
}

pub type Recognizer = fn(&str) -> Option<Statement>;

/// Classification priority, highest first
pub const RECOGNIZERS: &[(Family, Recognizer)] = &[
    (Family::Input, recognize_scanf),
    (Family::Input, recognize_cin),
    (Family::Input, recognize_read_call),
    (Family::Input, recognize_scanner),
    (Family::Input, recognize_prompt),
    (Family::Output, recognize_printf),
    (Family::Output, recognize_object_printf),
    (Family::Output, recognize_object_print),
    (Family::Output, recognize_console_log),
    (Family::Output, recognize_python_print),
    (Family::Output, recognize_stream_insert),
    (Family::Binding, recognize_declaration),
    (Family::Binding, recognize_bare_declaration),
    (Family::Binding, recognize_step),
    (Family::Binding, recognize_compound),
    (Family::Binding, recognize_assignment),
];

/// Classify one line (or loop clause) of text
pub fn classify(text: &str, context: Context) -> Statement {
    let trimmed = strip_comments(text).trim();
    if trimmed.is_empty() {
        return Statement::Blank;
    }
    if context == Context::Statement && (trimmed == "{" || trimmed == "}") {
        return Statement::Delimiter;
    }

    RECOGNIZERS
        .iter()
        .filter(|(family, _)| family.allowed_in(context))
        .find_map(|(_, recognize)| recognize(trimmed))
        .unwrap_or(Statement::Unrecognized)
}

/// Split a line into its top-level `;`-separated statements.
///
/// Quoted text and parenthesized text are never split, so `for` clauses and
/// string literals survive intact. Empty pieces are dropped.
pub fn split_statements(text: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut depth = 0i32;
    let mut quote: Option<char> = None;
    let mut escape = false;

    for (at, ch) in text.char_indices() {
        if escape {
            escape = false;
            continue;
        }
        match quote {
            Some(q) => {
                if ch == '\\' {
                    escape = true;
                } else if ch == q {
                    quote = None;
                }
            }
            None => match ch {
                '"' | '\'' => quote = Some(ch),
                '(' => depth += 1,
                ')' => depth -= 1,
                ';' if depth <= 0 => {
                    pieces.push(&text[start..at]);
                    start = at + 1;
                }
                _ => {}
            },
        }
    }
    pieces.push(&text[start..]);

    pieces
        .into_iter()
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .collect()
}

/// Classify every statement on a program line, in order.
/// Always yields at least one statement.
pub fn classify_line(text: &str) -> Vec<Statement> {
    let pieces = split_statements(strip_comments(text));
    if pieces.len() <= 1 {
        return vec![classify(text, Context::Statement)];
    }
    pieces
        .into_iter()
        .map(|piece| classify(piece, Context::Statement))
        .collect()
}

// ---- input ----

fn input(syntax: InputSyntax, targets: Vec<String>, description: String) -> Option<Statement> {
    if targets.is_empty() {
        return None;
    }
    Some(Statement::Input(InputCall {
        syntax,
        targets,
        description,
    }))
}

fn recognize_scanf(text: &str) -> Option<Statement> {
    let inside = SCANF_CALL.captures(text)?.get(1)?.as_str();
    let targets: Vec<String> = SCANF_TARGET
        .captures_iter(inside)
        .map(|c| c[1].to_string())
        .collect();

    let names = targets.join(", ");
    let description = match SCANF_FORMAT.captures(inside) {
        Some(fmt) => format!("scanf(\"{}\") → {}", &fmt[1], names),
        None => format!("scanf → {}", names),
    };
    input(InputSyntax::AddressOf, targets, description)
}

fn recognize_cin(text: &str) -> Option<Statement> {
    let chain = CIN.captures(text)?.get(1)?.as_str();
    let targets: Vec<String> = chain
        .split(">>")
        .filter_map(|part| IDENT.find(part).map(|m| m.as_str().to_string()))
        .collect();
    let description = format!("cin >> {}", targets.join(" >> "));
    input(InputSyntax::StreamExtract, targets, description)
}

/// Prompt text of a call argument, with one layer of quotes removed
fn prompt_text(raw: &str, fallback: String) -> String {
    let raw = raw.trim();
    let raw = raw.strip_prefix(['"', '\'']).unwrap_or(raw);
    let raw = raw.strip_suffix(['"', '\'']).unwrap_or(raw);
    if raw.is_empty() {
        fallback
    } else {
        raw.to_string()
    }
}

fn recognize_read_call(text: &str) -> Option<Statement> {
    let caps = READ_CALL.captures(text)?;
    let name = caps[1].to_string();
    let prompt = prompt_text(&caps[2], format!("input() for {}", name));
    input(InputSyntax::ReadCall, vec![name], format!("input(): {}", prompt))
}

fn recognize_scanner(text: &str) -> Option<Statement> {
    let name = SCANNER_CALL.captures(text)?[1].to_string();
    let description = format!("Scanner input for {}", name);
    input(InputSyntax::Scanner, vec![name], description)
}

fn recognize_prompt(text: &str) -> Option<Statement> {
    let caps = PROMPT_CALL.captures(text)?;
    let name = caps[1].to_string();
    let prompt = prompt_text(&caps[2], format!("prompt() for {}", name));
    input(InputSyntax::Prompt, vec![name], format!("prompt(): {}", prompt))
}

// ---- output ----

fn output(syntax: OutputSyntax, args: Vec<String>) -> Option<Statement> {
    Some(Statement::Output(OutputCall { syntax, args }))
}

/// printf-family calls need at least a format argument
fn formatted(re: &Regex, syntax: OutputSyntax, text: &str) -> Option<Statement> {
    let args = split_args(re.captures(text)?.get(1)?.as_str().trim());
    if args.is_empty() {
        return None;
    }
    output(syntax, args)
}

fn recognize_printf(text: &str) -> Option<Statement> {
    formatted(&PRINTF, OutputSyntax::Printf, text)
}

fn recognize_object_printf(text: &str) -> Option<Statement> {
    formatted(&OBJECT_PRINTF, OutputSyntax::ObjectPrintf, text)
}

fn recognize_object_print(text: &str) -> Option<Statement> {
    let caps = OBJECT_PRINT.captures(text)?;
    let newline = &caps[1] == "println";
    let inner = caps[2].trim();
    let args = if inner.is_empty() {
        Vec::new()
    } else {
        vec![inner.to_string()]
    };
    output(OutputSyntax::ObjectPrint { newline }, args)
}

fn recognize_console_log(text: &str) -> Option<Statement> {
    let inner = CONSOLE_LOG.captures(text)?.get(1)?.as_str();
    output(OutputSyntax::ConsoleLog, split_args(inner))
}

fn recognize_python_print(text: &str) -> Option<Statement> {
    let caps = PYTHON_PRINT_CALL
        .captures(text)
        .or_else(|| PYTHON_PRINT_BARE.captures(text))?;
    output(OutputSyntax::PythonPrint, split_args(&caps[1]))
}

fn recognize_stream_insert(text: &str) -> Option<Statement> {
    let chain = COUT.captures(text)?.get(1)?.as_str();
    let parts = chain
        .split("<<")
        .map(|part| trim_statement(part).to_string())
        .collect();
    output(OutputSyntax::StreamInsert, parts)
}

// ---- bindings ----

fn recognize_declaration(text: &str) -> Option<Statement> {
    let caps = DECLARATION.captures(text)?;
    Some(Statement::Declare {
        name: caps[1].to_string(),
        expr: trim_statement(&caps[2]).to_string(),
    })
}

fn recognize_bare_declaration(text: &str) -> Option<Statement> {
    let caps = BARE_DECLARATION.captures(text)?;
    Some(Statement::DeclareBare {
        name: caps[1].to_string(),
    })
}

fn recognize_step(text: &str) -> Option<Statement> {
    let (name, op) = match POSTFIX_STEP.captures(text) {
        Some(caps) => (caps[1].to_string(), caps[2].to_string()),
        None => {
            let caps = PREFIX_STEP.captures(text)?;
            (caps[2].to_string(), caps[1].to_string())
        }
    };
    Some(Statement::Step {
        name,
        increment: op == "++",
    })
}

fn recognize_compound(text: &str) -> Option<Statement> {
    let caps = COMPOUND.captures(text)?;
    Some(Statement::CompoundAssign {
        name: caps[1].to_string(),
        op: caps[2].chars().next()?,
        expr: trim_statement(&caps[3]).to_string(),
    })
}

fn recognize_assignment(text: &str) -> Option<Statement> {
    let caps = ASSIGNMENT.captures(text)?;
    Some(Statement::Assign {
        name: caps[1].to_string(),
        expr: trim_statement(&caps[2]).to_string(),
    })
}

// ---- execution ----

/// Where a statement executes: its 1-based line, the index stepping resumes
/// from, and the context
#[derive(Debug, Clone, Copy)]
pub struct Site {
    pub line: usize,
    pub index: usize,
    pub context: Context,
}

/// How a statement left the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Completed,
    AwaitingInput,
}

/// Format a log message with the context prefix when there is one
fn message(context: Context, plain: String, in_clause: String) -> String {
    match context.label() {
        Some(label) => format!("{}: {}", label, in_clause),
        None => plain,
    }
}

/// Value an initializer stores: its number when it has one, else its text
fn initial_value(eval: &Evaluator<'_>, expr: &str) -> Value {
    match eval.eval_number(expr) {
        Some(n) => Value::Number(n),
        None => Value::Text(trim_statement(expr).to_string()),
    }
}

/// Apply `stmt` to `state`, logging exactly one entry
pub fn execute(state: &mut RuntimeState, stmt: &Statement, site: Site) -> Flow {
    let ctx = site.context;

    let entry = match stmt {
        Statement::Blank => match ctx.label() {
            Some(label) => format!("{}: (blank)", label),
            None => "Blank or comment line.".to_string(),
        },

        Statement::Delimiter => "Block delimiter.".to_string(),

        Statement::Input(call) => {
            state.pending_input = Some(InputRequest {
                variables: call.targets.clone(),
                line: site.line,
                resume_position: site.index,
                description: call.description.clone(),
            });
            state.log(site.line, format!("Waiting for {} input.", call.syntax.name()));
            return Flow::AwaitingInput;
        }

        Statement::Output(call) => {
            let text = call.render(&Evaluator::new(&state.variables));
            if text.is_empty() {
                "Output: nothing printed.".to_string()
            } else {
                let entry = format!("Output: {}", log_text(&text));
                state.output.print(text);
                entry
            }
        }

        Statement::Declare { name, expr } => {
            let value = initial_value(&Evaluator::new(&state.variables), expr);
            let shown = value.to_string();
            state.variables.set(name, value);
            message(
                ctx,
                format!("Declare {} = {}", name, shown),
                format!("declare {} = {}", name, shown),
            )
        }

        Statement::DeclareBare { name } => {
            let note = match state.variables.get(name) {
                Some(existing) => format!("keeps {}", existing),
                None => {
                    state.variables.set(name, Value::Number(0.0));
                    "initialized to 0".to_string()
                }
            };
            message(
                ctx,
                format!("Declare {} ({}).", name, note),
                format!("declare {} ({}).", name, note),
            )
        }

        Statement::Step { name, increment } => {
            let current = state
                .variables
                .get(name)
                .and_then(Value::as_number)
                .unwrap_or(0.0);
            let next = if *increment { current + 1.0 } else { current - 1.0 };
            let shown = Value::Number(next).to_string();
            state.variables.set(name, Value::Number(next));
            let (op, verb) = if *increment {
                ("++", "incremented")
            } else {
                ("--", "decremented")
            };
            message(
                ctx,
                format!("{} {} to {}", name, verb, shown),
                format!("{}{} → {}", name, op, shown),
            )
        }

        Statement::CompoundAssign { name, op, expr } => {
            let before = state.variables.get(name).cloned();
            let current = before.as_ref().and_then(Value::as_number).unwrap_or(0.0);
            let rhs = Evaluator::new(&state.variables).eval_number(expr);
            let result = rhs.map(|r| match op {
                '+' => current + r,
                '-' => current - r,
                '*' => current * r,
                '/' => current / r,
                _ => current % r,
            });

            match result.filter(|n| n.is_finite()) {
                Some(n) => {
                    let shown_before = before.map_or_else(|| "0".to_string(), |v| v.to_string());
                    let after = Value::Number(n);
                    let shown = after.to_string();
                    state.variables.set(name, after);
                    message(
                        ctx,
                        format!("Update {}: {} → {}", name, shown_before, shown),
                        format!("{} {} → {}", name, shown_before, shown),
                    )
                }
                None => message(
                    ctx,
                    format!("{} {}= {}: value unknown, no variable change.", name, op, expr),
                    "no variable change.".to_string(),
                ),
            }
        }

        Statement::Assign { name, expr } => {
            let value = initial_value(&Evaluator::new(&state.variables), expr);
            let shown = value.to_string();
            match state.variables.set(name, value) {
                None => message(
                    ctx,
                    format!("Set {} = {}", name, shown),
                    format!("set {} = {}", name, shown),
                ),
                Some(before) => message(
                    ctx,
                    format!("Update {}: {} → {}", name, before, shown),
                    format!("{} {} → {}", name, before, shown),
                ),
            }
        }

        Statement::Unrecognized => message(
            ctx,
            "No variable change (not a simple assignment or declaration).".to_string(),
            "no variable change.".to_string(),
        ),
    };

    state.log(site.line, entry);
    Flow::Completed
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn targets(stmt: &Statement) -> Vec<&str> {
        match stmt {
            Statement::Input(call) => call.targets.iter().map(String::as_str).collect(),
            other => panic!("expected input, got {:?}", other),
        }
    }

    #[rstest]
    #[case("scanf(\"%d %d\", &a, &b);", vec!["a", "b"])]
    #[case("cin >> a >> b;", vec!["a", "b"])]
    #[case("std::cin >> total;", vec!["total"])]
    #[case("name = input(\"Your name? \")", vec!["name"])]
    #[case("n = int(input())", vec!["n"])]
    #[case("n = sc.nextInt();", vec!["n"])]
    #[case("int n = sc.nextInt();", vec!["n"])]
    #[case("line = reader.next();", vec!["line"])]
    #[case("let x = prompt(\"x?\");", vec!["x"])]
    fn recognizes_input_shapes(#[case] line: &str, #[case] expected: Vec<&str>) {
        let stmt = classify(line, Context::Statement);
        assert_eq!(targets(&stmt), expected);
    }

    #[test]
    fn input_descriptions() {
        let describe = |line: &str| match classify(line, Context::Statement) {
            Statement::Input(call) => call.description,
            other => panic!("expected input, got {:?}", other),
        };
        assert_eq!(describe("scanf(\"%d\", &n);"), "scanf(\"%d\") → n");
        assert_eq!(describe("cin >> a >> b;"), "cin >> a >> b");
        assert_eq!(describe("x = input()"), "input(): input() for x");
        assert_eq!(describe("x = prompt('Age')"), "prompt(): Age");
        assert_eq!(describe("n = sc.nextInt();"), "Scanner input for n");
    }

    #[test]
    fn scanf_without_targets_is_not_input() {
        assert_eq!(
            classify("scanf(\"%d\");", Context::Statement),
            Statement::Unrecognized
        );
    }

    #[rstest]
    #[case("printf(\"%d\\n\", x);", OutputSyntax::Printf)]
    #[case("System.out.printf(\"%d\", x);", OutputSyntax::ObjectPrintf)]
    #[case("System.out.println(x);", OutputSyntax::ObjectPrint { newline: true })]
    #[case("System.out.print(\"a\");", OutputSyntax::ObjectPrint { newline: false })]
    #[case("console.log(\"sum\", sum);", OutputSyntax::ConsoleLog)]
    #[case("print(x, y)", OutputSyntax::PythonPrint)]
    #[case("print x", OutputSyntax::PythonPrint)]
    #[case("cout << x << endl;", OutputSyntax::StreamInsert)]
    fn recognizes_output_shapes(#[case] line: &str, #[case] expected: OutputSyntax) {
        match classify(line, Context::Statement) {
            Statement::Output(call) => assert_eq!(call.syntax, expected),
            other => panic!("expected output, got {:?}", other),
        }
    }

    #[rstest]
    #[case("int x = 5;", Statement::Declare { name: "x".into(), expr: "5".into() })]
    #[case("let total = a + b", Statement::Declare { name: "total".into(), expr: "a + b".into() })]
    #[case("double d;", Statement::DeclareBare { name: "d".into() })]
    #[case("i++;", Statement::Step { name: "i".into(), increment: true })]
    #[case("--i", Statement::Step { name: "i".into(), increment: false })]
    #[case("i += 2;", Statement::CompoundAssign { name: "i".into(), op: '+', expr: "2".into() })]
    #[case("sum = sum + i;", Statement::Assign { name: "sum".into(), expr: "sum + i".into() })]
    #[case("x == 5;", Statement::Unrecognized)]
    #[case("return 0;", Statement::Unrecognized)]
    #[case("   // only a comment", Statement::Blank)]
    #[case("#include <stdio.h>", Statement::Blank)]
    #[case("}", Statement::Delimiter)]
    fn recognizes_bindings_and_fallbacks(#[case] line: &str, #[case] expected: Statement) {
        assert_eq!(classify(line, Context::Statement), expected);
    }

    #[test]
    fn input_takes_priority_over_assignment() {
        assert!(matches!(
            classify("x = input()", Context::Statement),
            Statement::Input(_)
        ));
    }

    #[test]
    fn clauses_never_request_input_or_print() {
        assert_eq!(
            classify("x = input()", Context::LoopInit),
            Statement::Assign {
                name: "x".into(),
                expr: "input()".into()
            }
        );
        assert_eq!(
            classify("printf(\"hi\")", Context::LoopUpdate),
            Statement::Unrecognized
        );
    }

    #[rstest]
    #[case("x = 1;", vec!["x = 1"])]
    #[case("printf(\"a\"); printf(\"b\");", vec!["printf(\"a\")", "printf(\"b\")"])]
    #[case("s = \"a;b\"; t = 'c;'", vec!["s = \"a;b\"", "t = 'c;'"])]
    #[case("for (i = 0; i < 3; i++) {", vec!["for (i = 0; i < 3; i++) {"])]
    #[case(" ; ;", vec![])]
    fn splits_statements_at_top_level(#[case] line: &str, #[case] expected: Vec<&str>) {
        assert_eq!(split_statements(line), expected);
    }

    #[test]
    fn classify_line_keeps_single_statements_whole() {
        assert_eq!(classify_line("// nothing"), vec![Statement::Blank]);
        assert_eq!(classify_line("i++; j--;").len(), 2);
    }

    fn run(state: &mut RuntimeState, line: &str, context: Context) -> Flow {
        let stmt = classify(line, context);
        execute(
            state,
            &stmt,
            Site {
                line: 1,
                index: 0,
                context,
            },
        )
    }

    #[test]
    fn assignment_logs_declare_then_update() {
        let mut state = RuntimeState::initial(1);
        run(&mut state, "x = 2", Context::Statement);
        run(&mut state, "x = x * 5", Context::Statement);
        run(&mut state, "x += 1", Context::LoopUpdate);

        let messages: Vec<&str> = state.log.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(
            messages,
            vec!["Set x = 2", "Update x: 2 → 10", "for-update: x 10 → 11"]
        );
        assert_eq!(state.variables.get("x"), Some(&Value::Number(11.0)));
    }

    #[test]
    fn non_numeric_initializers_keep_their_text() {
        let mut state = RuntimeState::initial(1);
        run(&mut state, "String s = \"hi\";", Context::Statement);
        run(&mut state, "int y = mystery(3);", Context::Statement);
        assert_eq!(
            state.variables.get("s"),
            Some(&Value::Text("\"hi\"".to_string()))
        );
        assert_eq!(
            state.variables.get("y"),
            Some(&Value::Text("mystery(3)".to_string()))
        );
    }

    #[test]
    fn increments_treat_unbound_and_text_as_zero() {
        let mut state = RuntimeState::initial(1);
        run(&mut state, "count++;", Context::Statement);
        state.variables.set("w", Value::Text("word".to_string()));
        run(&mut state, "w--", Context::Statement);
        assert_eq!(state.variables.get("count"), Some(&Value::Number(1.0)));
        assert_eq!(state.variables.get("w"), Some(&Value::Number(-1.0)));
        assert_eq!(state.log[0].message, "count incremented to 1");
    }

    #[test]
    fn bare_declaration_does_not_clobber() {
        let mut state = RuntimeState::initial(1);
        state.variables.set("n", Value::Number(9.0));
        run(&mut state, "int n;", Context::Statement);
        run(&mut state, "int m;", Context::Statement);
        assert_eq!(state.variables.get("n"), Some(&Value::Number(9.0)));
        assert_eq!(state.variables.get("m"), Some(&Value::Number(0.0)));
    }

    #[test]
    fn input_raises_a_request() {
        let mut state = RuntimeState::initial(1);
        let flow = run(&mut state, "scanf(\"%d\", &n);", Context::Statement);
        assert_eq!(flow, Flow::AwaitingInput);
        let request = state.pending_input.as_ref().expect("pending request");
        assert_eq!(request.variables, vec!["n".to_string()]);
        assert_eq!(request.resume_position, 0);
        assert_eq!(state.log.len(), 1);
    }

    #[test]
    fn output_appends_and_logs_escaped_text() {
        let mut state = RuntimeState::initial(1);
        state.variables.set("x", Value::Number(4.0));
        run(&mut state, "printf(\"x=%d\\n\", x);", Context::Statement);
        assert_eq!(state.output.text(), "x=4\n");
        assert_eq!(state.log[0].message, "Output: x=4\\n");
    }
}
