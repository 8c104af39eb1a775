//! Loop pre-analysis
//!
//! Runs once per loaded [`Program`], before any stepping. Every line that
//! starts with a counted-loop header `for (init; condition; update)` is
//! located together with its body:
//!
//! ```text
//! for (i = 0; i < 3; i++) {    <- header, opening brace on the same line
//!     sum = sum + i;           <- body_start
//!     count++;                 <- last body line
//! }                            <- closing_line
//! ```
//!
//! The opening brace may also sit on a later line. The closing brace is found
//! by depth counting from the opening brace forward. When both braces sit on
//! one line, as in `for (i = 0; i < 5; i++) { sum = sum + i; }`, the text
//! between them is kept as [`LoopMeta::inline_body`]. A header whose braces
//! cannot be matched is left out of the table and recorded in
//! [`LoopTable::unmatched`]; the tracer then runs its lines as plain
//! statements.

use super::Program;
use once_cell::sync::Lazy;
use regex::Regex;
use rustc_hash::FxHashMap;

static FOR_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^for\s*\(([^)]*)\)").expect("loop header pattern"));

/// Static description of one loop, keyed by its header line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopMeta {
    pub header: usize,
    pub body_start: usize,
    /// Number of body lines; zero for `for (...) { }` style loops
    pub body_len: usize,
    pub closing_line: usize,
    /// Statements written between braces that open and close on one line
    pub inline_body: String,
    pub init: String,
    pub condition: String,
    pub update: String,
}

impl LoopMeta {
    /// Index of the last body line, if the body has any lines
    pub fn body_end(&self) -> Option<usize> {
        (self.body_len > 0).then(|| self.body_start + self.body_len - 1)
    }
}

/// All analyzable loops of a program
#[derive(Debug, Clone, Default)]
pub struct LoopTable {
    loops: FxHashMap<usize, LoopMeta>,
    unmatched: Vec<usize>,
}

impl LoopTable {
    /// Loop whose header is at `index`
    pub fn get(&self, index: usize) -> Option<&LoopMeta> {
        self.loops.get(&index)
    }

    pub fn len(&self) -> usize {
        self.loops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loops.is_empty()
    }

    /// Header lines that looked like loops but whose braces never matched
    pub fn unmatched(&self) -> &[usize] {
        &self.unmatched
    }
}

/// Scan `program` for loop headers and their bodies
pub fn analyze_loops(program: &Program) -> LoopTable {
    let mut table = LoopTable::default();

    for (index, raw) in program.lines().iter().enumerate() {
        let stripped = strip_line_comment(raw).trim();
        let Some(caps) = FOR_HEADER.captures(stripped) else {
            continue;
        };

        let clauses: Vec<&str> = caps[1].split(';').collect();
        if clauses.len() < 2 {
            continue;
        }

        let meta = find_opening_brace(program, index)
            .and_then(|brace| find_closing_brace(program, brace).map(|close| (brace, close)));

        let Some((brace_line, closing_line)) = meta else {
            tracing::warn!(line = index + 1, "loop braces do not match, running body as plain lines");
            table.unmatched.push(index);
            continue;
        };

        let inline_body = if closing_line == brace_line {
            inline_body(program, index, brace_line)
        } else {
            String::new()
        };

        table.loops.insert(
            index,
            LoopMeta {
                header: index,
                body_start: brace_line + 1,
                body_len: closing_line.saturating_sub(brace_line + 1),
                closing_line,
                inline_body,
                init: clauses[0].trim().to_string(),
                condition: clauses[1].trim().to_string(),
                update: clauses[2..].join(";").trim().to_string(),
            },
        );
    }

    table
}

fn strip_line_comment(line: &str) -> &str {
    line.find("//").map_or(line, |at| &line[..at])
}

/// Line holding the loop's opening brace: the header itself when a `{`
/// follows the closing parenthesis, otherwise the next line containing one.
fn find_opening_brace(program: &Program, header: usize) -> Option<usize> {
    let line = strip_line_comment(program.line(header)?);
    if let Some(paren) = line.find(')') {
        if line[paren + 1..].contains('{') {
            return Some(header);
        }
    }

    (header + 1..program.len()).find(|&j| {
        program
            .line(j)
            .is_some_and(|l| strip_line_comment(l).contains('{'))
    })
}

/// Line where brace depth, counted from `brace_line`, returns to zero.
/// A `}}` line closes the inner block at its first brace.
fn find_closing_brace(program: &Program, brace_line: usize) -> Option<usize> {
    let mut depth: i64 = 0;
    for (j, line) in program.lines().iter().enumerate().skip(brace_line) {
        for ch in strip_line_comment(line).chars() {
            match ch {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(j);
                    }
                }
                _ => {}
            }
        }
    }
    None
}

/// Text between the loop's braces when they open and close on `brace_line`
fn inline_body(program: &Program, header: usize, brace_line: usize) -> String {
    let Some(line) = program.line(brace_line).map(strip_line_comment) else {
        return String::new();
    };
    let from = if brace_line == header {
        line.find(')').map_or(0, |paren| paren + 1)
    } else {
        0
    };
    let Some(open) = line[from..].find('{').map(|at| from + at) else {
        return String::new();
    };

    let mut depth = 0;
    for (at, ch) in line[open..].char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return line[open + 1..open + at].trim().to_string();
                }
            }
            _ => {}
        }
    }
    String::new()
}
