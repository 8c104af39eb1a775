//! # Introduction
//!
//! steptrace walks a short program one line at a time without parsing it.
//! Each line is matched against a handful of statement shapes (declarations,
//! assignments, increments, input and output calls in C, Java, Python and
//! JavaScript syntax) and its effect is applied to a flat variable store. A
//! snapshot of the full state is taken after every step, so the trace can be
//! navigated forward and backward through a terminal UI built with
//! [ratatui](https://docs.rs/ratatui).
//!
//! ## Execution pipeline
//!
//! ```text
//! Record → Program → Loop table → Simulator → Snapshots → TUI
//! ```
//!
//! 1. [`program`]: splits the source into lines, pre-analyzes `for` loops
//!    and loads the program record from its storage slot.
//! 2. [`interpreter`]: classifies and executes lines, drives loops and
//!    input requests, and captures [`snapshot::Snapshot`]s at each step.
//! 3. [`memory`]: runtime [`memory::Value`]s in an insertion-ordered
//!    [`memory::VariableStore`].
//! 4. [`snapshot`]: the runtime state aggregate, the output buffer and the
//!    step history.
//! 5. [`ui`]: ratatui-based TUI; not part of the stable library API.
//!
//! ## What is simulated
//!
//! Statements: declarations, assignments, `++`/`--`, compound assignment.
//! Control flow: counted `for` loops only; everything else runs top to bottom.
//! Input: `scanf`, `cin`, `input()`, `Scanner.nextX()`, `prompt()`.
//! Output: `printf`, `System.out.print/println/printf`, `console.log`,
//! `print`, `cout`.

pub mod interpreter;
pub mod memory;
pub mod program;
pub mod snapshot;
pub mod ui;
