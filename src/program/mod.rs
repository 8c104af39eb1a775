//! Program text and static analysis
//!
//! This module turns raw source text into the immutable line sequence the
//! tracer steps through, and gathers everything that can be known before the
//! first step:
//! - [`analysis`]: Loop pre-analysis (headers, clauses, body boundaries)
//! - [`payload`]: Loading a program record out of a named storage slot
//!
//! Line indices (0-based) are the unit of position everywhere in the crate.
//! Log entries and the UI show 1-based line numbers.

pub mod analysis;
pub mod payload;

pub use analysis::{analyze_loops, LoopMeta, LoopTable};
pub use payload::{load_record, DirStore, LoadOutcome, MemoryStore, ProgramRecord, SlotStore};

/// An immutable, ordered sequence of source lines
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    lines: Vec<String>,
}

impl Program {
    /// Split `code` into lines, expanding tabs to `tab_width` spaces.
    ///
    /// Whitespace-only code produces an empty program.
    pub fn from_source(code: &str, tab_width: usize) -> Self {
        if code.trim().is_empty() {
            return Program { lines: Vec::new() };
        }

        let tab = " ".repeat(tab_width);
        let lines = code
            .replace('\t', &tab)
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
            .collect();

        Program { lines }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Remove a trailing `//` or `#` comment from a line
pub fn strip_comments(line: &str) -> &str {
    let line = line.find("//").map_or(line, |at| &line[..at]);
    line.find('#').map_or(line, |at| &line[..at])
}
