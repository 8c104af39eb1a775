//! The runtime state aggregate
//!
//! [`RuntimeState`] is the only mutable state of a simulation. The
//! controller owns it and lends it to the classifier and loop engine for the
//! duration of one operation; a [`Snapshot`](super::Snapshot) copies it whole.

use crate::memory::VariableStore;
use crate::program::LoopMeta;

/// One line of the execution log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// 1-based source line number
    pub line: usize,
    pub message: String,
}

/// An active loop: static metadata plus the iteration counter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopFrame {
    pub header: usize,
    pub body_start: usize,
    pub body_len: usize,
    pub closing_line: usize,
    pub inline_body: String,
    pub condition: String,
    pub update: String,
    /// Starts at 1 on entry
    pub iteration: usize,
}

impl LoopFrame {
    pub fn activate(meta: &LoopMeta) -> Self {
        LoopFrame {
            header: meta.header,
            body_start: meta.body_start,
            body_len: meta.body_len,
            closing_line: meta.closing_line,
            inline_body: meta.inline_body.clone(),
            condition: meta.condition.clone(),
            update: meta.update.clone(),
            iteration: 1,
        }
    }

    /// Whether `index` is a body line of this loop
    pub fn contains(&self, index: usize) -> bool {
        index >= self.body_start && index < self.body_start + self.body_len
    }

    pub fn is_last_body_line(&self, index: usize) -> bool {
        self.body_len > 0 && index == self.body_start + self.body_len - 1
    }

    /// Whether completing `index` ends an iteration: the last body line, the
    /// closing line when another block closes on it too (`}}`), or the header
    /// of a loop that iterates in place
    pub fn ends_iteration_at(&self, index: usize) -> bool {
        self.is_last_body_line(index)
            || index == self.closing_line
            || (self.runs_in_place() && index == self.header)
    }

    /// Loops with no body lines stay on their header between iterations
    pub fn runs_in_place(&self) -> bool {
        self.body_len == 0
    }

    /// 1-based line number the end-of-body transition is logged against:
    /// the last body line, or the opening brace line for an empty body
    pub fn end_line_number(&self) -> usize {
        self.body_start + self.body_len
    }
}

/// A pause waiting for externally supplied values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputRequest {
    /// Targets in the order they receive tokens; never empty
    pub variables: Vec<String>,
    /// 1-based number of the requesting line
    pub line: usize,
    /// Index of the requesting statement. Stepping resumes as if that
    /// statement had just completed.
    pub resume_position: usize,
    pub description: String,
}

/// Accumulated program output
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputBuffer {
    fragments: Vec<String>,
}

impl OutputBuffer {
    /// Append one emitted fragment
    pub fn print(&mut self, text: String) {
        self.fragments.push(text);
    }

    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    /// Everything emitted so far, concatenated in order
    pub fn text(&self) -> String {
        self.fragments.concat()
    }

    /// Output split into display lines
    pub fn lines(&self) -> Vec<String> {
        let text = self.text();
        let mut result: Vec<String> = text.split('\n').map(|s| s.to_string()).collect();
        // Remove trailing empty string if text ended with newline
        if result.last().is_some_and(|s| s.is_empty()) {
            result.pop();
        }
        result
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}

/// Everything stepping can change
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuntimeState {
    /// `None` until a non-empty program is loaded
    pub position: Option<usize>,
    pub variables: VariableStore,
    pub log: Vec<LogEntry>,
    pub loops: Vec<LoopFrame>,
    pub finished: bool,
    pub output: OutputBuffer,
    pub pending_input: Option<InputRequest>,
}

impl RuntimeState {
    /// Fresh state for a program of `program_len` lines
    pub fn initial(program_len: usize) -> Self {
        RuntimeState {
            position: (program_len > 0).then_some(0),
            ..Default::default()
        }
    }

    pub fn log(&mut self, line: usize, message: impl Into<String>) {
        self.log.push(LogEntry {
            line,
            message: message.into(),
        });
    }

    /// Innermost active loop
    pub fn current_loop(&self) -> Option<&LoopFrame> {
        self.loops.last()
    }

    pub fn current_loop_mut(&mut self) -> Option<&mut LoopFrame> {
        self.loops.last_mut()
    }

    pub fn is_waiting_for_input(&self) -> bool {
        self.pending_input.is_some()
    }
}
