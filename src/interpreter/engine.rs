// Simulation controller: stepping, history and input

use crate::interpreter::constants::DEFAULT_TAB_WIDTH;
use crate::interpreter::errors::SimError;
use crate::interpreter::statements::{classify_line, execute, Context, Flow, Site};
use crate::memory::{Value, VariableStore};
use crate::program::{analyze_loops, LoopTable, Program, ProgramRecord};
use crate::snapshot::{History, InputRequest, LogEntry, LoopFrame, OutputBuffer, RuntimeState, Snapshot};
use tracing::{debug, info, warn};

/// Tunables for one simulation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatorConfig {
    /// Columns a tab expands to when the program is split into lines
    pub tab_width: usize,
    /// Maximum forward steps before stepping is refused; `None` is uncapped
    pub step_limit: Option<usize>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        SimulatorConfig {
            tab_width: DEFAULT_TAB_WIDTH,
            step_limit: None,
        }
    }
}

/// Steps through a program one line at a time
pub struct Simulator {
    /// Where the program came from
    record: ProgramRecord,

    /// Source lines
    pub(crate) program: Program,

    /// Loop structure, computed once at load
    loops: LoopTable,

    /// Everything stepping can change
    pub(crate) state: RuntimeState,

    /// One snapshot per completed step, plus the initial one
    history: History,

    config: SimulatorConfig,
}

impl Simulator {
    /// Create a simulator positioned before the first line of `record`
    pub fn new(record: ProgramRecord, config: SimulatorConfig) -> Self {
        let program = Program::from_source(&record.code, config.tab_width);
        let loops = analyze_loops(&program);
        info!(
            lines = program.len(),
            loops = loops.len(),
            unmatched = loops.unmatched().len(),
            "program loaded"
        );

        let mut sim = Simulator {
            record,
            program,
            loops,
            state: RuntimeState::default(),
            history: History::new(),
            config,
        };
        sim.reset();
        sim
    }

    /// Create a simulator for bare source text with default settings
    pub fn from_source(code: &str) -> Self {
        Self::new(
            ProgramRecord {
                code: code.to_string(),
                ..Default::default()
            },
            SimulatorConfig::default(),
        )
    }

    /// Execute exactly one line (or loop transition) and record a snapshot
    pub fn step_forward(&mut self) -> Result<(), SimError> {
        if self.program.is_empty() {
            return Err(SimError::EmptyProgram);
        }
        if self.state.is_waiting_for_input() {
            return Err(SimError::AwaitingInput);
        }
        if self.state.finished {
            return Err(SimError::Finished);
        }
        if let Some(limit) = self.config.step_limit {
            if self.steps_taken() >= limit {
                warn!(limit, "step limit reached");
                return Err(SimError::StepLimitReached { limit });
            }
        }

        self.execute_step();
        self.take_snapshot();
        debug!(
            position = ?self.state.position,
            finished = self.state.finished,
            depth = self.state.loops.len(),
            "stepped"
        );
        Ok(())
    }

    /// Return to the state before the most recent step
    pub fn step_backward(&mut self) -> Result<(), SimError> {
        if self.state.is_waiting_for_input() {
            return Err(SimError::AwaitingInput);
        }
        match self.history.rewind() {
            Some(snapshot) => {
                self.state = snapshot.restore();
                debug!(position = ?self.state.position, "stepped back");
                Ok(())
            }
            None => Err(SimError::AtStart),
        }
    }

    /// Discard all progress and start over from the first line
    pub fn reset(&mut self) {
        self.state = RuntimeState::initial(self.program.len());
        self.history.clear();
        self.take_snapshot();
    }

    /// Answer the pending input request with whitespace-separated tokens.
    ///
    /// Targets take tokens in order. When there are fewer tokens than
    /// targets the last token is reused; no tokens at all reads as `0`.
    pub fn submit_input(&mut self, raw: &str) -> Result<(), SimError> {
        let Some(request) = self.state.pending_input.take() else {
            return Err(SimError::NoPendingInput);
        };

        let tokens: Vec<&str> = raw.split_whitespace().collect();
        let mut assigned = Vec::with_capacity(request.variables.len());
        for (i, name) in request.variables.iter().enumerate() {
            let token = tokens.get(i).or(tokens.last()).copied().unwrap_or("0");
            let value = Value::from_token(token);
            assigned.push(format!("{}={}", name, value));
            self.state.variables.set(name, value);
        }

        info!(line = request.line, values = %assigned.join(", "), "input submitted");
        self.state
            .log(request.line, format!("User input: {}", assigned.join(", ")));
        self.complete_line(request.resume_position);
        self.take_snapshot();
        Ok(())
    }

    /// Restart and step until execution reaches 0-based line `target`.
    ///
    /// Stops early when execution finishes or asks for input. Hitting the step
    /// limit on the way is reported as an error.
    pub fn run_to_line(&mut self, target: usize) -> Result<(), SimError> {
        if self.state.is_waiting_for_input() {
            return Err(SimError::AwaitingInput);
        }
        self.reset();

        while !self.state.finished
            && !self.state.is_waiting_for_input()
            && self.state.position.is_some_and(|p| p < target)
        {
            match self.step_forward() {
                Ok(()) => {}
                Err(e @ SimError::StepLimitReached { .. }) => return Err(e),
                Err(_) => break,
            }
        }
        debug!(target, position = ?self.state.position, "ran to line");
        Ok(())
    }

    // ========== Stepping internals ==========

    /// One unit of work at the current position
    fn execute_step(&mut self) {
        let Some(index) = self.state.position.filter(|&p| p < self.program.len()) else {
            self.state.finished = true;
            self.state.log(self.program.len(), "Program finished.");
            return;
        };

        // A loop without body lines iterates from its header
        let in_place = self
            .state
            .current_loop()
            .is_some_and(|frame| frame.header == index && frame.runs_in_place());
        if in_place {
            self.iterate_in_place();
            return;
        }

        if let Some(meta) = self.loops.get(index).cloned() {
            self.enter_loop(&meta);
            return;
        }

        let statements = classify_line(self.program.line(index).unwrap_or(""));
        let site = Site {
            line: index + 1,
            index,
            context: Context::Statement,
        };
        for stmt in &statements {
            // Statements after an input request on the same line are not run
            if execute(&mut self.state, stmt, site) == Flow::AwaitingInput {
                debug!(line = index + 1, "waiting for input");
                return;
            }
        }
        self.complete_line(index);
    }

    fn take_snapshot(&mut self) {
        self.history.push(Snapshot::capture(&self.state));
    }

    fn steps_taken(&self) -> usize {
        self.history.len().saturating_sub(1)
    }

    // ========== Getter methods for UI ==========

    pub fn record(&self) -> &ProgramRecord {
        &self.record
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn loop_table(&self) -> &LoopTable {
        &self.loops
    }

    pub fn state(&self) -> &RuntimeState {
        &self.state
    }

    /// 0-based index of the next line to execute
    pub fn position(&self) -> Option<usize> {
        self.state.position
    }

    pub fn variables(&self) -> &VariableStore {
        &self.state.variables
    }

    pub fn log(&self) -> &[LogEntry] {
        &self.state.log
    }

    pub fn output(&self) -> &OutputBuffer {
        &self.state.output
    }

    /// Active loops, outermost first
    pub fn loop_stack(&self) -> &[LoopFrame] {
        &self.state.loops
    }

    pub fn pending_input(&self) -> Option<&InputRequest> {
        self.state.pending_input.as_ref()
    }

    pub fn is_finished(&self) -> bool {
        self.state.finished
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn can_step_back(&self) -> bool {
        self.history.len() >= 2 && !self.state.is_waiting_for_input()
    }

    pub fn can_step_forward(&self) -> bool {
        !self.program.is_empty()
            && !self.state.finished
            && !self.state.is_waiting_for_input()
            && self
                .config
                .step_limit
                .map_or(true, |limit| self.steps_taken() < limit)
    }

    /// Describe the line about to run: `Line 3: x = x + 1;`
    pub fn current_line_description(&self) -> String {
        match self.state.position {
            _ if self.state.finished => "Program finished.".to_string(),
            Some(p) if p < self.program.len() => {
                let text = self.program.line(p).unwrap_or("").trim();
                format!("Line {}: {}", p + 1, text)
            }
            Some(_) => "Program finished.".to_string(),
            None => "No program loaded.".to_string(),
        }
    }
}
