//! Counted-loop stepping (`for (init; condition; update) { body }`).
//!
//! Adds `impl Simulator` methods for the three loop transitions:
//!
//! - **enter**: the header line runs the init clause, then tests the condition.
//!   A false condition skips the loop entirely; a true one pushes a
//!   [`LoopFrame`] and moves to the first body line.
//! - **end of body**: after the last body line completes, the update clause
//!   runs and the condition is tested again, either jumping back to the first
//!   body line or popping the frame.
//! - **in place**: a loop without body lines stays on its header. Each step
//!   there runs the statements written between its braces, if any, and then
//!   the end-of-body transition.
//! - **continuation**: [`Simulator::complete_line`] decides where control goes
//!   after any line finishes, which is also how a finished inner loop hands
//!   control back to the loop around it.
//!
//! All three happen within the step that triggered them, so each logs into
//! the same snapshot as the statement before it.

use crate::interpreter::engine::Simulator;
use crate::interpreter::expressions::Evaluator;
use crate::interpreter::statements::{classify, classify_line, execute, Context, Flow, Site};
use crate::program::LoopMeta;
use crate::snapshot::LoopFrame;
use tracing::debug;

impl Simulator {
    /// Runs the header transition for `meta`.
    pub(crate) fn enter_loop(&mut self, meta: &LoopMeta) {
        let line = meta.header + 1;

        if !meta.init.is_empty() {
            let init = classify(&meta.init, Context::LoopInit);
            execute(
                &mut self.state,
                &init,
                Site {
                    line,
                    index: meta.header,
                    context: Context::LoopInit,
                },
            );
        }

        if !self.condition_holds(&meta.condition) {
            debug!(header = line, "loop skipped");
            self.state
                .log(line, "Loop condition false on entry, loop skipped.");
            self.complete_line(meta.closing_line);
            return;
        }

        let frame = LoopFrame::activate(meta);
        debug!(header = line, depth = self.state.loops.len() + 1, "loop entered");
        self.state.log(line, "Enter loop (iteration 1).");
        self.state.loops.push(frame);

        if meta.body_len > 0 {
            self.state.position = Some(meta.body_start);
        } else if meta.inline_body.is_empty() {
            self.end_of_body();
        } else {
            self.state.position = Some(meta.header);
        }
    }

    /// One iteration of the innermost loop on its header line.
    pub(crate) fn iterate_in_place(&mut self) {
        let Some((header, body)) = self
            .state
            .current_loop()
            .map(|frame| (frame.header, frame.inline_body.clone()))
        else {
            return;
        };

        if !body.is_empty() {
            let site = Site {
                line: header + 1,
                index: header,
                context: Context::Statement,
            };
            for stmt in classify_line(&body) {
                if execute(&mut self.state, &stmt, site) == Flow::AwaitingInput {
                    debug!(header = header + 1, "inline loop body waiting for input");
                    return;
                }
            }
        }
        self.end_of_body();
    }

    /// Runs the update clause of the innermost loop and re-tests its condition.
    pub(crate) fn end_of_body(&mut self) {
        let Some(frame) = self.state.current_loop().cloned() else {
            return;
        };
        let line = frame.end_line_number();

        if !frame.update.is_empty() {
            let update = classify(&frame.update, Context::LoopUpdate);
            execute(
                &mut self.state,
                &update,
                Site {
                    line,
                    index: frame.header,
                    context: Context::LoopUpdate,
                },
            );
        }

        if !self.condition_holds(&frame.condition) {
            debug!(header = frame.header + 1, iterations = frame.iteration, "loop finished");
            self.state.log(line, "Loop ends: condition is false.");
            self.state.loops.pop();
            self.complete_line(frame.closing_line);
            return;
        }

        let iteration = frame.iteration + 1;
        if let Some(top) = self.state.current_loop_mut() {
            top.iteration = iteration;
        }
        self.state.log(
            line,
            format!("Condition still true, next iteration ({}).", iteration),
        );

        self.state.position = Some(if frame.runs_in_place() {
            frame.header
        } else {
            frame.body_start
        });
    }

    /// Moves control past line `index`, which has just completed.
    ///
    /// Inside the innermost loop's body this either advances to the next body
    /// line or, after the last one, runs the end-of-body transition. Anywhere
    /// else it falls through to the next line.
    pub(crate) fn complete_line(&mut self, index: usize) {
        let in_loop = self
            .state
            .current_loop()
            .map(|frame| (frame.ends_iteration_at(index), frame.contains(index)));

        match in_loop {
            Some((true, _)) => self.end_of_body(),
            Some((false, true)) => self.state.position = Some(index + 1),
            _ => {
                let next = index + 1;
                self.state.position = Some(next);
                if next >= self.program.len() && self.state.loops.is_empty() {
                    self.state.finished = true;
                }
            }
        }
    }

    /// True unless the condition is present and evaluates to false.
    fn condition_holds(&self, condition: &str) -> bool {
        condition.trim().is_empty() || Evaluator::new(&self.state.variables).eval_bool(condition)
    }
}
