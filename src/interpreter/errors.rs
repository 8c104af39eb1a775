//! Refusal types for the simulation controller
//!
//! No statement can fail: unknown text is logged and execution moves on.
//! What *can* fail is a request to the controller that does not make sense
//! in the current state, such as stepping past the end or submitting input
//! nobody asked for. Those come back as [`SimError`] and leave the state
//! untouched.

use thiserror::Error;

/// A controller request that was refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    /// Execution already reached the end of the program
    #[error("execution has finished")]
    Finished,

    /// A statement is waiting for input and must be answered first
    #[error("waiting for input")]
    AwaitingInput,

    /// There is no earlier snapshot to return to
    #[error("already at the beginning of execution")]
    AtStart,

    /// Input was submitted while no statement asked for any
    #[error("no input is being requested")]
    NoPendingInput,

    /// The loaded program has no lines
    #[error("no program loaded")]
    EmptyProgram,

    /// The configured step cap was hit
    #[error("step limit of {limit} reached")]
    StepLimitReached { limit: usize },
}
