//! Heuristic line-by-line execution
//!
//! This module provides the stepping logic:
//! - [`engine`]: the [`Simulator`](engine::Simulator) controller with history and input
//! - [`statements`]: classifies a line and applies its effect
//! - [`expressions`]: substitutes variables and evaluates arithmetic and conditions
//! - [`builtins`]: renders output calls (`printf`, `cout`, `print`, ...)
//! - [`errors`]: refusals returned by the controller
//!
//! # Execution Model
//!
//! Nothing is parsed ahead of time except loop headers. Each step looks at
//! one line of text, matches it against known statement shapes, and applies
//! what it recognizes. Anything unrecognized is logged as having no effect,
//! so a step never fails. After each step a snapshot is taken to enable
//! stepping backward.

pub mod builtins;
pub mod constants;
pub mod engine;
pub mod errors;
pub mod expressions;
mod loops;
pub mod statements;
