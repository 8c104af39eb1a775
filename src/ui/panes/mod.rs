//! TUI pane rendering modules
//!
//! This module provides the rendering logic for all visual panes in the TUI,
//! organized by responsibility for maintainability.
//!
//! # Pane Modules
//!
//! - [`source`]: Source code display with syntax highlighting, current line and cursor
//! - [`variables`]: Variable bindings and the active loop stack
//! - [`log`]: The execution log, one entry per effect
//! - [`terminal`]: Program output from print statements
//! - [`status`]: Status bar with keybindings and execution state
//! - `utils`: Block and scroll helpers shared by the list panes
//!
//! # Architecture
//!
//! Each pane module exports a primary `render_*` function. Panes are
//! stateless apart from the scroll offsets the app passes in, and read the
//! simulator only through borrowed data.

mod utils;

pub mod log;
pub mod source;
pub mod status;
pub mod terminal;
pub mod variables;

// Re-export render functions for convenience
pub use log::render_log_pane;
pub use source::{render_source_pane, SourceRenderData, SourceScrollState};
pub use status::{render_status_bar, StatusRenderData};
pub use terminal::render_terminal_pane;
pub use variables::{render_variables_pane, VariablesRenderData};
