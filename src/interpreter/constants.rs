// Constants for the simulator

/// Columns a tab character expands to when a program is loaded
pub const DEFAULT_TAB_WIDTH: usize = 4;

/// Step cap applied by the command line front end.
/// The library itself is uncapped unless configured otherwise.
pub const CLI_STEP_LIMIT: usize = 50_000;

/// Autoplay interval of the terminal UI, in milliseconds
pub const AUTOPLAY_INTERVAL_MS: u64 = 400;
