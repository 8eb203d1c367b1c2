//! Stable exit codes for pilot CLI commands.

/// Command succeeded; a run reached the terminal prompt.
pub const OK: i32 = 0;
/// Invalid config, or a transport/decision failure ended the run.
pub const INVALID: i32 = 1;
/// The run stopped at the iteration bound without a terminal prompt.
pub const LIMIT: i32 = 2;
