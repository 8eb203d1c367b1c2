//! Side-effecting collaborators for the driver.

pub mod config;
pub mod decision;
pub mod few_shots;
pub mod process;
pub mod session_log;
pub mod transport;
