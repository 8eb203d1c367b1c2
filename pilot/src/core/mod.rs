//! Deterministic, pure logic shared by the driver.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! data structures and return deterministic outputs suitable for tests.

pub mod classifier;
pub mod conversation;
pub mod sanitize;
pub mod stats;
pub mod types;
