//! LLM-guided driver for an external interactive search program.
//!
//! The driven program prints a textual prompt at each step of its search;
//! this crate classifies the prompt and answers with a legal input token,
//! consulting a generative decision command when a real choice is required.
//! The architecture enforces a strict separation:
//!
//! - **[`core`]**: Pure, deterministic logic (classification, reply
//!   sanitizing, conversation state, statistics). No I/O, fully testable in
//!   isolation.
//! - **[`io`]**: Side-effecting collaborators (child processes, config,
//!   session artifacts). Behind traits to enable scripting in tests.
//!
//! [`episode`] coordinates the two into the interaction-driving loop.

pub mod core;
pub mod episode;
pub mod exit_codes;
pub mod io;
pub mod logging;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
