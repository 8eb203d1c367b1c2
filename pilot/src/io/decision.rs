//! Decision-maker abstraction for choosing the next input token.
//!
//! The [`DecisionMaker`] trait decouples the episode loop from the actual
//! generative backend (currently a one-shot command fed over stdin). Tests
//! use scripted decision-makers that return predetermined replies without
//! spawning processes.

use std::process::Command;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use minijinja::{Environment, context};
use tracing::{debug, instrument, warn};

use crate::core::types::Exchange;
use crate::io::process::run_command_with_timeout;

const DECISION_TEMPLATE: &str = include_str!("prompts/decision.md");

/// Guidance persona for the miniKanren stepper, baked into the binary.
/// A config-pointed file can replace it.
pub const DEFAULT_PERSONA: &str = include_str!("prompts/persona.md");

/// Free-text reply from the decision-maker. May be empty; the sanitizer's
/// default covers that case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionReply {
    pub content: String,
}

impl DecisionReply {
    /// Convert into an assistant turn for history append.
    pub fn into_exchange(self) -> Exchange {
        Exchange::assistant(self.content)
    }
}

/// Proposes the next input token given the conversation so far.
pub trait DecisionMaker {
    fn respond(&mut self, exchanges: &[Exchange]) -> Result<DecisionReply>;
}

/// Decision-maker that pipes a rendered transcript into a one-shot command
/// and takes its stdout as the reply.
///
/// The persona preamble is fixed at construction; the exchange sequence
/// grows per call.
pub struct CommandDecisionMaker {
    command: Vec<String>,
    persona: String,
    timeout: Duration,
    output_limit_bytes: usize,
}

impl CommandDecisionMaker {
    pub fn new(
        command: Vec<String>,
        persona: impl Into<String>,
        timeout: Duration,
        output_limit_bytes: usize,
    ) -> Self {
        Self {
            command,
            persona: persona.into(),
            timeout,
            output_limit_bytes,
        }
    }

    fn render(&self, exchanges: &[Exchange]) -> Result<String> {
        let mut env = Environment::new();
        env.add_template("decision", DECISION_TEMPLATE)
            .expect("decision template should be valid");
        let template = env.get_template("decision")?;
        let rendered = template.render(context! {
            persona => self.persona.trim(),
            exchanges => exchanges,
        })?;
        Ok(rendered)
    }
}

impl DecisionMaker for CommandDecisionMaker {
    #[instrument(skip_all, fields(turns = exchanges.len(), timeout_secs = self.timeout.as_secs()))]
    fn respond(&mut self, exchanges: &[Exchange]) -> Result<DecisionReply> {
        let prompt = self.render(exchanges).context("render decision prompt")?;
        let (program, args) = self
            .command
            .split_first()
            .ok_or_else(|| anyhow!("decision command must not be empty"))?;
        let mut cmd = Command::new(program);
        cmd.args(args);

        let output = run_command_with_timeout(
            cmd,
            Some(prompt.as_bytes()),
            self.timeout,
            self.output_limit_bytes,
        )
        .context("run decision command")?;

        if output.timed_out {
            warn!(timeout_secs = self.timeout.as_secs(), "decision command timed out");
            return Err(anyhow!(
                "decision command timed out after {:?}",
                self.timeout
            ));
        }
        if !output.status.success() {
            warn!(exit_code = ?output.status.code(), "decision command failed");
            return Err(anyhow!(
                "decision command failed with status {:?}",
                output.status.code()
            ));
        }

        let content = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if content.is_empty() {
            // Not fatal: the sanitizer will default to `u`.
            warn!("decision command produced no output");
        }
        debug!(bytes = content.len(), "decision reply received");
        Ok(DecisionReply { content })
    }
}
