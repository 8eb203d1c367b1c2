//! Test-only scripted collaborators for the episode loop.

use std::collections::VecDeque;

use anyhow::{Result, anyhow};

use crate::core::types::Exchange;
use crate::io::decision::{DecisionMaker, DecisionReply};
use crate::io::transport::Transport;

/// Transport that replays scripted prompts and records every sent token.
pub struct ScriptedTransport {
    prompts: VecDeque<String>,
    repeat: Option<String>,
    /// Tokens sent so far, in order.
    pub sent: Vec<String>,
}

impl ScriptedTransport {
    pub fn new(prompts: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            prompts: prompts.into_iter().map(Into::into).collect(),
            repeat: None,
            sent: Vec::new(),
        }
    }

    /// A transport that serves `prompt` forever (never terminal).
    pub fn with_repeat(prompt: impl Into<String>) -> Self {
        Self {
            prompts: VecDeque::new(),
            repeat: Some(prompt.into()),
            sent: Vec::new(),
        }
    }
}

impl Transport for ScriptedTransport {
    fn read_prompt(&mut self) -> Result<String> {
        if let Some(prompt) = self.prompts.pop_front() {
            return Ok(prompt);
        }
        self.repeat
            .clone()
            .ok_or_else(|| anyhow!("scripted transport exhausted"))
    }

    fn send(&mut self, token: &str) -> Result<()> {
        self.sent.push(token.to_string());
        Ok(())
    }
}

/// Decision-maker that replays scripted replies and records what it saw.
pub struct ScriptedDecisionMaker {
    replies: VecDeque<String>,
    /// Number of calls made.
    pub calls: u32,
    /// Snapshot length observed at each call.
    pub seen_lens: Vec<usize>,
}

impl ScriptedDecisionMaker {
    pub fn new(replies: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            replies: replies.into_iter().map(Into::into).collect(),
            calls: 0,
            seen_lens: Vec::new(),
        }
    }
}

impl DecisionMaker for ScriptedDecisionMaker {
    fn respond(&mut self, exchanges: &[Exchange]) -> Result<DecisionReply> {
        self.calls += 1;
        self.seen_lens.push(exchanges.len());
        let content = self
            .replies
            .pop_front()
            .ok_or_else(|| anyhow!("scripted decision-maker exhausted"))?;
        Ok(DecisionReply { content })
    }
}

/// Decision-maker whose every call fails, for fatal-path tests.
pub struct FailingDecisionMaker;

impl DecisionMaker for FailingDecisionMaker {
    fn respond(&mut self, _exchanges: &[Exchange]) -> Result<DecisionReply> {
        Err(anyhow!("decision backend unavailable"))
    }
}
