//! Shared deterministic types for the interaction protocol.
//!
//! These types define stable contracts between core components. They should not
//! depend on external state or I/O and must remain deterministic across runs.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Legal-input grammar accepted by the driven program: `u`, `undo`, or a
/// period-separated sequence of positive integers (1-indexed choice path).
///
/// Anchored: the whole trimmed line must match, with no surrounding whitespace.
pub static LEGAL_INPUT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(u(ndo)?|(\d+\.)*\d+)$").unwrap());

/// Speaker of one conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One logical turn presented to the decision-maker. Ordering matters;
/// duplicate content is allowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exchange {
    pub role: Role,
    pub content: String,
}

impl Exchange {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// A token that satisfies the legal-input grammar, ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputToken(String);

impl InputToken {
    /// Validate `text` against the grammar. The matched text is kept as-is
    /// (`undo` is not shortened to `u`).
    pub fn parse(text: &str) -> Option<Self> {
        LEGAL_INPUT
            .is_match(text)
            .then(|| Self(text.to_string()))
    }

    /// `"u"`: undo is always a legal recovery action in the protocol.
    pub fn undo() -> Self {
        Self("u".to_string())
    }

    /// `"1"`: the canned acknowledgment for informational prompts.
    pub fn advance() -> Self {
        Self("1".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InputToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
