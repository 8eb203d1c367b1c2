//! Per-episode conversation history presented to the decision-maker.

use crate::core::types::Exchange;

/// How per-episode turns are pruned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrimPolicy {
    /// Keep every turn for the life of the episode, even across advances.
    None,
    /// Keep at most `max_turns` recent turns; still resets on advance.
    FixedWindow { max_turns: usize },
    /// Clear all turns back to the base whenever the search advances.
    #[default]
    ResetOnAdvance,
}

/// Ordered exchange history for the current episode.
///
/// The first `base_len` entries are the fixed base (empty, or a few-shot
/// preamble) and are never trimmed. With the default policy the turns are
/// cleared on every advance, so the decision-maker never sees stale context
/// from a previous, now-irrelevant search branch.
#[derive(Debug, Clone)]
pub struct ConversationState {
    entries: Vec<Exchange>,
    base_len: usize,
    policy: TrimPolicy,
}

impl ConversationState {
    pub fn new(base: Vec<Exchange>, policy: TrimPolicy) -> Self {
        let base_len = base.len();
        Self {
            entries: base,
            base_len,
            policy,
        }
    }

    /// Append one turn, then apply the fixed-window trim if configured.
    pub fn append(&mut self, exchange: Exchange) {
        self.entries.push(exchange);
        if let TrimPolicy::FixedWindow { max_turns } = self.policy {
            while self.entries.len() - self.base_len > max_turns {
                self.entries.remove(self.base_len);
            }
        }
    }

    /// Drop all turns, keeping the base.
    pub fn reset(&mut self) {
        self.entries.truncate(self.base_len);
    }

    /// Notify that the search advanced (the current branch is done).
    pub fn on_advance(&mut self) {
        match self.policy {
            TrimPolicy::None => {}
            TrimPolicy::FixedWindow { .. } | TrimPolicy::ResetOnAdvance => self.reset(),
        }
    }

    /// Read-only view of base + turns, in chronological order.
    pub fn snapshot(&self) -> &[Exchange] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn base_len(&self) -> usize {
        self.base_len
    }
}
