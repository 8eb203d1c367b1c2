//! Step-count accumulation across one run.

/// Append-only sequence of step counts parsed from informational prompts.
///
/// Raw accumulation only; consumers compute aggregates externally.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsRecorder {
    steps: Vec<u64>,
}

impl StatsRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one step count. Records are never mutated after append.
    pub fn record(&mut self, steps: u64) {
        self.steps.push(steps);
    }

    /// The ordered sequence recorded so far.
    pub fn summary(&self) -> &[u64] {
        &self.steps
    }
}
