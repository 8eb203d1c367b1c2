//! Deterministic classification of raw prompts.

use std::sync::LazyLock;

use regex::Regex;

/// Outcome of classifying one raw prompt from the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// End of session; no further input is expected.
    Terminal,
    /// Informational prompt that is auto-acknowledged without a decision.
    /// Carries the step count when the prompt reports one.
    InfoAdvance { steps: Option<u64> },
    /// The prompt asks for a real choice.
    DecisionRequired,
}

static STEPS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"Steps: (\d+)").unwrap());

type Rule = fn(&str) -> Option<Classification>;

/// Rules in match order; the first that fires wins. Anything that matches no
/// rule is a decision prompt.
const RULES: &[Rule] = &[terminal, info_advance];

fn terminal(raw: &str) -> Option<Classification> {
    raw.contains("Goodbye").then_some(Classification::Terminal)
}

fn info_advance(raw: &str) -> Option<Classification> {
    if !raw.contains("Number of results") && !raw.contains("Enter") {
        return None;
    }
    let steps = STEPS_RE
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok());
    Some(Classification::InfoAdvance { steps })
}

/// Classify a raw prompt. Markers are matched by substring containment, not
/// exact match; pure function of the text.
pub fn classify(raw: &str) -> Classification {
    RULES
        .iter()
        .find_map(|rule| rule(raw))
        .unwrap_or(Classification::DecisionRequired)
}
