//! The interaction-driving loop: one episode against the external program.

use std::io::Write;

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::core::classifier::{Classification, classify};
use crate::core::conversation::ConversationState;
use crate::core::sanitize::sanitize;
use crate::core::stats::StatsRecorder;
use crate::core::types::{Exchange, InputToken};
use crate::io::decision::DecisionMaker;
use crate::io::session_log::SessionLog;
use crate::io::transport::Transport;

/// Why the episode loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EpisodeStop {
    /// The program said goodbye.
    Terminal,
    /// The fixed iteration bound was reached first.
    IterationLimit,
}

/// Summary of one episode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeOutcome {
    /// Iterations performed (decision and advance cycles both count).
    pub iterations: u32,
    pub stop: EpisodeStop,
    /// Ordered step counts parsed from informational prompts.
    pub steps: Vec<u64>,
}

/// Knobs for the episode loop, passed in explicitly rather than read from
/// process-wide state.
#[derive(Debug, Clone)]
pub struct EpisodeConfig {
    /// Hard bound on loop iterations.
    pub max_iterations: u32,
    /// Canned acknowledgment sent for informational prompts.
    pub advance_token: InputToken,
}

impl Default for EpisodeConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            advance_token: InputToken::advance(),
        }
    }
}

/// Drive one episode: read prompts, classify them, and answer until the
/// program says goodbye or the iteration bound is hit.
///
/// Transport and decision-maker failures are fatal and propagate; the
/// step-count summary collected so far is still written to the session log
/// before the error leaves this function.
pub fn run_episode<T, D, W>(
    transport: &mut T,
    decision_maker: &mut D,
    log: &mut SessionLog<W>,
    mut conversation: ConversationState,
    config: &EpisodeConfig,
) -> Result<EpisodeOutcome>
where
    T: Transport,
    D: DecisionMaker,
    W: Write,
{
    let mut stats = StatsRecorder::new();
    let attempt = run_loop(
        transport,
        decision_maker,
        log,
        &mut conversation,
        config,
        &mut stats,
    );
    let summary = log.record_summary(stats.summary());

    let (iterations, stop) = attempt?;
    summary?;
    Ok(EpisodeOutcome {
        iterations,
        stop,
        steps: stats.summary().to_vec(),
    })
}

fn run_loop<T, D, W>(
    transport: &mut T,
    decision_maker: &mut D,
    log: &mut SessionLog<W>,
    conversation: &mut ConversationState,
    config: &EpisodeConfig,
    stats: &mut StatsRecorder,
) -> Result<(u32, EpisodeStop)>
where
    T: Transport,
    D: DecisionMaker,
    W: Write,
{
    let mut iterations = 0u32;
    while iterations < config.max_iterations {
        let prompt = transport.read_prompt()?;
        log.record_prompt(&prompt)?;

        match classify(&prompt) {
            Classification::Terminal => {
                info!(iterations, "program said goodbye");
                return Ok((iterations, EpisodeStop::Terminal));
            }
            Classification::InfoAdvance { steps } => {
                if let Some(steps) = steps {
                    stats.record(steps);
                    info!(steps, taken = ?stats.summary(), "search advanced");
                }
                // The search reset; stale branch context would mislead the
                // decision-maker.
                conversation.on_advance();
                transport.send(config.advance_token.as_str())?;
            }
            Classification::DecisionRequired => {
                conversation.append(Exchange::user(prompt));
                let reply = decision_maker.respond(conversation.snapshot())?;
                log.record_reply(&reply.content)?;

                let sanitized = sanitize(&reply.content);
                if sanitized.is_defaulted() {
                    warn!("no grammar-valid line in reply, sending undo");
                }
                conversation.append(reply.into_exchange());

                let token = sanitized.into_token();
                debug!(token = token.as_str(), "decision sent");
                transport.send(token.as_str())?;
            }
        }
        iterations += 1;
    }

    info!(
        max_iterations = config.max_iterations,
        "iteration bound reached"
    );
    Ok((iterations, EpisodeStop::IterationLimit))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::conversation::TrimPolicy;
    use crate::test_support::{FailingDecisionMaker, ScriptedDecisionMaker, ScriptedTransport};

    fn empty_conversation() -> ConversationState {
        ConversationState::new(Vec::new(), TrimPolicy::default())
    }

    #[test]
    fn terminal_prompt_stops_without_sending() {
        let mut transport = ScriptedTransport::new(["Goodbye"]);
        let mut decider = ScriptedDecisionMaker::new(Vec::<String>::new());
        let mut log = SessionLog::new(Vec::<u8>::new());

        let outcome = run_episode(
            &mut transport,
            &mut decider,
            &mut log,
            empty_conversation(),
            &EpisodeConfig::default(),
        )
        .expect("episode");

        assert_eq!(outcome.stop, EpisodeStop::Terminal);
        assert_eq!(outcome.iterations, 0);
        assert!(transport.sent.is_empty());
        assert_eq!(decider.calls, 0);
    }

    #[test]
    fn advance_prompt_records_steps_and_skips_the_decider() {
        let mut transport = ScriptedTransport::new([
            "Number of results: 0. Steps: 7. [u]ndo or choice number>",
            "Goodbye",
        ]);
        let mut decider = ScriptedDecisionMaker::new(Vec::<String>::new());
        let mut log = SessionLog::new(Vec::<u8>::new());

        let outcome = run_episode(
            &mut transport,
            &mut decider,
            &mut log,
            empty_conversation(),
            &EpisodeConfig::default(),
        )
        .expect("episode");

        assert_eq!(outcome.steps, vec![7]);
        assert_eq!(transport.sent, vec!["1"]);
        assert_eq!(decider.calls, 0);
    }

    #[test]
    fn decision_prompt_sends_the_sanitized_reply() {
        let mut transport =
            ScriptedTransport::new(["[u]ndo, or choices (period-separated)>", "Goodbye"]);
        let mut decider =
            ScriptedDecisionMaker::new(["I will pick branch 2, then sub-branch 1.\n2.1"]);
        let mut log = SessionLog::new(Vec::<u8>::new());

        let outcome = run_episode(
            &mut transport,
            &mut decider,
            &mut log,
            empty_conversation(),
            &EpisodeConfig::default(),
        )
        .expect("episode");

        assert_eq!(transport.sent, vec!["2.1"]);
        assert_eq!(outcome.iterations, 1);
        assert_eq!(decider.calls, 1);
    }

    #[test]
    fn loop_stops_exactly_at_the_iteration_bound() {
        let mut transport = ScriptedTransport::with_repeat("Enter a count>");
        let mut decider = ScriptedDecisionMaker::new(Vec::<String>::new());
        let mut log = SessionLog::new(Vec::<u8>::new());
        let config = EpisodeConfig {
            max_iterations: 5,
            ..EpisodeConfig::default()
        };

        let outcome = run_episode(
            &mut transport,
            &mut decider,
            &mut log,
            empty_conversation(),
            &config,
        )
        .expect("episode");

        assert_eq!(outcome.stop, EpisodeStop::IterationLimit);
        assert_eq!(outcome.iterations, 5);
        assert_eq!(transport.sent.len(), 5);
    }

    #[test]
    fn decider_failure_still_flushes_the_summary() {
        let mut transport = ScriptedTransport::new([
            "Number of results: 0. Steps: 3. [u]ndo or choice number>",
            "[u]ndo, or choices (period-separated)>",
        ]);
        let mut decider = FailingDecisionMaker;
        let mut log = SessionLog::new(Vec::<u8>::new());

        let err = run_episode(
            &mut transport,
            &mut decider,
            &mut log,
            empty_conversation(),
            &EpisodeConfig::default(),
        )
        .unwrap_err();

        assert!(err.to_string().contains("decision backend unavailable"));
        let text = String::from_utf8(log.into_inner()).expect("utf8");
        assert!(text.contains("steps taken: [3]"));
    }
}
