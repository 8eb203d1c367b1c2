//! Episode-level tests for full interaction scenarios.
//!
//! These drive `run_episode` with scripted collaborators to verify
//! end-to-end behavior: classification routing, conversation hygiene,
//! session log contents, and loop termination. Also covers `pilot run`
//! against a shell-scripted program.

use std::fs;
use std::process::Command;

use pilot::core::conversation::{ConversationState, TrimPolicy};
use pilot::core::types::Exchange;
use pilot::episode::{EpisodeConfig, EpisodeStop, run_episode};
use pilot::exit_codes;
use pilot::io::session_log::SessionLog;
use pilot::test_support::{ScriptedDecisionMaker, ScriptedTransport};

/// Full mixed-prompt episode:
///
/// 1. Decision prompt → decider picks `2.1` after prose
/// 2. Result-count prompt (`Steps: 7`) → canned `1`, no decider call
/// 3. Decision prompt → decider undoes
/// 4. Goodbye
///
/// Tests: routing, step recording, conversation reset between branches,
/// sanitizer integration, and the log artifact.
#[test]
fn mixed_episode_routes_records_and_resets() {
    let mut transport = ScriptedTransport::new([
        "depth 1 constraints\n[u]ndo, or choices (period-separated)>",
        "Number of results: 0. Steps: 7. [u]ndo or choice number>",
        "depth 1 constraints again\n[u]ndo, or choices (period-separated)>",
        "Goodbye",
    ]);
    let mut decider = ScriptedDecisionMaker::new([
        "I will pick branch 2, then sub-branch 1.\n2.1",
        "This looks wrong.\nundo",
    ]);
    let mut log = SessionLog::new(Vec::<u8>::new());
    let conversation = ConversationState::new(Vec::new(), TrimPolicy::default());

    let outcome = run_episode(
        &mut transport,
        &mut decider,
        &mut log,
        conversation,
        &EpisodeConfig::default(),
    )
    .expect("episode");

    assert_eq!(outcome.stop, EpisodeStop::Terminal);
    assert_eq!(outcome.iterations, 3);
    assert_eq!(outcome.steps, vec![7]);
    assert_eq!(transport.sent, vec!["2.1", "1", "undo"]);

    // Each decision call saw only the current branch: one user turn, because
    // the advance in between cleared the first branch's history.
    assert_eq!(decider.seen_lens, vec![1, 1]);

    let text = String::from_utf8(log.into_inner()).expect("utf8");
    assert!(text.contains("depth 1 constraints\n[u]ndo"));
    assert!(text.contains("I will pick branch 2, then sub-branch 1.\n2.1"));
    assert!(text.ends_with("steps taken: [7]\n"));
}

/// A few-shot base survives advances while branch turns are cleared.
#[test]
fn few_shot_base_is_preserved_across_advances() {
    let base = vec![
        Exchange::user("example constraints"),
        Exchange::assistant("1.2"),
    ];
    let mut transport = ScriptedTransport::new([
        "choose>",
        "Enter a count>",
        "choose again>",
        "Goodbye",
    ]);
    let mut decider = ScriptedDecisionMaker::new(["2", "3"]);
    let mut log = SessionLog::new(Vec::<u8>::new());
    let conversation = ConversationState::new(base, TrimPolicy::default());

    run_episode(
        &mut transport,
        &mut decider,
        &mut log,
        conversation,
        &EpisodeConfig::default(),
    )
    .expect("episode");

    // Base (2) + current user turn (1) at each call.
    assert_eq!(decider.seen_lens, vec![3, 3]);
    assert_eq!(transport.sent, vec!["2", "1", "3"]);
}

/// A decider that only chatters degrades to `u` instead of failing.
#[test]
fn unusable_reply_degrades_to_undo() {
    let mut transport = ScriptedTransport::new(["choose>", "Goodbye"]);
    let mut decider = ScriptedDecisionMaker::new(["Hmm, tough one. Let me think about it."]);
    let mut log = SessionLog::new(Vec::<u8>::new());

    run_episode(
        &mut transport,
        &mut decider,
        &mut log,
        ConversationState::new(Vec::new(), TrimPolicy::default()),
        &EpisodeConfig::default(),
    )
    .expect("episode");

    assert_eq!(transport.sent, vec!["u"]);
}

/// `pilot run` end to end: a shell script stands in for the search program,
/// another for the decision command.
#[test]
fn run_command_drives_a_scripted_program() {
    let temp = tempfile::tempdir().expect("tempdir");
    let root = temp.path();

    let config = r#"
max_iterations = 10
log_path = "logs/session.log"
summary_path = "logs/summary.json"

[program]
command = [
    "sh",
    "-c",
    "printf 'Number of results: 0. Steps: 4. [u]ndo or choice number>'; read a; printf 'Goodbye'",
]

[decision]
command = ["sh", "-c", "cat >/dev/null; echo 2.1"]
timeout_secs = 10
"#;
    fs::write(root.join("pilot.toml"), config).expect("write config");

    let output = Command::new(env!("CARGO_BIN_EXE_pilot"))
        .current_dir(root)
        .args(["run", "--config", "pilot.toml"])
        .output()
        .expect("pilot run");

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("steps taken: [4]"), "stdout: {stdout}");

    let log = fs::read_to_string(root.join("logs/session.log")).expect("read log");
    assert!(log.contains("Number of results: 0. Steps: 4."));
    assert!(log.ends_with("steps taken: [4]\n"));

    let summary = fs::read_to_string(root.join("logs/summary.json")).expect("read summary");
    assert!(summary.contains("\"terminal\""));
    assert!(summary.contains("4"));
}

/// `pilot init` writes a loadable default config and refuses to clobber it.
#[test]
fn init_writes_default_config_once() {
    let temp = tempfile::tempdir().expect("tempdir");
    let root = temp.path();

    let status = Command::new(env!("CARGO_BIN_EXE_pilot"))
        .current_dir(root)
        .arg("init")
        .status()
        .expect("pilot init");
    assert_eq!(status.code(), Some(exit_codes::OK));
    assert!(root.join("pilot.toml").is_file());

    let status = Command::new(env!("CARGO_BIN_EXE_pilot"))
        .current_dir(root)
        .arg("init")
        .status()
        .expect("pilot init again");
    assert_eq!(status.code(), Some(exit_codes::INVALID));
}
