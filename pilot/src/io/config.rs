//! Driver configuration stored in `pilot.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::core::types::InputToken;

/// Driver configuration (TOML).
///
/// This file is intended to be edited by humans and must remain stable and
/// automatable. Missing fields default to sensible values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PilotConfig {
    /// Hard bound on loop iterations per run.
    pub max_iterations: u32,

    /// Canned acknowledgment sent for informational prompts. Must satisfy
    /// the legal-input grammar.
    pub advance_token: String,

    /// Append-only session log artifact.
    pub log_path: PathBuf,

    /// Machine-readable run summary (JSON).
    pub summary_path: PathBuf,

    /// Optional few-shot transcript used as the conversation base.
    pub few_shots_path: Option<PathBuf>,

    /// Optional replacement for the built-in persona preamble.
    pub persona_path: Option<PathBuf>,

    pub program: ProgramConfig,
    pub decision: DecisionConfig,
}

/// The interactive program to drive.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ProgramConfig {
    /// Command to spawn (e.g. `["racket", "interact.rkt"]`).
    pub command: Vec<String>,
}

impl Default for ProgramConfig {
    fn default() -> Self {
        Self {
            command: vec!["racket".to_string(), "interact.rkt".to_string()],
        }
    }
}

/// The one-shot command consulted for decisions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DecisionConfig {
    /// Command to execute per decision; the rendered transcript arrives on
    /// its stdin and the reply is read from its stdout.
    pub command: Vec<String>,

    /// Maximum time to wait for one decision.
    pub timeout_secs: u64,

    /// Truncate captured decision output beyond this many bytes.
    pub output_limit_bytes: usize,
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            command: vec!["codex".to_string(), "exec".to_string(), "-".to_string()],
            timeout_secs: 300,
            output_limit_bytes: 100_000,
        }
    }
}

impl Default for PilotConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            advance_token: "1".to_string(),
            log_path: PathBuf::from("logs/session.log"),
            summary_path: PathBuf::from("logs/summary.json"),
            few_shots_path: None,
            persona_path: None,
            program: ProgramConfig::default(),
            decision: DecisionConfig::default(),
        }
    }
}

impl PilotConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(anyhow!("max_iterations must be > 0"));
        }
        if InputToken::parse(&self.advance_token).is_none() {
            return Err(anyhow!(
                "advance_token {:?} does not satisfy the legal-input grammar",
                self.advance_token
            ));
        }
        validate_command("program.command", &self.program.command)?;
        validate_command("decision.command", &self.decision.command)?;
        if self.decision.timeout_secs == 0 {
            return Err(anyhow!("decision.timeout_secs must be > 0"));
        }
        if self.decision.output_limit_bytes == 0 {
            return Err(anyhow!("decision.output_limit_bytes must be > 0"));
        }
        Ok(())
    }
}

fn validate_command(field: &str, command: &[String]) -> Result<()> {
    if command.is_empty() || command[0].trim().is_empty() {
        return Err(anyhow!("{field} must be a non-empty array"));
    }
    Ok(())
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `PilotConfig::default()`.
pub fn load_config(path: &Path) -> Result<PilotConfig> {
    if !path.exists() {
        let cfg = PilotConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: PilotConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &PilotConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("config path missing parent {}", path.display()))?;
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}
