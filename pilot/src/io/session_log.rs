//! Session artifacts for one run.
//!
//! # Separation of Concerns
//!
//! - **Tracing (`logging`)**: Dev diagnostics via `RUST_LOG`, output to
//!   stderr. Not persisted, not part of product output.
//!
//! - **Session log (this module)**: Product artifact capturing every raw
//!   prompt and decision reply, plus the final step-count summary. Always
//!   written, unaffected by `RUST_LOG`.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::episode::EpisodeStop;

const SEPARATOR: &str = "\n================================\n";

/// Append-only log of prompts and replies for one run.
///
/// Generic over the writer so tests can capture output in memory. Every
/// record is flushed immediately; a crashed run keeps everything logged up
/// to the failure.
pub struct SessionLog<W: Write> {
    writer: W,
}

impl SessionLog<BufWriter<File>> {
    /// Create the log file, creating parent directories as needed.
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create log directory {}", parent.display()))?;
        }
        let file =
            File::create(path).with_context(|| format!("create session log {}", path.display()))?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> SessionLog<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Record one raw prompt from the transport.
    pub fn record_prompt(&mut self, prompt: &str) -> Result<()> {
        self.writer
            .write_all(prompt.as_bytes())
            .and_then(|()| self.writer.flush())
            .context("write session log")
    }

    /// Record the decision-maker's raw reply, fenced by separators.
    pub fn record_reply(&mut self, content: &str) -> Result<()> {
        write!(self.writer, "{SEPARATOR}{content}{SEPARATOR}")
            .and_then(|()| self.writer.flush())
            .context("write session log")
    }

    /// Record the ordered step counts at run end.
    pub fn record_summary(&mut self, steps: &[u64]) -> Result<()> {
        write!(self.writer, "\nsteps taken: {steps:?}\n")
            .and_then(|()| self.writer.flush())
            .context("write session log")
    }

    /// Hand back the underlying writer (used by in-memory tests).
    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Machine-readable run summary written next to the session log.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub iterations: u32,
    pub stop: EpisodeStop,
    pub steps: Vec<u64>,
}

/// Write the run summary as pretty JSON with a trailing newline.
pub fn write_summary(path: &Path, summary: &RunSummary) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create summary directory {}", parent.display()))?;
    }
    let mut buf = serde_json::to_string_pretty(summary).context("serialize run summary")?;
    buf.push('\n');
    fs::write(path, buf).with_context(|| format!("write {}", path.display()))
}
