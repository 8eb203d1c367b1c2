//! Transport to the interactive program being driven.
//!
//! The [`Transport`] trait decouples the episode loop from the actual child
//! process. Tests use scripted transports that replay prompts without
//! spawning anything.

use std::io::{BufReader, Read, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use anyhow::{Context, Result, anyhow};
use tracing::{debug, info, instrument, warn};

/// Blocking line protocol with the program under guidance.
///
/// Both operations are atomic from the loop's point of view: they either
/// return a value or fail fatally. Reconnection is not this layer's job.
pub trait Transport {
    /// Block until one complete prompt is available.
    fn read_prompt(&mut self) -> Result<String>;

    /// Send one input token followed by a newline.
    fn send(&mut self, token: &str) -> Result<()>;
}

/// Transport over a spawned interactive child process.
///
/// Acquired at run start; the child is killed and reaped on drop so the
/// program is released on every exit path.
#[derive(Debug)]
pub struct ChildTransport {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

impl ChildTransport {
    /// Spawn `command` with piped stdin/stdout. Stderr is inherited so the
    /// program's own diagnostics stay visible on the terminal.
    #[instrument(skip_all)]
    pub fn spawn(command: &[String]) -> Result<Self> {
        let (program, args) = command
            .split_first()
            .ok_or_else(|| anyhow!("program command must not be empty"))?;
        info!(program, "spawning interactive program");
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()
            .with_context(|| format!("spawn {program}"))?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| anyhow!("stdin was not piped"))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| anyhow!("stdout was not piped"))?;
        Ok(Self {
            child,
            stdin,
            stdout: BufReader::new(stdout),
        })
    }
}

impl Transport for ChildTransport {
    fn read_prompt(&mut self) -> Result<String> {
        // Prompts are not newline-terminated; the program stops at an input
        // marker ending in `>`. Accumulate until that sentinel. The stepper
        // emits no `>` outside its prompt lines.
        let mut buf = Vec::new();
        let mut byte = [0u8; 1];
        loop {
            let n = self.stdout.read(&mut byte).context("read from program")?;
            if n == 0 {
                if buf.is_empty() {
                    return Err(anyhow!("program closed its output"));
                }
                // Final output (e.g. a goodbye line) may carry no sentinel.
                break;
            }
            buf.push(byte[0]);
            if byte[0] == b'>' {
                break;
            }
        }
        let prompt = String::from_utf8_lossy(&buf).into_owned();
        debug!(bytes = prompt.len(), "prompt read");
        Ok(prompt)
    }

    fn send(&mut self, token: &str) -> Result<()> {
        debug!(token, "sending token");
        self.stdin
            .write_all(token.as_bytes())
            .and_then(|()| self.stdin.write_all(b"\n"))
            .and_then(|()| self.stdin.flush())
            .context("write to program")
    }
}

impl Drop for ChildTransport {
    fn drop(&mut self) {
        if let Err(err) = self.child.kill() {
            warn!(err = %err, "failed to kill program");
        }
        if let Err(err) = self.child.wait() {
            warn!(err = %err, "failed to reap program");
        }
    }
}
