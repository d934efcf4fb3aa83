//! Single-shot stdin → stdout driver shared by both hooks.
//!
//! One [`Invocation`] owns the input buffer and the phase latch for the
//! lifetime of the process; nothing is shared across invocations.

use std::io::Write;
use std::time::Duration;

use promptcraft_core::model::{timestamp_now, HookInput};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::Hook;

const CHUNK_SIZE: usize = 8 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Accumulating,
    Processed,
    Exited,
}

/// Per-invocation input buffer plus a phase latch.
///
/// Each transition happens at most once, so end-of-stream and the safety
/// timeout can both fire without processing or exiting twice.
#[derive(Debug)]
pub struct Invocation {
    buffer: Vec<u8>,
    phase: Phase,
}

impl Default for Invocation {
    fn default() -> Self {
        Self::new()
    }
}

impl Invocation {
    pub fn new() -> Self {
        Self {
            buffer: Vec::new(),
            phase: Phase::Accumulating,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Append a chunk. Ignored once accumulation is over.
    pub fn push(&mut self, chunk: &[u8]) -> bool {
        if self.phase != Phase::Accumulating {
            return false;
        }
        self.buffer.extend_from_slice(chunk);
        true
    }

    /// End-of-stream: hand out the buffer exactly once.
    pub fn finish(&mut self) -> Option<Vec<u8>> {
        if self.phase != Phase::Accumulating {
            return None;
        }
        self.phase = Phase::Processed;
        Some(std::mem::take(&mut self.buffer))
    }

    /// Returns `true` only for the first call.
    pub fn exit(&mut self) -> bool {
        if self.phase == Phase::Exited {
            return false;
        }
        self.phase = Phase::Exited;
        self.buffer.clear();
        true
    }
}

/// Read `reader` to end-of-stream into `invocation`.
///
/// Returns `Ok(None)` when the safety timeout fires first; the partial
/// buffer is discarded and the invocation is marked exited.
pub async fn accumulate<R>(
    mut reader: R,
    invocation: &mut Invocation,
    timeout: Duration,
) -> std::io::Result<Option<Vec<u8>>>
where
    R: AsyncRead + Unpin,
{
    let read_all = async {
        let mut chunk = vec![0u8; CHUNK_SIZE];
        loop {
            let n = reader.read(&mut chunk).await?;
            if n == 0 {
                return Ok::<(), std::io::Error>(());
            }
            invocation.push(&chunk[..n]);
        }
    };

    let result = tokio::time::timeout(timeout, read_all).await;
    match result {
        Ok(Ok(())) => Ok(invocation.finish()),
        Ok(Err(e)) => Err(e),
        Err(_) => {
            invocation.exit();
            Ok(None)
        }
    }
}

/// Turn raw stdin bytes into the line to print, if any.
///
/// A missing prompt is never a failure and prints nothing. Every other
/// problem goes through [`Hook::failure_response`], so whether it is visible
/// on stdout depends only on the hook's output contract.
pub fn process<H: Hook + ?Sized>(hook: &H, raw: &[u8], timestamp: String) -> Option<String> {
    let text = match std::str::from_utf8(raw) {
        Ok(text) => text,
        Err(e) => return fail(hook, &format!("input is not valid UTF-8: {e}"), timestamp),
    };

    let input = match HookInput::parse(text) {
        Ok(input) => input,
        Err(e) => return fail(hook, &e.to_string(), timestamp),
    };
    tracing::debug!("{}: received {} bytes", hook.name(), raw.len());

    let Some(prompt) = input.resolve_prompt() else {
        tracing::debug!("{}: no prompt found, skipping", hook.name());
        return None;
    };
    tracing::debug!(
        "{}: processing prompt ({} chars)",
        hook.name(),
        prompt.chars().count()
    );

    match hook.respond(prompt, timestamp.clone()) {
        Ok(line) => Some(line),
        Err(e) => fail(hook, &e.to_string(), timestamp),
    }
}

fn fail<H: Hook + ?Sized>(hook: &H, message: &str, timestamp: String) -> Option<String> {
    tracing::debug!("{}: processing error: {message}", hook.name());
    hook.failure_response(message, timestamp)
}

/// Run one full invocation: accumulate, process, print, exit.
pub async fn run<H, R, W>(hook: &H, reader: R, out: &mut W) -> anyhow::Result<()>
where
    H: Hook + ?Sized,
    R: AsyncRead + Unpin,
    W: Write,
{
    let mut invocation = Invocation::new();
    let timeout = hook.timeout();

    let line = match accumulate(reader, &mut invocation, timeout).await {
        Ok(Some(raw)) => process(hook, &raw, timestamp_now()),
        Ok(None) => {
            tracing::debug!(
                "{}: safety timeout reached after {} ms, exiting",
                hook.name(),
                timeout.as_millis()
            );
            None
        }
        Err(e) => fail(hook, &format!("failed to read stdin: {e}"), timestamp_now()),
    };

    if let Some(line) = line {
        writeln!(out, "{line}")?;
        out.flush()?;
        tracing::debug!("{}: done", hook.name());
    }

    invocation.exit();
    Ok(())
}
