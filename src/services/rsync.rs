//! rsync service for copying files to the destination host.

use crate::models::transfer::{TransferOutcome, TransferRequest, RSYNC_BINARY};
use crate::Result;
use std::collections::VecDeque;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// How many stderr lines are kept for the outcome.
const STDERR_TAIL_LINES: usize = 20;

/// The rsync executable used for transfers.
#[derive(Debug, Clone)]
pub struct Rsync {
    program: PathBuf,
}

impl Default for Rsync {
    fn default() -> Self {
        Self::new(RSYNC_BINARY)
    }
}

impl Rsync {
    /// Use a specific executable instead of `rsync` from `PATH`.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Check if rsync is installed.
    pub fn is_installed(&self) -> bool {
        Command::new(&self.program)
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    /// Get rsync version.
    pub fn get_version(&self) -> Result<String> {
        let output = Command::new(&self.program).arg("--version").output()?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let first_line = stdout.lines().next().unwrap_or("unknown");

        Ok(first_line.to_string())
    }

    /// Run rsync for a request.
    ///
    /// Progress goes straight to our stdout. Stderr is forwarded as it
    /// arrives and the tail is kept in the outcome. The pipe is drained to
    /// EOF so rsync never writes into a closed pipe.
    pub fn run(&self, request: &TransferRequest) -> Result<TransferOutcome> {
        let cmdline = request.command_line();
        println!("{}", cmdline.join(" "));
        tracing::debug!(
            "Spawning {} with {} source(s)",
            self.program.display(),
            request.sources().len()
        );

        let mut child = Command::new(&self.program)
            .args(&cmdline[1..])
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => crate::Error::RsyncNotFound,
                _ => crate::Error::Io(e),
            })?;

        let tail = match child.stderr.take() {
            Some(stderr) => forward_stderr(
                BufReader::new(stderr),
                &mut std::io::stderr(),
                STDERR_TAIL_LINES,
            ),
            None => Ok(VecDeque::new()),
        };

        // Reap the child before reporting a read failure.
        let status = child.wait()?;
        let tail = tail?;

        Ok(TransferOutcome {
            code: status.code(),
            stderr_tail: tail.into_iter().collect(),
        })
    }
}

/// Copy `reader` to `out` until EOF, returning the last `keep` lines.
///
/// Bytes are forwarded untouched; kept lines are decoded lossily. When `out`
/// stops accepting writes, forwarding stops but reading continues.
fn forward_stderr<R: BufRead, W: Write>(
    mut reader: R,
    out: &mut W,
    keep: usize,
) -> std::io::Result<VecDeque<String>> {
    let mut tail = VecDeque::with_capacity(keep);
    let mut buf = Vec::new();
    let mut forwarding = true;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }

        if forwarding {
            if let Err(e) = out.write_all(&buf).and_then(|_| out.flush()) {
                tracing::warn!("Stopped forwarding rsync stderr: {}", e);
                forwarding = false;
            }
        }

        if keep == 0 {
            continue;
        }
        if tail.len() == keep {
            tail.pop_front();
        }
        let line = String::from_utf8_lossy(&buf);
        tail.push_back(line.trim_end_matches(['\n', '\r']).to_string());
    }

    Ok(tail)
}
