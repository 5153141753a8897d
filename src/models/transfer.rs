//! Transfer models: where files go and what rsync reported.

/// rsync binary name.
pub const RSYNC_BINARY: &str = "rsync";

/// Flags passed to rsync ahead of the source paths.
pub const RSYNC_FLAGS: [&str; 4] = ["-essh", "-av", "--progress", "--inplace"];

/// Remote destination of a transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub host: String,
    pub path: String,
}

impl Destination {
    pub fn new(host: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            path: path.into(),
        }
    }
}

impl std::fmt::Display for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.host, self.path)
    }
}

/// A validated rsync invocation. Always has at least one source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    sources: Vec<String>,
    destination: Destination,
}

impl TransferRequest {
    /// Create a request, refusing an empty source list.
    pub fn new(sources: Vec<String>, destination: Destination) -> crate::Result<Self> {
        if sources.is_empty() {
            return Err(crate::Error::NothingToCopy);
        }
        Ok(Self {
            sources,
            destination,
        })
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    pub fn destination(&self) -> &Destination {
        &self.destination
    }

    /// Full command line, binary first.
    pub fn command_line(&self) -> Vec<String> {
        let mut cmdline = Vec::with_capacity(RSYNC_FLAGS.len() + self.sources.len() + 2);
        cmdline.push(RSYNC_BINARY.to_string());
        cmdline.extend(RSYNC_FLAGS.iter().map(|f| f.to_string()));
        cmdline.extend(self.sources.iter().cloned());
        cmdline.push(self.destination.to_string());
        cmdline
    }
}

/// Result of running rsync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferOutcome {
    /// Process exit code, `None` when killed by a signal.
    pub code: Option<i32>,
    /// Last lines rsync wrote to stderr.
    pub stderr_tail: Vec<String>,
}

impl TransferOutcome {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Exit status for this program.
    pub fn exit_code(&self) -> u8 {
        match self.code {
            Some(0) => 0,
            Some(code) => u8::try_from(code).ok().filter(|c| *c != 0).unwrap_or(1),
            None => 1,
        }
    }
}
