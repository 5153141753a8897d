//! Preflight checks, run before any selection.
//!
//! Results go to stderr so stdout only carries the table and rsync output.

mod plex;
mod rsync;

use crate::services::plex::PlexClient;
use crate::services::rsync::Rsync;
use colored::Colorize;
use std::io::Write;

/// Outcome of one check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    Passed(String),
    Failed { reason: String, hint: String },
}

impl CheckStatus {
    pub fn passed(message: impl Into<String>) -> Self {
        CheckStatus::Passed(message.into())
    }

    pub fn failed(reason: impl Into<String>, hint: impl Into<String>) -> Self {
        CheckStatus::Failed {
            reason: reason.into(),
            hint: hint.into(),
        }
    }
}

/// A named check and its outcome.
#[derive(Debug)]
pub struct Check {
    pub name: &'static str,
    pub status: CheckStatus,
}

impl Check {
    pub fn passed(&self) -> bool {
        matches!(self.status, CheckStatus::Passed(_))
    }
}

/// Run the checks a sync needs. rsync is not required for a dry run.
pub async fn run_preflight_checks(
    client: &PlexClient,
    rsync: &Rsync,
    dry_run: bool,
) -> Vec<Check> {
    let mut checks = vec![plex::check(client).await];
    if !dry_run {
        checks.push(rsync::check(rsync));
    }
    checks
}

/// Write check results, one line each plus a hint for failures.
pub fn write_results<W: Write>(out: &mut W, checks: &[Check]) -> std::io::Result<()> {
    for check in checks {
        match &check.status {
            CheckStatus::Passed(message) => {
                writeln!(out, "{} {}: {}", "[OK]".green(), check.name.bold(), message)?;
            }
            CheckStatus::Failed { reason, hint } => {
                writeln!(out, "{} {}: {}", "[FAIL]".red(), check.name.bold(), reason)?;
                writeln!(out, "  {} {}", "->".yellow(), hint)?;
            }
        }
    }
    Ok(())
}

/// Names of the checks that failed.
pub fn failed_checks(checks: &[Check]) -> Vec<&'static str> {
    checks
        .iter()
        .filter(|c| !c.passed())
        .map(|c| c.name)
        .collect()
}
