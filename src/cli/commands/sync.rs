//! Sync command implementation.
//!
//! Selects media from the server, prints what will be copied and hands the
//! file list to rsync.

use crate::core::collector::Collection;
use crate::core::{reporter, selector};
use crate::models::config::SyncOptions;
use crate::models::media::SyncRow;
use crate::models::transfer::TransferRequest;
use crate::services::plex::MediaServer;
use crate::services::rsync::Rsync;
use crate::Result;
use colored::Colorize;
use std::process::ExitCode;

/// What a sync run will do.
#[derive(Debug)]
pub enum SyncPlan {
    /// No file was selected.
    NothingToCopy,
    /// Copy these files, reporting these rows.
    Transfer {
        rows: Vec<SyncRow>,
        request: TransferRequest,
    },
}

/// Select and collect everything `options` asks for.
pub async fn plan_sync<S: MediaServer + ?Sized>(
    server: &S,
    options: &SyncOptions,
) -> Result<SyncPlan> {
    if !options.has_any_mode() {
        tracing::debug!("No selection mode enabled");
    }

    let items = selector::select(server, options).await?;
    let collection: Collection = items.iter().collect();

    if collection.is_empty() {
        return Ok(SyncPlan::NothingToCopy);
    }

    let rows = collection.rows.clone();
    let request = collection.into_transfer(options.destination.clone())?;
    Ok(SyncPlan::Transfer { rows, request })
}

/// Run a full sync and return the process exit status.
///
/// Exits 1 without starting rsync when nothing was selected; otherwise the
/// status is rsync's own.
pub async fn run_sync<S: MediaServer + ?Sized>(
    server: &S,
    options: &SyncOptions,
    rsync: &Rsync,
    dry_run: bool,
) -> Result<ExitCode> {
    let (rows, request) = match plan_sync(server, options).await? {
        SyncPlan::NothingToCopy => {
            eprintln!("Nothing to copy");
            return Ok(ExitCode::from(1));
        }
        SyncPlan::Transfer { rows, request } => (rows, request),
    };

    reporter::print_table(&rows);
    tracing::info!(
        "{} file(s) to copy to {}",
        request.sources().len(),
        request.destination()
    );

    if dry_run {
        println!("{}", request.command_line().join(" "));
        println!("{}", "[DRY RUN] rsync not started".bold().yellow());
        return Ok(ExitCode::SUCCESS);
    }

    let outcome = rsync.run(&request)?;
    if outcome.success() {
        println!("{}", "[OK] Transfer complete".bold().green());
    } else {
        match outcome.code {
            Some(code) => tracing::error!("rsync exited with status {}", code),
            None => tracing::error!("rsync was terminated by a signal"),
        }
        if let Some(last) = outcome.stderr_tail.last() {
            tracing::error!("Last rsync error: {}", last);
        }
    }

    Ok(ExitCode::from(outcome.exit_code()))
}
