//! Plexsync CLI
//!
//! Copies Plex on-deck items, playlists or search results to a remote host with rsync.

use clap::Parser;
use plexsync::cli::{args::Cli, commands::sync};
use plexsync::models::config;
use plexsync::preflight;
use plexsync::services::plex::PlexClient;
use plexsync::services::rsync::Rsync;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    // Resolve configuration
    let config = config::load_config();
    let options = cli.sync_options(&config);
    let client = PlexClient::new(cli.plex_config(&config))?;
    let rsync = Rsync::default();

    if !cli.skip_preflight {
        run_preflight_checks(&client, &rsync, cli.dry_run).await?;
    }

    let code = sync::run_sync(&client, &options, &rsync, cli.dry_run).await?;
    Ok(code)
}

/// Initialize the logging system.
fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("plexsync=debug")
    } else {
        EnvFilter::new("plexsync=info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Run preflight checks and exit if any fail.
async fn run_preflight_checks(
    client: &PlexClient,
    rsync: &Rsync,
    dry_run: bool,
) -> anyhow::Result<()> {
    use colored::Colorize;

    eprintln!("{}", "Running preflight checks...".bold());

    let checks = preflight::run_preflight_checks(client, rsync, dry_run).await;
    preflight::write_results(&mut std::io::stderr(), &checks)?;
    eprintln!();

    let failed = preflight::failed_checks(&checks);
    if !failed.is_empty() {
        anyhow::bail!("Preflight checks failed: {}", failed.join(", "));
    }

    Ok(())
}
