//! Integration tests for handing the file list to rsync.
//!
//! Tests cover:
//! - rsync's exit status becoming ours
//! - stderr that is not valid UTF-8
//! - the nothing-to-copy and dry-run paths never starting rsync
//! - a missing rsync binary

#![cfg(unix)]

mod common;

use common::{episode, movie, FakeServer};
use plexsync::cli::commands::sync::run_sync;
use plexsync::models::config::SyncOptions;
use plexsync::models::transfer::{Destination, TransferRequest};
use plexsync::services::rsync::Rsync;
use plexsync::Error;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tempfile::TempDir;

/// Write an executable shell script standing in for rsync.
fn stub_rsync(dir: &Path, body: &str) -> Rsync {
    let path = dir.join("rsync");
    fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
    Rsync::new(path)
}

/// Script line that leaves a marker file behind when rsync is started.
fn touch_marker(dir: &Path) -> (String, PathBuf) {
    let marker = dir.join("started");
    (format!("touch '{}'", marker.display()), marker)
}

fn request(sources: &[&str]) -> TransferRequest {
    TransferRequest::new(
        sources.iter().map(|s| s.to_string()).collect(),
        Destination::new("passport", "/DataVolume/plexsync/"),
    )
    .unwrap()
}

fn same_code(actual: ExitCode, expected: u8) -> bool {
    format!("{:?}", actual) == format!("{:?}", ExitCode::from(expected))
}

fn on_deck_server() -> FakeServer {
    let mut server = FakeServer::new();
    server.on_deck = vec![
        episode("Pilot", 1, 2, 0, &["/a/b.mkv"]),
        movie("Heat", 0, &["/c/d.mkv"]),
    ];
    server
}

fn on_deck_options() -> SyncOptions {
    SyncOptions {
        on_deck: true,
        ..SyncOptions::default()
    }
}

// ========== rsync::run ==========

#[test]
fn test_run_passes_flags_sources_and_destination() {
    let temp_dir = TempDir::new().unwrap();
    let args_file = temp_dir.path().join("args");
    let rsync = stub_rsync(
        temp_dir.path(),
        &format!("printf '%s\\n' \"$@\" > '{}'\nexit 0", args_file.display()),
    );
    let request = request(&["/a/b.mkv", "/c/d.mkv"]);

    let outcome = rsync.run(&request).unwrap();

    assert!(outcome.success());
    assert_eq!(outcome.exit_code(), 0);
    let args = fs::read_to_string(&args_file).unwrap();
    let args: Vec<&str> = args.lines().collect();
    assert_eq!(
        args,
        vec![
            "-essh",
            "-av",
            "--progress",
            "--inplace",
            "/a/b.mkv",
            "/c/d.mkv",
            "passport:/DataVolume/plexsync/",
        ]
    );
}

#[test]
fn test_run_reports_nonzero_status_and_stderr_tail() {
    let temp_dir = TempDir::new().unwrap();
    let rsync = stub_rsync(
        temp_dir.path(),
        "echo 'rsync: link_stat failed' >&2\necho 'rsync error: some files could not be transferred (code 23)' >&2\nexit 23",
    );

    let outcome = rsync.run(&request(&["/a/b.mkv"])).unwrap();

    assert!(!outcome.success());
    assert_eq!(outcome.code, Some(23));
    assert_eq!(outcome.exit_code(), 23);
    assert_eq!(
        outcome.stderr_tail.last().map(String::as_str),
        Some("rsync error: some files could not be transferred (code 23)")
    );
}

#[test]
fn test_run_survives_invalid_utf8_on_stderr() {
    let temp_dir = TempDir::new().unwrap();
    let rsync = stub_rsync(
        temp_dir.path(),
        "echo 'first line' >&2\n\
         printf 'bad \\377\\376 bytes\\n' >&2\n\
         sleep 1\n\
         for i in 1 2 3 4 5; do echo \"line $i\" >&2; done\n\
         exit 0",
    );

    let outcome = rsync.run(&request(&["/a/b.mkv"])).unwrap();

    assert_eq!(outcome.code, Some(0));
    assert_eq!(outcome.stderr_tail.len(), 7);
    assert_eq!(outcome.stderr_tail[0], "first line");
    assert_eq!(outcome.stderr_tail[6], "line 5");
}

#[test]
fn test_run_missing_binary() {
    let temp_dir = TempDir::new().unwrap();
    let rsync = Rsync::new(temp_dir.path().join("no-such-rsync"));

    let result = rsync.run(&request(&["/a/b.mkv"]));
    assert!(matches!(result, Err(Error::RsyncNotFound)));
}

// ========== run_sync ==========

#[tokio::test]
async fn test_run_sync_success_exits_zero() {
    let temp_dir = TempDir::new().unwrap();
    let rsync = stub_rsync(temp_dir.path(), "exit 0");

    let code = run_sync(&on_deck_server(), &on_deck_options(), &rsync, false)
        .await
        .unwrap();

    assert!(same_code(code, 0));
}

#[tokio::test]
async fn test_run_sync_propagates_rsync_status() {
    let temp_dir = TempDir::new().unwrap();
    let rsync = stub_rsync(temp_dir.path(), "echo 'partial transfer' >&2\nexit 23");

    let code = run_sync(&on_deck_server(), &on_deck_options(), &rsync, false)
        .await
        .unwrap();

    assert!(same_code(code, 23));
}

#[tokio::test]
async fn test_run_sync_nothing_to_copy_never_starts_rsync() {
    let temp_dir = TempDir::new().unwrap();
    let (touch, marker) = touch_marker(temp_dir.path());
    let rsync = stub_rsync(temp_dir.path(), &format!("{}\nexit 0", touch));

    let code = run_sync(&FakeServer::new(), &SyncOptions::default(), &rsync, false)
        .await
        .unwrap();

    assert!(same_code(code, 1));
    assert!(!marker.exists());
}

#[tokio::test]
async fn test_run_sync_everything_watched_is_nothing_to_copy() {
    let temp_dir = TempDir::new().unwrap();
    let (touch, marker) = touch_marker(temp_dir.path());
    let rsync = stub_rsync(temp_dir.path(), &format!("{}\nexit 0", touch));
    let mut server = FakeServer::new();
    server.on_deck = vec![movie("Heat", 2, &["/c/d.mkv"])];
    let options = SyncOptions {
        on_deck: true,
        unwatched_only: true,
        ..SyncOptions::default()
    };

    let code = run_sync(&server, &options, &rsync, false).await.unwrap();

    assert!(same_code(code, 1));
    assert!(!marker.exists());
}

#[tokio::test]
async fn test_run_sync_dry_run_never_starts_rsync() {
    let temp_dir = TempDir::new().unwrap();
    let (touch, marker) = touch_marker(temp_dir.path());
    let rsync = stub_rsync(temp_dir.path(), &format!("{}\nexit 0", touch));

    let code = run_sync(&on_deck_server(), &on_deck_options(), &rsync, true)
        .await
        .unwrap();

    assert!(same_code(code, 0));
    assert!(!marker.exists());
}

#[tokio::test]
async fn test_run_sync_missing_binary_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let rsync = Rsync::new(temp_dir.path().join("no-such-rsync"));

    let result = run_sync(&on_deck_server(), &on_deck_options(), &rsync, false).await;
    assert!(matches!(result, Err(Error::RsyncNotFound)));
}
