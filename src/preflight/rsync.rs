//! rsync preflight check.

use super::{Check, CheckStatus};
use crate::services::rsync::Rsync;

/// Check that the configured rsync runs.
pub fn check(rsync: &Rsync) -> Check {
    let status = if rsync.is_installed() {
        match rsync.get_version() {
            Ok(version) => CheckStatus::passed(format!("installed ({})", version)),
            Err(_) => CheckStatus::passed("installed"),
        }
    } else {
        CheckStatus::failed(
            format!("{} not found", rsync.program().display()),
            "Install rsync: sudo apt install rsync",
        )
    };

    Check {
        name: "rsync",
        status,
    }
}
