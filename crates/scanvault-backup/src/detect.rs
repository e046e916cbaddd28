//! Utility preflight and removable-volume discovery.

use crate::error::{BackupError, BackupResult};
use crate::exec::CommandRunner;

/// Block-device listing utility.
pub const LSBLK: &str = "lsblk";

/// Disk management utility used for mount, unmount, and power-off.
pub const UDISKSCTL: &str = "udisksctl";

/// Verify the external utilities the backup path shells out to are installed.
///
/// Run once at startup so a misconfigured host fails fast instead of at the
/// first backup cycle.
///
/// # Errors
///
/// Returns [`BackupError::MissingUtility`] naming the first absent utility.
pub fn ensure_backup_utilities() -> BackupResult<()> {
    for name in [LSBLK, UDISKSCTL] {
        ensure_utility(name)?;
    }
    Ok(())
}

fn ensure_utility(name: &'static str) -> BackupResult<()> {
    which::which(name)
        .map(|_| ())
        .map_err(|err| BackupError::missing_utility(name, err))
}

/// List attached removable volumes as a human-readable table.
///
/// The caller prints the table verbatim; its columns are the volume label,
/// the filesystem UUID, and the current mount point.
///
/// # Errors
///
/// Returns a [`BackupError`] when `lsblk` cannot be run or exits non-zero.
pub async fn detect_removable_disks(runner: &dyn CommandRunner) -> BackupResult<String> {
    let output = runner
        .run(LSBLK, &["-o", "label,uuid,mountpoint", "--filter", "RM == 1"])
        .await
        .map_err(|err| BackupError::utility("detect.lsblk", LSBLK, err))?;
    if output.success {
        Ok(output.stdout)
    } else {
        Err(BackupError::utility(
            "detect.lsblk",
            LSBLK,
            std::io::Error::other(output.stderr.trim().to_string()),
        ))
    }
}
