//! Volume identity and per-cycle bookkeeping.

use std::path::PathBuf;

/// Directory of stable per-filesystem device symlinks maintained by udev.
const BY_UUID_DIR: &str = "/dev/disk/by-uuid";

/// A removable volume identified by its filesystem UUID.
#[derive(Debug, Clone)]
pub struct Volume {
    /// Filesystem UUID as printed by `lsblk`.
    pub uuid: String,
    /// Stable device path derived from the UUID.
    pub device_path: PathBuf,
    /// Whether the volume should be mounted automatically when attached.
    pub auto_mount: bool,
}

impl Volume {
    /// Construct a volume handle for `uuid`.
    #[must_use]
    pub fn new(uuid: impl Into<String>, auto_mount: bool) -> Self {
        let uuid = uuid.into();
        let device_path = PathBuf::from(BY_UUID_DIR).join(&uuid);
        Self {
            uuid,
            device_path,
            auto_mount,
        }
    }
}

/// Outcome of one completed backup cycle.
#[derive(Debug, Default, Clone)]
pub struct BackupCycle {
    /// Files the cycle attempted to copy, in order.
    pub attempted: Vec<PathBuf>,
    /// Number of files copied successfully.
    pub copied: usize,
    /// Number of files whose copy failed.
    pub failed: usize,
    /// Whether the volume was unmounted at the end of the cycle.
    pub unmounted: bool,
    /// Whether the device was powered off at the end of the cycle.
    pub powered_off: bool,
}
