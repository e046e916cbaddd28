//! Typed configuration model.
//!
//! # Design
//! - One immutable value constructed at startup and shared by reference.
//! - Pure data carrier; parsing and validation live in `cli.rs`.

use std::path::PathBuf;
use std::time::Duration;

/// Default interval between backup poll ticks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Immutable application configuration assembled from the command line.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Mount the watched volume automatically when it is attached.
    pub auto_mount: bool,
    /// Include the current date in the log file name.
    pub dated_file: bool,
    /// Directory that receives the CSV log files.
    pub output_dir: PathBuf,
    /// Stable identifier of the removable volume to back up onto, if any.
    pub volume_uuid: Option<String>,
    /// Interval between backup poll ticks.
    pub poll_interval: Duration,
    /// Attempt power-off even when the preceding unmount failed.
    pub power_off_after_failed_unmount: bool,
}

impl AppConfig {
    /// Whether removable-volume backup is supported on this platform.
    ///
    /// The backup path shells out to `lsblk` and `udisksctl`, which only exist
    /// on Linux hosts; elsewhere the process runs ingestion-only.
    #[must_use]
    pub const fn backup_supported() -> bool {
        cfg!(target_os = "linux")
    }
}
