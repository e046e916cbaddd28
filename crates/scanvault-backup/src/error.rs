//! # Design
//!
//! - Structured, constant-message errors carrying an operation tag and the
//!   identifiers a log consumer needs to act on the failure.
//! - Device-control failures (`mount`, `unmount`, `power-off`) keep the
//!   utility's stderr as free-form detail; everything else keeps a typed
//!   source.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for backup operations.
pub type BackupResult<T> = Result<T, BackupError>;

/// Errors produced by the backup pipeline.
#[derive(Debug, Error)]
pub enum BackupError {
    /// A required external utility is not installed.
    #[error("required utility is not installed")]
    MissingUtility {
        /// Utility binary name.
        name: &'static str,
        /// Lookup failure from the PATH search.
        #[source]
        source: which::Error,
    },
    /// Mounting the volume failed.
    #[error("volume mount failed")]
    Mount {
        /// Filesystem UUID of the volume.
        uuid: String,
        /// Stderr of the mount utility.
        detail: String,
    },
    /// Unmounting the volume failed.
    #[error("volume unmount failed")]
    Unmount {
        /// Filesystem UUID of the volume.
        uuid: String,
        /// Stderr of the unmount utility.
        detail: String,
    },
    /// Powering the volume off failed.
    #[error("volume power-off failed")]
    PowerOff {
        /// Filesystem UUID of the volume.
        uuid: String,
        /// Stderr of the power-off utility.
        detail: String,
    },
    /// Copying a scan file onto the volume failed.
    #[error("backup copy failed")]
    Copy {
        /// Operation tag (e.g., `copy.rename`).
        operation: &'static str,
        /// File the operation targeted.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// Enumerating backup candidates failed.
    #[error("candidate listing failed")]
    Selector {
        /// Operation tag.
        operation: &'static str,
        /// Directory the operation targeted.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The candidate glob pattern failed to compile.
    #[error("candidate pattern is invalid")]
    Pattern {
        /// The offending pattern.
        pattern: &'static str,
        /// Compilation failure.
        #[source]
        source: globset::Error,
    },
    /// Spawning or reading an external utility failed.
    #[error("utility invocation failed")]
    Utility {
        /// Operation tag.
        operation: &'static str,
        /// Utility binary name.
        utility: &'static str,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

impl BackupError {
    pub(crate) const fn missing_utility(name: &'static str, source: which::Error) -> Self {
        Self::MissingUtility { name, source }
    }

    pub(crate) const fn mount(uuid: String, detail: String) -> Self {
        Self::Mount { uuid, detail }
    }

    pub(crate) const fn unmount(uuid: String, detail: String) -> Self {
        Self::Unmount { uuid, detail }
    }

    pub(crate) const fn power_off(uuid: String, detail: String) -> Self {
        Self::PowerOff { uuid, detail }
    }

    pub(crate) fn copy(operation: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Copy {
            operation,
            path: path.into(),
            source,
        }
    }

    pub(crate) fn selector(
        operation: &'static str,
        path: impl Into<PathBuf>,
        source: io::Error,
    ) -> Self {
        Self::Selector {
            operation,
            path: path.into(),
            source,
        }
    }

    pub(crate) const fn pattern(pattern: &'static str, source: globset::Error) -> Self {
        Self::Pattern { pattern, source }
    }

    pub(crate) const fn utility(
        operation: &'static str,
        utility: &'static str,
        source: io::Error,
    ) -> Self {
        Self::Utility {
            operation,
            utility,
            source,
        }
    }
}
