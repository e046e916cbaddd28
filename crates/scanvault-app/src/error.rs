//! # Design
//!
//! - Centralize application-level errors for bootstrap and task wiring.
//! - Keep error messages constant while carrying context fields for debugging.
//! - Preserve source errors without re-logging at call sites.

use thiserror::Error;

/// Result alias for application operations.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration operations failed.
    #[error("configuration operation failed")]
    Config {
        /// Operation identifier.
        operation: &'static str,
        /// Source configuration error.
        source: scanvault_config::ConfigError,
    },
    /// Telemetry operations failed.
    #[error("telemetry operation failed")]
    Telemetry {
        /// Operation identifier.
        operation: &'static str,
        /// Source telemetry error.
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// Backup operations failed.
    #[error("backup operation failed")]
    Backup {
        /// Operation identifier.
        operation: &'static str,
        /// Source backup error.
        source: scanvault_backup::BackupError,
    },
}

impl AppError {
    pub(crate) const fn config(
        operation: &'static str,
        source: scanvault_config::ConfigError,
    ) -> Self {
        Self::Config { operation, source }
    }

    pub(crate) fn telemetry(operation: &'static str, source: anyhow::Error) -> Self {
        Self::Telemetry {
            operation,
            source: source.into(),
        }
    }

    pub(crate) const fn backup(
        operation: &'static str,
        source: scanvault_backup::BackupError,
    ) -> Self {
        Self::Backup { operation, source }
    }
}
