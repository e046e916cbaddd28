//! # Design
//!
//! - Structured, constant-message errors for configuration validation.
//! - Carry the offending field, a machine-readable reason, and the raw value.

use thiserror::Error;

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors produced while building the application configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A configuration value failed validation.
    #[error("invalid configuration")]
    Invalid {
        /// Field that failed validation.
        field: &'static str,
        /// Static reason for the failure.
        reason: &'static str,
        /// Offending value when available.
        value: Option<String>,
    },
}

impl ConfigError {
    pub(crate) const fn invalid(
        field: &'static str,
        reason: &'static str,
        value: Option<String>,
    ) -> Self {
        Self::Invalid {
            field,
            reason,
            value,
        }
    }
}
