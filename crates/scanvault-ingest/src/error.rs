//! # Design
//!
//! - Structured, constant-message errors with an operation tag so log lines
//!   identify the failing step without string formatting at the call site.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for ingestion operations.
pub type IngestResult<T> = Result<T, IngestError>;

/// Errors produced by the ingestion pipeline.
#[derive(Debug, Error)]
pub enum IngestError {
    /// A filesystem operation on the scan log failed.
    #[error("scan log write failed")]
    Io {
        /// Operation tag (e.g., `ingest.open`).
        operation: &'static str,
        /// File the operation targeted.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// Reading from the scan input stream failed.
    #[error("scan input stream failed")]
    Stream {
        /// Operation tag.
        operation: &'static str,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

impl IngestError {
    pub(crate) fn io(operation: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    pub(crate) const fn stream(operation: &'static str, source: io::Error) -> Self {
        Self::Stream { operation, source }
    }
}
