#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Scan ingestion: reads payload lines from standard input and appends them as
//! timestamped rows to a CSV log file in the configured output directory.
//!
//! The writer recomputes the target file name on every append, so a process
//! running past midnight rolls over to the next day's file without restarts.

pub mod error;
pub mod reader;
pub mod writer;

pub use error::{IngestError, IngestResult};
pub use reader::{run_from, run_ingestion};
pub use writer::{IngestionWriter, log_file_name};
