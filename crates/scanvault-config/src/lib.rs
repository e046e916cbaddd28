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

//! Command-line configuration surface for the scanvault binary.
//!
//! Layout: `cli.rs` (clap argument declarations), `model.rs` (the immutable
//! [`AppConfig`] handed to the runtime), `error.rs` (validation failures).
//! Flags are parsed once at startup and frozen into a single value; no module
//! holds mutable global configuration.

pub mod cli;
pub mod error;
pub mod model;

pub use cli::Cli;
pub use error::{ConfigError, ConfigResult};
pub use model::AppConfig;
