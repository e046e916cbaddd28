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

//! Removable-volume backup: polls for a volume identified by filesystem UUID,
//! optionally mounts it, mirrors the scan CSV files onto it with durable
//! copies, then unmounts and powers the device off.
//!
//! Block-device interaction goes through `lsblk` and `udisksctl`; both are
//! reached via the [`exec::CommandRunner`] seam so every policy in this crate
//! is testable without hardware.

pub mod controller;
pub mod copier;
pub mod detect;
pub mod error;
pub mod exec;
pub mod orchestrator;
pub mod probe;
pub mod selector;
pub mod volume;

pub use controller::{UdisksController, VolumeController};
pub use copier::{DurableCopier, FileCopier};
pub use detect::{detect_removable_disks, ensure_backup_utilities};
pub use error::{BackupError, BackupResult};
pub use exec::{CommandOutput, CommandRunner, ProcessRunner};
pub use orchestrator::BackupOrchestrator;
pub use probe::{LsblkProbe, VolumeProbe};
pub use selector::BackupSelector;
pub use volume::{BackupCycle, Volume};
