//! Candidate selection for backup cycles.

use std::path::PathBuf;

use globset::{Glob, GlobMatcher};

use crate::error::{BackupError, BackupResult};

/// Glob matched against file names in the output directory.
pub const CANDIDATE_PATTERN: &str = "scans*.csv";

/// Picks the scan log files a backup cycle should copy.
pub struct BackupSelector {
    output_dir: PathBuf,
    matcher: GlobMatcher,
}

impl BackupSelector {
    /// Construct a selector over `output_dir`.
    ///
    /// # Errors
    ///
    /// Returns a [`BackupError`] if the candidate glob fails to compile.
    pub fn new(output_dir: PathBuf) -> BackupResult<Self> {
        let matcher = Glob::new(CANDIDATE_PATTERN)
            .map_err(|err| BackupError::pattern(CANDIDATE_PATTERN, err))?
            .compile_matcher();
        Ok(Self {
            output_dir,
            matcher,
        })
    }

    /// List matching regular files, sorted by name for a deterministic copy
    /// order.
    ///
    /// # Errors
    ///
    /// Returns a [`BackupError`] when the output directory cannot be read.
    pub fn list_candidates(&self) -> BackupResult<Vec<PathBuf>> {
        let entries = std::fs::read_dir(&self.output_dir)
            .map_err(|err| BackupError::selector("selector.read_dir", &self.output_dir, err))?;

        let mut candidates = Vec::new();
        for entry in entries {
            let entry = entry
                .map_err(|err| BackupError::selector("selector.entry", &self.output_dir, err))?;
            let file_type = entry
                .file_type()
                .map_err(|err| BackupError::selector("selector.file_type", entry.path(), err))?;
            if file_type.is_file() && self.matcher.is_match(entry.file_name()) {
                candidates.push(entry.path());
            }
        }
        candidates.sort();
        Ok(candidates)
    }
}
