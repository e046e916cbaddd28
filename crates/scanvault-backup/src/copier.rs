//! Durable file copies onto the mounted volume.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::{BackupError, BackupResult};

/// Copies one file into a destination directory.
#[async_trait]
pub trait FileCopier: Send + Sync {
    /// Copy `source` into `dest_dir`, returning the destination path.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::BackupError`] identifying the failing step when the
    /// source cannot be read or the destination cannot be written durably.
    async fn copy(&self, source: &Path, dest_dir: &Path) -> BackupResult<PathBuf>;
}

/// [`FileCopier`] that stages through a hidden temp file, fsyncs, then renames
/// into place so the destination never holds a half-written copy.
#[derive(Debug, Clone, Copy, Default)]
pub struct DurableCopier;

#[async_trait]
impl FileCopier for DurableCopier {
    async fn copy(&self, source: &Path, dest_dir: &Path) -> BackupResult<PathBuf> {
        let file_name = source.file_name().ok_or_else(|| {
            BackupError::copy(
                "copy.source_name",
                source,
                io::Error::new(io::ErrorKind::InvalidInput, "source has no file name"),
            )
        })?;

        let bytes = tokio::fs::read(source)
            .await
            .map_err(|err| BackupError::copy("copy.read_source", source, err))?;

        let temp_path = dest_dir.join(format!(".{}.partial", file_name.to_string_lossy()));
        let final_path = dest_dir.join(file_name);

        if let Err(err) = write_durably(&temp_path, &bytes).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(err);
        }

        if let Err(err) = tokio::fs::rename(&temp_path, &final_path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(BackupError::copy("copy.rename", &final_path, err));
        }
        Ok(final_path)
    }
}

async fn write_durably(temp_path: &Path, bytes: &[u8]) -> BackupResult<()> {
    let mut file = tokio::fs::File::create(temp_path)
        .await
        .map_err(|err| BackupError::copy("copy.write_temp", temp_path, err))?;
    file.write_all(bytes)
        .await
        .map_err(|err| BackupError::copy("copy.write_temp", temp_path, err))?;
    file.sync_all()
        .await
        .map_err(|err| BackupError::copy("copy.sync", temp_path, err))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn copies_contents_into_destination() {
        let src_dir = TempDir::new().expect("tempdir");
        let dest_dir = TempDir::new().expect("tempdir");
        let source = src_dir.path().join("scans.csv");
        std::fs::write(&source, b"ts,payload\n").expect("source written");

        let copied = DurableCopier
            .copy(&source, dest_dir.path())
            .await
            .expect("copy succeeds");

        assert_eq!(copied, dest_dir.path().join("scans.csv"));
        assert_eq!(
            std::fs::read(&copied).expect("destination readable"),
            b"ts,payload\n"
        );
        assert!(
            !dest_dir.path().join(".scans.csv.partial").exists(),
            "temp file should be renamed away"
        );
    }

    #[tokio::test]
    async fn overwrites_an_existing_destination() {
        let src_dir = TempDir::new().expect("tempdir");
        let dest_dir = TempDir::new().expect("tempdir");
        let source = src_dir.path().join("scans.csv");
        std::fs::write(&source, b"new\n").expect("source written");
        std::fs::write(dest_dir.path().join("scans.csv"), b"old\n").expect("stale copy written");

        let copied = DurableCopier
            .copy(&source, dest_dir.path())
            .await
            .expect("copy succeeds");
        assert_eq!(std::fs::read(&copied).expect("destination readable"), b"new\n");
    }

    #[tokio::test]
    async fn missing_source_reports_the_read_step() {
        let src_dir = TempDir::new().expect("tempdir");
        let dest_dir = TempDir::new().expect("tempdir");
        let source = src_dir.path().join("gone.csv");

        let err = DurableCopier
            .copy(&source, dest_dir.path())
            .await
            .expect_err("copy fails");
        assert!(matches!(
            err,
            BackupError::Copy {
                operation: "copy.read_source",
                ..
            }
        ));
    }
}
