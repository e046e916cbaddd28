//! Read-only volume state checks.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::detect::LSBLK;
use crate::exec::CommandRunner;
use crate::volume::Volume;

/// Observes attachment and mount state without changing it.
#[async_trait]
pub trait VolumeProbe: Send + Sync {
    /// Whether the volume's block device is currently attached.
    async fn is_attached(&self, volume: &Volume) -> bool;

    /// Mount point of the volume, when mounted.
    async fn mount_point(&self, volume: &Volume) -> Option<PathBuf>;

    /// Whether the volume is currently mounted.
    async fn is_mounted(&self, volume: &Volume) -> bool {
        self.mount_point(volume).await.is_some()
    }
}

/// [`VolumeProbe`] backed by the udev symlink directory and `lsblk`.
pub struct LsblkProbe {
    runner: Arc<dyn CommandRunner>,
}

impl LsblkProbe {
    /// Construct a probe that shells out through `runner`.
    #[must_use]
    pub const fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }
}

#[async_trait]
impl VolumeProbe for LsblkProbe {
    async fn is_attached(&self, volume: &Volume) -> bool {
        tokio::fs::try_exists(&volume.device_path)
            .await
            .unwrap_or(false)
    }

    async fn mount_point(&self, volume: &Volume) -> Option<PathBuf> {
        let device = volume.device_path.to_string_lossy();
        let output = match self
            .runner
            .run(LSBLK, &["-n", "-o", "mountpoint", device.as_ref()])
            .await
        {
            Ok(output) => output,
            Err(err) => {
                debug!(uuid = %volume.uuid, error = %err, "mount point query failed to run");
                return None;
            }
        };
        if !output.success {
            debug!(
                uuid = %volume.uuid,
                stderr = %output.stderr.trim(),
                "mount point query reported failure"
            );
            return None;
        }

        let line = output.stdout.lines().next().unwrap_or("").trim();
        if line.is_empty() {
            None
        } else {
            Some(PathBuf::from(line))
        }
    }
}
