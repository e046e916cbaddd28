//! State-changing volume operations via `udisksctl`.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::detect::UDISKSCTL;
use crate::error::{BackupError, BackupResult};
use crate::exec::CommandRunner;
use crate::probe::VolumeProbe;
use crate::volume::Volume;

/// Mutates volume state: mount, unmount, power off.
#[async_trait]
pub trait VolumeController: Send + Sync {
    /// Mount the volume's filesystem.
    ///
    /// # Errors
    ///
    /// Returns [`BackupError::Mount`] with the utility's stderr as detail.
    async fn mount(&self, volume: &Volume) -> BackupResult<()>;

    /// Unmount the volume's filesystem. A volume that is already unmounted is
    /// left alone and reported as success.
    ///
    /// # Errors
    ///
    /// Returns [`BackupError::Unmount`] with the utility's stderr as detail.
    async fn unmount(&self, volume: &Volume) -> BackupResult<()>;

    /// Power the underlying device off so it can be unplugged safely.
    ///
    /// # Errors
    ///
    /// Returns [`BackupError::PowerOff`] with the utility's stderr as detail.
    async fn power_off(&self, volume: &Volume) -> BackupResult<()>;
}

/// [`VolumeController`] backed by `udisksctl`, which handles privilege
/// escalation through polkit so the process itself needs no elevated rights.
pub struct UdisksController {
    probe: Arc<dyn VolumeProbe>,
    runner: Arc<dyn CommandRunner>,
}

impl UdisksController {
    /// Construct a controller that re-checks state through `probe` before
    /// mutating anything.
    #[must_use]
    pub const fn new(probe: Arc<dyn VolumeProbe>, runner: Arc<dyn CommandRunner>) -> Self {
        Self { probe, runner }
    }

    /// Run a `udisksctl` subcommand, returning stderr (or the spawn error)
    /// as free-form detail on failure.
    async fn invoke(&self, subcommand: &str, volume: &Volume) -> Result<(), String> {
        let device = volume.device_path.to_string_lossy();
        let output = self
            .runner
            .run(UDISKSCTL, &[subcommand, "-b", device.as_ref()])
            .await
            .map_err(|err| err.to_string())?;
        if output.success {
            Ok(())
        } else {
            Err(output.stderr.trim().to_string())
        }
    }
}

#[async_trait]
impl VolumeController for UdisksController {
    async fn mount(&self, volume: &Volume) -> BackupResult<()> {
        self.invoke("mount", volume)
            .await
            .map_err(|detail| BackupError::mount(volume.uuid.clone(), detail))
    }

    async fn unmount(&self, volume: &Volume) -> BackupResult<()> {
        if !self.probe.is_mounted(volume).await {
            return Ok(());
        }
        self.invoke("unmount", volume)
            .await
            .map_err(|detail| BackupError::unmount(volume.uuid.clone(), detail))
    }

    async fn power_off(&self, volume: &Volume) -> BackupResult<()> {
        // A still-mounted filesystem would be yanked by power-off; try to
        // unmount first but proceed either way.
        if let Err(err) = self.unmount(volume).await {
            warn!(uuid = %volume.uuid, error = %err, "unmount before power-off failed");
        }
        self.invoke("power-off", volume)
            .await
            .map_err(|detail| BackupError::power_off(volume.uuid.clone(), detail))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::CommandOutput;
    use std::io;
    use std::path::PathBuf;
    use std::sync::Mutex;

    struct FixedProbe {
        mount_point: Option<PathBuf>,
    }

    #[async_trait]
    impl VolumeProbe for FixedProbe {
        async fn is_attached(&self, _volume: &Volume) -> bool {
            true
        }

        async fn mount_point(&self, _volume: &Volume) -> Option<PathBuf> {
            self.mount_point.clone()
        }
    }

    struct RecordingRunner {
        success: bool,
        stderr: &'static str,
        invocations: Mutex<Vec<Vec<String>>>,
    }

    impl RecordingRunner {
        fn new(success: bool, stderr: &'static str) -> Self {
            Self {
                success,
                stderr,
                invocations: Mutex::new(Vec::new()),
            }
        }

        fn invocations(&self) -> Vec<Vec<String>> {
            self.invocations.lock().expect("lock").clone()
        }
    }

    #[async_trait]
    impl CommandRunner for RecordingRunner {
        async fn run(&self, program: &str, args: &[&str]) -> io::Result<CommandOutput> {
            let mut invocation = vec![program.to_string()];
            invocation.extend(args.iter().map(ToString::to_string));
            self.invocations.lock().expect("lock").push(invocation);
            Ok(CommandOutput {
                success: self.success,
                stdout: String::new(),
                stderr: self.stderr.to_string(),
            })
        }
    }

    fn controller(
        mount_point: Option<PathBuf>,
        runner: Arc<RecordingRunner>,
    ) -> UdisksController {
        UdisksController::new(Arc::new(FixedProbe { mount_point }), runner)
    }

    #[tokio::test]
    async fn unmount_is_a_no_op_when_already_unmounted() {
        let runner = Arc::new(RecordingRunner::new(true, ""));
        let controller = controller(None, runner.clone());
        let volume = Volume::new("A1B2-C3D4", false);

        controller.unmount(&volume).await.expect("treated as done");
        assert!(runner.invocations().is_empty());
    }

    #[tokio::test]
    async fn unmount_invokes_udisksctl_when_mounted() {
        let runner = Arc::new(RecordingRunner::new(true, ""));
        let controller = controller(Some(PathBuf::from("/media/usb0")), runner.clone());
        let volume = Volume::new("A1B2-C3D4", false);

        controller.unmount(&volume).await.expect("unmounts");
        assert_eq!(
            runner.invocations(),
            vec![vec![
                "udisksctl".to_string(),
                "unmount".to_string(),
                "-b".to_string(),
                "/dev/disk/by-uuid/A1B2-C3D4".to_string(),
            ]]
        );
    }

    #[tokio::test]
    async fn mount_failure_carries_stderr_detail() {
        let runner = Arc::new(RecordingRunner::new(false, "Not authorized"));
        let controller = controller(None, runner);
        let volume = Volume::new("A1B2-C3D4", false);

        let err = controller.mount(&volume).await.expect_err("mount fails");
        match err {
            BackupError::Mount { uuid, detail } => {
                assert_eq!(uuid, "A1B2-C3D4");
                assert_eq!(detail, "Not authorized");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn power_off_still_runs_after_failed_unmount() {
        // Unmount fails because the runner reports failure, but power-off must
        // still be attempted with the same runner.
        let runner = Arc::new(RecordingRunner::new(false, "target is busy"));
        let controller = controller(Some(PathBuf::from("/media/usb0")), runner.clone());
        let volume = Volume::new("A1B2-C3D4", false);

        let result = controller.power_off(&volume).await;
        assert!(result.is_err(), "power-off also fails with this runner");

        let subcommands: Vec<String> = runner
            .invocations()
            .iter()
            .map(|invocation| invocation[1].clone())
            .collect();
        assert_eq!(subcommands, ["unmount", "power-off"]);
    }
}
