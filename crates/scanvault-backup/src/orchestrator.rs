//! Polling loop that ties probe, controller, selector, and copier together.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use scanvault_events::{Event, EventBus};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::controller::VolumeController;
use crate::copier::FileCopier;
use crate::probe::VolumeProbe;
use crate::selector::BackupSelector;
use crate::volume::{BackupCycle, Volume};

/// Drives the backup state machine for one configured volume.
///
/// Each poll tick observes the volume and, when it is mounted, runs a full
/// cycle: copy every candidate file, unmount, power off. Because a completed
/// cycle leaves the volume unmounted, the next tick sees no mount point and
/// stays idle until the volume is re-attached or re-mounted.
pub struct BackupOrchestrator {
    volume: Volume,
    probe: Arc<dyn VolumeProbe>,
    controller: Arc<dyn VolumeController>,
    copier: Arc<dyn FileCopier>,
    selector: BackupSelector,
    events: EventBus,
    poll_interval: Duration,
    power_off_after_failed_unmount: bool,
}

impl BackupOrchestrator {
    /// Construct an orchestrator for `volume`.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub const fn new(
        volume: Volume,
        probe: Arc<dyn VolumeProbe>,
        controller: Arc<dyn VolumeController>,
        copier: Arc<dyn FileCopier>,
        selector: BackupSelector,
        events: EventBus,
        poll_interval: Duration,
        power_off_after_failed_unmount: bool,
    ) -> Self {
        Self {
            volume,
            probe,
            controller,
            copier,
            selector,
            events,
            poll_interval,
            power_off_after_failed_unmount,
        }
    }

    /// Poll until the shutdown channel fires.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        info!(
            uuid = %self.volume.uuid,
            auto_mount = self.volume.auto_mount,
            "backup orchestrator started"
        );
        loop {
            tokio::select! {
                _ = shutdown.changed() => break,
                () = tokio::time::sleep(self.poll_interval) => {
                    if let Some(cycle) = self.tick().await {
                        info!(
                            uuid = %self.volume.uuid,
                            copied = cycle.copied,
                            failed = cycle.failed,
                            unmounted = cycle.unmounted,
                            powered_off = cycle.powered_off,
                            "backup cycle finished"
                        );
                    }
                }
            }
        }
        info!(uuid = %self.volume.uuid, "backup orchestrator stopped");
    }

    /// Observe the volume once and run a backup cycle when it is mounted.
    pub async fn tick(&self) -> Option<BackupCycle> {
        if self.volume.auto_mount
            && self.probe.is_attached(&self.volume).await
            && !self.probe.is_mounted(&self.volume).await
        {
            self.publish(Event::VolumeDetected {
                uuid: self.volume.uuid.clone(),
            });
            if let Err(err) = self.controller.mount(&self.volume).await {
                warn!(uuid = %self.volume.uuid, error = %err, "automatic mount failed");
                self.publish(Event::MountFailed {
                    uuid: self.volume.uuid.clone(),
                    message: err.to_string(),
                });
                return None;
            }
        }

        let mount_point = self.probe.mount_point(&self.volume).await?;
        Some(self.run_cycle(&mount_point).await)
    }

    async fn run_cycle(&self, mount_point: &Path) -> BackupCycle {
        self.publish(Event::BackupStarted {
            uuid: self.volume.uuid.clone(),
            mount_point: mount_point.display().to_string(),
        });

        let candidates = self.selector.list_candidates().unwrap_or_else(|err| {
            warn!(uuid = %self.volume.uuid, error = %err, "candidate listing failed");
            Vec::new()
        });

        let mut cycle = BackupCycle::default();
        for source in candidates {
            // The device can be yanked mid-cycle; abandon the rest instead of
            // piling copy errors onto a missing mount.
            if !self.probe.is_mounted(&self.volume).await {
                warn!(uuid = %self.volume.uuid, "mount lost mid-cycle, abandoning remaining files");
                break;
            }
            cycle.attempted.push(source.clone());
            match self.copier.copy(&source, mount_point).await {
                Ok(dest) => {
                    cycle.copied += 1;
                    self.publish(Event::FileCopied {
                        uuid: self.volume.uuid.clone(),
                        path: dest.display().to_string(),
                    });
                }
                Err(err) => {
                    cycle.failed += 1;
                    warn!(
                        uuid = %self.volume.uuid,
                        path = %source.display(),
                        error = %err,
                        "file copy failed"
                    );
                    self.publish(Event::CopyFailed {
                        uuid: self.volume.uuid.clone(),
                        path: source.display().to_string(),
                        message: err.to_string(),
                    });
                }
            }
        }

        self.publish(Event::BackupCompleted {
            uuid: self.volume.uuid.clone(),
            copied: cycle.copied,
            failed: cycle.failed,
        });

        match self.controller.unmount(&self.volume).await {
            Ok(()) => {
                cycle.unmounted = true;
                self.publish(Event::VolumeUnmounted {
                    uuid: self.volume.uuid.clone(),
                });
            }
            Err(err) => {
                warn!(uuid = %self.volume.uuid, error = %err, "unmount failed");
                self.publish(Event::UnmountFailed {
                    uuid: self.volume.uuid.clone(),
                    message: err.to_string(),
                });
                if !self.power_off_after_failed_unmount {
                    return cycle;
                }
            }
        }

        match self.controller.power_off(&self.volume).await {
            Ok(()) => {
                cycle.powered_off = true;
                self.publish(Event::VolumePoweredOff {
                    uuid: self.volume.uuid.clone(),
                });
            }
            Err(err) => {
                warn!(uuid = %self.volume.uuid, error = %err, "power-off failed");
                self.publish(Event::PowerOffFailed {
                    uuid: self.volume.uuid.clone(),
                    message: err.to_string(),
                });
            }
        }
        cycle
    }

    fn publish(&self, event: Event) {
        let _ = self.events.publish(event);
    }
}
