//! Service wiring: telemetry, the event logger, ingestion, and the backup
//! orchestrator, plus coordinated shutdown.

use std::sync::Arc;

use scanvault_backup::{
    BackupOrchestrator, BackupSelector, CommandRunner, DurableCopier, FileCopier, LsblkProbe,
    ProcessRunner, UdisksController, Volume, VolumeController, VolumeProbe,
    detect_removable_disks, ensure_backup_utilities,
};
use scanvault_config::{AppConfig, Cli};
use scanvault_events::EventBus;
use scanvault_ingest::{IngestionWriter, run_ingestion};
use scanvault_telemetry::LoggingConfig;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::error::{AppError, AppResult};

/// Entry point for the scanvault boot sequence.
///
/// # Errors
///
/// Returns an error if configuration, telemetry, or backup preflight fails.
pub async fn run_app() -> AppResult<()> {
    let cli = Cli::parse_args();

    let logging = LoggingConfig {
        version: env!("CARGO_PKG_VERSION"),
        ..LoggingConfig::default()
    };
    scanvault_telemetry::init_logging(&logging)
        .map_err(|err| AppError::telemetry("telemetry.init", err))?;

    // Detect mode is a one-shot listing; it ignores the service flags, so it
    // must not be blocked by their validation.
    if cli.detect_removable_disks {
        return run_detect().await;
    }

    let config = cli
        .into_config()
        .map_err(|err| AppError::config("cli.into_config", err))?;
    run_service(config).await
}

/// One-shot mode: print the removable-volume table and exit.
async fn run_detect() -> AppResult<()> {
    match detect_listing(AppConfig::backup_supported(), &ProcessRunner).await? {
        Some(listing) => println!("{listing}"),
        None => println!("removable-disk detection is not supported on this platform"),
    }
    Ok(())
}

/// Produce the removable-volume listing, or `None` on platforms without the
/// required utilities. An unsupported platform is a notice, not an error.
async fn detect_listing(
    supported: bool,
    runner: &dyn CommandRunner,
) -> AppResult<Option<String>> {
    if !supported {
        return Ok(None);
    }
    ensure_backup_utilities().map_err(|err| AppError::backup("backup.preflight", err))?;
    detect_removable_disks(runner)
        .await
        .map(Some)
        .map_err(|err| AppError::backup("backup.detect", err))
}

async fn run_service(config: AppConfig) -> AppResult<()> {
    info!(
        version = scanvault_telemetry::build_version(),
        output_dir = %config.output_dir.display(),
        dated_file = config.dated_file,
        "scanvault starting"
    );

    let events = EventBus::new();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let logger = spawn_event_logger(&events, shutdown_rx.clone());

    let writer = IngestionWriter::new(config.output_dir.clone(), config.dated_file, events.clone());
    let ingest_shutdown = shutdown_rx.clone();
    let mut ingest = tokio::spawn(async move {
        if let Err(err) = run_ingestion(&writer, ingest_shutdown).await {
            error!(error = %err, "ingestion stopped with an error");
        }
    });

    let backup = spawn_backup(&config, &events, shutdown_rx)?;

    info!("ready to scan");

    let ingest_done = tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(err) = result {
                error!(error = %err, "shutdown signal listener failed");
            }
            info!("shutdown signal received");
            false
        }
        joined = &mut ingest => {
            if let Err(err) = joined {
                warn!(task = "ingestion", error = %err, "task join failed");
            }
            info!("scan input closed");
            true
        }
    };

    let _ = shutdown_tx.send(true);

    if !ingest_done {
        join_task("ingestion", ingest).await;
    }
    if let Some(handle) = backup {
        join_task("backup", handle).await;
    }
    join_task("event-logger", logger).await;

    info!("scanvault stopped");
    Ok(())
}

/// Spawn the backup orchestrator when a volume is configured and the platform
/// supports it; otherwise the process runs ingestion-only.
fn spawn_backup(
    config: &AppConfig,
    events: &EventBus,
    shutdown: watch::Receiver<bool>,
) -> AppResult<Option<JoinHandle<()>>> {
    let Some(uuid) = config.volume_uuid.clone() else {
        info!("no backup volume configured, running ingestion only");
        return Ok(None);
    };
    if !AppConfig::backup_supported() {
        warn!(
            uuid = %uuid,
            "removable-volume backup is unsupported on this platform, running ingestion only"
        );
        return Ok(None);
    }

    ensure_backup_utilities().map_err(|err| AppError::backup("backup.preflight", err))?;

    let runner: Arc<dyn CommandRunner> = Arc::new(ProcessRunner);
    let probe: Arc<dyn VolumeProbe> = Arc::new(LsblkProbe::new(runner.clone()));
    let controller: Arc<dyn VolumeController> =
        Arc::new(UdisksController::new(probe.clone(), runner));
    let copier: Arc<dyn FileCopier> = Arc::new(DurableCopier);
    let selector = BackupSelector::new(config.output_dir.clone())
        .map_err(|err| AppError::backup("backup.selector", err))?;

    let orchestrator = BackupOrchestrator::new(
        Volume::new(uuid, config.auto_mount),
        probe,
        controller,
        copier,
        selector,
        events.clone(),
        config.poll_interval,
        config.power_off_after_failed_unmount,
    );

    Ok(Some(tokio::spawn(async move {
        orchestrator.run(shutdown).await;
    })))
}

/// Spawn a task that logs every published event as a structured line.
fn spawn_event_logger(events: &EventBus, mut shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
    let mut stream = events.subscribe();
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = shutdown.changed() => break,
                maybe = stream.next() => match maybe {
                    Some(envelope) => {
                        info!(
                            id = envelope.id,
                            kind = envelope.event.kind(),
                            payload = %serde_json::to_string(&envelope.event).unwrap_or_default(),
                            "event"
                        );
                    }
                    None => break,
                },
            }
        }
    })
}

async fn join_task(name: &'static str, handle: JoinHandle<()>) {
    if let Err(err) = handle.await {
        warn!(task = name, error = %err, "task join failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn detect_listing_is_a_notice_on_unsupported_platforms() {
        // The runner must never be consulted when the platform is unsupported;
        // a `Some` listing here would mean the gate was bypassed.
        let listing = detect_listing(false, &ProcessRunner)
            .await
            .expect("unsupported platform is not an error");
        assert!(listing.is_none());
    }
}
