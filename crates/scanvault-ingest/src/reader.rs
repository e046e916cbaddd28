//! Line-oriented reader that drives the writer from an async input stream.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::error::{IngestError, IngestResult};
use crate::writer::IngestionWriter;

/// Read scan payloads from standard input until EOF or shutdown.
///
/// # Errors
///
/// Returns an [`IngestError`] when reading stdin or appending to the log
/// file fails.
pub async fn run_ingestion(
    writer: &IngestionWriter,
    shutdown: watch::Receiver<bool>,
) -> IngestResult<()> {
    let stdin = BufReader::new(tokio::io::stdin());
    run_from(stdin, writer, shutdown).await
}

/// Read payload lines from `reader` and append each to the scan log.
///
/// Stops cleanly on EOF or when the shutdown channel fires; a pending read is
/// abandoned rather than awaited to completion. A failed append is logged and
/// the loop keeps reading, since the device can recover (directory remounted,
/// disk space freed) without a restart.
///
/// # Errors
///
/// Returns an [`IngestError`] when the input stream itself fails.
pub async fn run_from<R>(
    reader: R,
    writer: &IngestionWriter,
    mut shutdown: watch::Receiver<bool>,
) -> IngestResult<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    loop {
        tokio::select! {
            _ = shutdown.changed() => break,
            line = lines.next_line() => match line {
                Ok(Some(payload)) => match writer.append(&payload).await {
                    Ok(Some(path)) => debug!(path = %path.display(), "scan recorded"),
                    Ok(None) => {}
                    Err(err) => warn!(error = %err, "scan append failed"),
                },
                Ok(None) => break,
                Err(err) => return Err(IngestError::stream("ingest.read_line", err)),
            },
        }
    }
    Ok(())
}
