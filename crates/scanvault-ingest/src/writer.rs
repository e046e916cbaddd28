//! Append-only CSV writer for scan payloads.

use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use scanvault_events::{Event, EventBus};
use tokio::io::AsyncWriteExt;

use crate::error::{IngestError, IngestResult};

/// Base name shared by every scan log file.
pub const LOG_FILE_PREFIX: &str = "scans";

/// Compute the log file name for the given date.
///
/// Dated mode yields `scans_<YYYY-MM-DD>.csv`; otherwise a single `scans.csv`
/// accumulates rows across days.
#[must_use]
pub fn log_file_name(dated: bool, date: NaiveDate) -> String {
    if dated {
        format!("{LOG_FILE_PREFIX}_{}.csv", date.format("%Y-%m-%d"))
    } else {
        format!("{LOG_FILE_PREFIX}.csv")
    }
}

/// Appends timestamped scan rows to the current log file.
#[derive(Clone)]
pub struct IngestionWriter {
    output_dir: PathBuf,
    dated_file: bool,
    events: EventBus,
}

impl IngestionWriter {
    /// Construct a writer targeting `output_dir`.
    #[must_use]
    pub const fn new(output_dir: PathBuf, dated_file: bool, events: EventBus) -> Self {
        Self {
            output_dir,
            dated_file,
            events,
        }
    }

    /// Path the next append will target, based on the local date right now.
    #[must_use]
    pub fn current_path(&self) -> PathBuf {
        self.output_dir
            .join(log_file_name(self.dated_file, Local::now().date_naive()))
    }

    /// Append one payload as a `timestamp,payload` row.
    ///
    /// Blank payloads are skipped and yield `Ok(None)`. On success the path of
    /// the file that received the row is returned and a scan event published.
    ///
    /// # Errors
    ///
    /// Returns an [`IngestError`] when the log file cannot be opened or
    /// written.
    pub async fn append(&self, payload: &str) -> IngestResult<Option<PathBuf>> {
        if payload.trim().is_empty() {
            return Ok(None);
        }

        let path = self.current_path();
        let row = format!("{},{payload}\n", Local::now().format("%Y-%m-%d %H:%M:%S"));

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|err| IngestError::io("ingest.open", &path, err))?;
        file.write_all(row.as_bytes())
            .await
            .map_err(|err| IngestError::io("ingest.append", &path, err))?;
        file.flush()
            .await
            .map_err(|err| IngestError::io("ingest.flush", &path, err))?;

        let _ = self.events.publish(Event::ScanRecorded {
            path: path.display().to_string(),
        });
        Ok(Some(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use tempfile::TempDir;

    fn writer_in(dir: &TempDir, dated: bool) -> IngestionWriter {
        IngestionWriter::new(dir.path().to_path_buf(), dated, EventBus::new())
    }

    #[test]
    fn dated_name_embeds_the_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).expect("valid date");
        assert_eq!(log_file_name(true, date), "scans_2024-03-09.csv");
        assert_eq!(log_file_name(false, date), "scans.csv");
    }

    #[tokio::test]
    async fn appends_rows_with_parseable_timestamps() {
        let dir = TempDir::new().expect("tempdir");
        let writer = writer_in(&dir, false);

        for payload in ["4006381333931", "  5012345678900", "ABC-123"] {
            let written = writer.append(payload).await.expect("append succeeds");
            assert_eq!(written, Some(dir.path().join("scans.csv")));
        }

        let contents =
            std::fs::read_to_string(dir.path().join("scans.csv")).expect("log file exists");
        let rows: Vec<&str> = contents.lines().collect();
        assert_eq!(rows.len(), 3);
        for (row, payload) in rows.iter().zip(["4006381333931", "  5012345678900", "ABC-123"]) {
            let (stamp, rest) = row.split_once(',').expect("row has a comma");
            NaiveDateTime::parse_from_str(stamp, "%Y-%m-%d %H:%M:%S")
                .expect("timestamp parses back");
            assert_eq!(rest, payload);
        }
    }

    #[tokio::test]
    async fn blank_payloads_are_skipped() {
        let dir = TempDir::new().expect("tempdir");
        let writer = writer_in(&dir, false);

        assert_eq!(writer.append("").await.expect("ok"), None);
        assert_eq!(writer.append("   \t").await.expect("ok"), None);
        assert!(!dir.path().join("scans.csv").exists());
    }

    #[tokio::test]
    async fn dated_writer_targets_todays_file() {
        let dir = TempDir::new().expect("tempdir");
        let writer = writer_in(&dir, true);

        let path = writer
            .append("payload")
            .await
            .expect("append succeeds")
            .expect("row written");
        let expected = log_file_name(true, Local::now().date_naive());
        assert_eq!(path, dir.path().join(expected));
    }

    #[tokio::test]
    async fn append_publishes_a_scan_event() {
        let dir = TempDir::new().expect("tempdir");
        let bus = EventBus::new();
        let writer = IngestionWriter::new(dir.path().to_path_buf(), false, bus.clone());
        let mut stream = bus.subscribe();

        writer.append("payload").await.expect("append succeeds");

        let envelope = stream.next().await.expect("event published");
        assert_eq!(envelope.event.kind(), "scan_recorded");
    }
}
