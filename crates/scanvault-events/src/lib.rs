//! Core event bus for the scanvault process.
//!
//! The bus provides a typed event enum, sequential identifiers, and a broadcast
//! channel so observers (currently the application's event logger) can follow
//! ingestion and backup progress without coupling to either activity.
//! Internally it uses `tokio::broadcast` with a bounded buffer; when a
//! subscriber lags behind, the oldest events are dropped and the stream skips
//! ahead, matching the desired backpressure behaviour.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::broadcast;
use tokio::sync::broadcast::{Receiver, Sender};

/// Identifier assigned to each event emitted by the process.
pub type EventId = u64;

/// Default buffer size for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1_024;

/// Typed domain events surfaced across the system.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    ScanRecorded {
        path: String,
    },
    VolumeDetected {
        uuid: String,
    },
    MountFailed {
        uuid: String,
        message: String,
    },
    BackupStarted {
        uuid: String,
        mount_point: String,
    },
    FileCopied {
        uuid: String,
        path: String,
    },
    CopyFailed {
        uuid: String,
        path: String,
        message: String,
    },
    BackupCompleted {
        uuid: String,
        copied: usize,
        failed: usize,
    },
    VolumeUnmounted {
        uuid: String,
    },
    UnmountFailed {
        uuid: String,
        message: String,
    },
    VolumePoweredOff {
        uuid: String,
    },
    PowerOffFailed {
        uuid: String,
        message: String,
    },
}

impl Event {
    /// Machine-friendly discriminator for log consumers.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Event::ScanRecorded { .. } => "scan_recorded",
            Event::VolumeDetected { .. } => "volume_detected",
            Event::MountFailed { .. } => "mount_failed",
            Event::BackupStarted { .. } => "backup_started",
            Event::FileCopied { .. } => "file_copied",
            Event::CopyFailed { .. } => "copy_failed",
            Event::BackupCompleted { .. } => "backup_completed",
            Event::VolumeUnmounted { .. } => "volume_unmounted",
            Event::UnmountFailed { .. } => "unmount_failed",
            Event::VolumePoweredOff { .. } => "volume_powered_off",
            Event::PowerOffFailed { .. } => "power_off_failed",
        }
    }
}

/// Metadata wrapper around events. Each envelope tracks the event id and
/// emission timestamp.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq)]
pub struct EventEnvelope {
    pub id: EventId,
    pub timestamp: DateTime<Utc>,
    pub event: Event,
}

/// Shared event bus built on top of `tokio::broadcast`.
#[derive(Clone)]
pub struct EventBus {
    sender: Sender<EventEnvelope>,
    next_id: Arc<AtomicU64>,
}

impl EventBus {
    /// Construct a new bus with the provided broadcast capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "event bus capacity must be positive");
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Construct a bus with the default buffer size.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Publish a new event to the bus, assigning it a sequential identifier.
    ///
    /// Publishing never blocks; events with no live subscribers are dropped.
    pub fn publish(&self, event: Event) -> EventId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let envelope = EventEnvelope {
            id,
            timestamp: Utc::now(),
            event,
        };
        let _ = self.sender.send(envelope);
        id
    }

    /// Subscribe to events published after this call.
    #[must_use]
    pub fn subscribe(&self) -> EventStream {
        EventStream {
            receiver: self.sender.subscribe(),
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Stream wrapper that yields events from the live broadcast channel.
pub struct EventStream {
    receiver: Receiver<EventEnvelope>,
}

impl EventStream {
    /// Receive the next event, skipping ahead if the subscriber lagged.
    pub async fn next(&mut self) -> Option<EventEnvelope> {
        match self.receiver.recv().await {
            Ok(event) => Some(event),
            Err(broadcast::error::RecvError::Lagged(_)) => self.receiver.recv().await.ok(),
            Err(broadcast::error::RecvError::Closed) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_copy_event(id: usize) -> Event {
        Event::FileCopied {
            uuid: "0000-TEST".to_string(),
            path: format!("scans_{id}.csv"),
        }
    }

    #[tokio::test]
    async fn publish_assigns_sequential_ids() {
        let bus = EventBus::with_capacity(16);
        let mut stream = bus.subscribe();

        let mut last_id = 0;
        for i in 0..5 {
            last_id = bus.publish(sample_copy_event(i));
        }
        assert_eq!(last_id, 5);

        let mut received = Vec::new();
        for _ in 0..5 {
            if let Some(envelope) = stream.next().await {
                received.push(envelope);
            }
        }

        assert_eq!(received.len(), 5);
        assert_eq!(received.first().map(|e| e.id), Some(1));
        assert_eq!(received.last().map(|e| e.id), Some(5));
    }

    #[tokio::test]
    async fn lagged_subscriber_skips_ahead() {
        let bus = EventBus::with_capacity(2);
        let mut stream = bus.subscribe();

        for i in 0..10 {
            let _ = bus.publish(sample_copy_event(i));
        }

        let envelope = stream.next().await.expect("expected event after lag");
        assert!(envelope.id > 1, "lagged stream should skip dropped events");
    }

    #[tokio::test]
    async fn publish_without_subscribers_does_not_block() {
        let bus = EventBus::with_capacity(1);
        for i in 0..100 {
            let _ = bus.publish(sample_copy_event(i));
        }
        assert_eq!(bus.publish(sample_copy_event(100)), 101);
    }

    #[test]
    fn event_kind_matches_variants() {
        assert_eq!(
            Event::ScanRecorded {
                path: "scans.csv".to_string()
            }
            .kind(),
            "scan_recorded"
        );
        assert_eq!(
            Event::BackupCompleted {
                uuid: "0000-TEST".to_string(),
                copied: 2,
                failed: 1,
            }
            .kind(),
            "backup_completed"
        );
        assert_eq!(
            Event::PowerOffFailed {
                uuid: "0000-TEST".to_string(),
                message: "busy".to_string(),
            }
            .kind(),
            "power_off_failed"
        );
    }

    #[test]
    fn events_serialize_with_snake_case_tags() {
        let event = Event::UnmountFailed {
            uuid: "0000-TEST".to_string(),
            message: "target is busy".to_string(),
        };
        let value = serde_json::to_value(&event).expect("event serializes");
        assert_eq!(
            value.get("type").and_then(|v| v.as_str()),
            Some("unmount_failed")
        );
        assert_eq!(
            value.get("uuid").and_then(|v| v.as_str()),
            Some("0000-TEST")
        );
    }
}
