use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use photoflow_core::{EventId, PhotoId};

/// Kind of a lifecycle event.
///
/// Part of the persisted/observable contract; keep the variants and their
/// serialized names stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    Uploaded,
    StatusChanged,
    ProcessingStarted,
    ProcessingCompleted,
    ProcessingFailed,
    Deleted,
}

impl core::fmt::Display for EventKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            EventKind::Uploaded => "UPLOADED",
            EventKind::StatusChanged => "STATUS_CHANGED",
            EventKind::ProcessingStarted => "PROCESSING_STARTED",
            EventKind::ProcessingCompleted => "PROCESSING_COMPLETED",
            EventKind::ProcessingFailed => "PROCESSING_FAILED",
            EventKind::Deleted => "DELETED",
        };
        f.write_str(s)
    }
}

/// A persisted lifecycle event.
///
/// `occurred_at` is business time (used for query ordering); `recorded_at`
/// is when the record was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoEvent {
    pub id: EventId,
    pub photo_id: PhotoId,
    pub kind: EventKind,
    pub message: String,
    pub occurred_at: DateTime<Utc>,
    pub recorded_at: DateTime<Utc>,
}

impl PhotoEvent {
    /// Create a new event stamped with the current time.
    pub fn new(photo_id: PhotoId, kind: EventKind, message: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: EventId::new(),
            photo_id,
            kind,
            message: message.into(),
            occurred_at: now,
            recorded_at: now,
        }
    }
}
