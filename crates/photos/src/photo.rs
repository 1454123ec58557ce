use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use photoflow_core::{DomainError, DomainResult, Entity, PhotoId};

/// Photo status lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PhotoStatus {
    /// Initial state after registration.
    Uploaded,
    /// Being processed by the worker.
    Processing,
    /// Processing done.
    Completed,
    /// User reviewed (terminal).
    Reviewed,
    /// Processing failed.
    Failed,
}

impl core::fmt::Display for PhotoStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            PhotoStatus::Uploaded => "UPLOADED",
            PhotoStatus::Processing => "PROCESSING",
            PhotoStatus::Completed => "COMPLETED",
            PhotoStatus::Reviewed => "REVIEWED",
            PhotoStatus::Failed => "FAILED",
        };
        f.write_str(s)
    }
}

/// A registered photo record.
///
/// The binary asset lives in an external asset store; this record carries the
/// reference (`asset_public_id`, `asset_url`) plus descriptive metadata and
/// the lifecycle status. Status must only change through
/// [`crate::transitions::validate_transition`]; callers go through the
/// lifecycle service rather than mutating `status` directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    pub id: PhotoId,
    pub asset_public_id: String,
    pub asset_url: String,
    pub file_name: String,
    pub size_bytes: u64,
    pub content_type: String,
    pub status: PhotoStatus,
    pub error_message: Option<String>,
    pub processed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Photo {
    /// Apply a status change that has already been validated.
    ///
    /// Stamps `processed_at` exactly when the photo reaches `Completed`;
    /// the stamp is never cleared afterwards. The error message is replaced
    /// wholesale: `None` clears any previous error.
    pub fn apply_status(&mut self, status: PhotoStatus, error_message: Option<String>) {
        self.status = status;
        if status == PhotoStatus::Completed {
            self.processed_at = Some(Utc::now());
        }
        self.error_message = error_message;
        self.updated_at = Utc::now();
    }
}

impl Entity for Photo {
    type Id = PhotoId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Command: register a photo whose asset has already been uploaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterPhoto {
    pub asset_public_id: String,
    pub asset_url: String,
    pub file_name: String,
    pub size_bytes: u64,
    pub content_type: String,
}

impl RegisterPhoto {
    /// Validate the command fields.
    pub fn validate(&self) -> DomainResult<()> {
        if self.asset_public_id.trim().is_empty() {
            return Err(DomainError::validation("asset_public_id is required"));
        }
        if self.asset_url.trim().is_empty() {
            return Err(DomainError::validation("asset_url is required"));
        }
        if self.file_name.trim().is_empty() {
            return Err(DomainError::validation("file_name is required"));
        }
        if self.size_bytes == 0 {
            return Err(DomainError::validation("size_bytes must be positive"));
        }
        if self.content_type.trim().is_empty() {
            return Err(DomainError::validation("content_type is required"));
        }
        Ok(())
    }

    /// Build the initial `Uploaded` record from a validated command.
    pub fn into_photo(self) -> Photo {
        let now = Utc::now();
        Photo {
            id: PhotoId::new(),
            asset_public_id: self.asset_public_id,
            asset_url: self.asset_url,
            file_name: self.file_name,
            size_bytes: self.size_bytes,
            content_type: self.content_type,
            status: PhotoStatus::Uploaded,
            error_message: None,
            processed_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}
