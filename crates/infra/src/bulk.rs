//! Bulk operations: register, status update, delete.
//!
//! All three follow a partial-success contract at the batch level — the
//! batch never aborts because one item fails at runtime — with two
//! documented exceptions: malformed input fails the whole request before any
//! side effect, and bulk status update is all-or-nothing on id resolution.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use photoflow_core::{DomainError, DomainResult, PhotoId};
use photoflow_events::EventKind;
use photoflow_photos::{validate_transition, Photo, PhotoStatus, RegisterPhoto};

use crate::assets::{delete_many, AssetStore};
use crate::event_log::EventStore;
use crate::lifecycle::LifecycleService;
use crate::photo_store::PhotoStore;
use crate::queue::PhotoQueue;

/// Upper bound on one bulk-register request.
pub const MAX_BULK_REGISTER: usize = 100;

/// Per-item result of a bulk registration.
#[derive(Debug, Clone, Serialize)]
pub struct BulkRegisterItemOutcome {
    pub asset_public_id: String,
    pub success: bool,
    pub photo: Option<Photo>,
    pub error: Option<String>,
}

/// How bulk delete resolves its targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeleteMode {
    /// Use the explicit `photo_ids` list.
    Explicit,
    /// Every photo, optionally narrowed by `status_filter`.
    All,
    AllCompleted,
    AllReviewed,
}

/// Bulk delete request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BulkDeleteRequest {
    #[serde(default)]
    pub photo_ids: Vec<PhotoId>,
    #[serde(default)]
    pub mode: Option<DeleteMode>,
    #[serde(default)]
    pub status_filter: Vec<PhotoStatus>,
}

impl BulkDeleteRequest {
    fn mode(&self) -> DeleteMode {
        self.mode.unwrap_or(DeleteMode::Explicit)
    }

    pub fn validate(&self) -> DomainResult<()> {
        match self.mode() {
            DeleteMode::Explicit if self.photo_ids.is_empty() => Err(DomainError::validation(
                "photo_ids must be provided when mode is EXPLICIT",
            )),
            DeleteMode::Explicit => Ok(()),
            _ if !self.photo_ids.is_empty() => Err(DomainError::validation(
                "photo_ids should not be provided when using mode-based deletion",
            )),
            _ => Ok(()),
        }
    }
}

/// One photo retained because its asset could not be deleted.
#[derive(Debug, Clone, Serialize)]
pub struct FailedDeletion {
    pub photo_id: PhotoId,
    pub asset_public_id: String,
    pub error: String,
}

/// Result of a bulk delete.
///
/// Invariant: `deleted_count + failed_count == requested_count`.
#[derive(Debug, Clone, Serialize)]
pub struct BulkDeleteOutcome {
    pub requested_count: usize,
    pub deleted_count: usize,
    pub failed_count: usize,
    pub failures: Vec<FailedDeletion>,
}

impl BulkDeleteOutcome {
    fn empty() -> Self {
        Self {
            requested_count: 0,
            deleted_count: 0,
            failed_count: 0,
            failures: Vec::new(),
        }
    }
}

/// Batch orchestration over the lifecycle core.
pub struct BulkService<P, E, A> {
    photos: P,
    assets: A,
    queue: Arc<PhotoQueue>,
    lifecycle: Arc<LifecycleService<P, E, A>>,
}

impl<P, E, A> BulkService<P, E, A>
where
    P: PhotoStore,
    E: EventStore,
    A: AssetStore,
{
    pub fn new(
        photos: P,
        assets: A,
        queue: Arc<PhotoQueue>,
        lifecycle: Arc<LifecycleService<P, E, A>>,
    ) -> Self {
        Self {
            photos,
            assets,
            queue,
            lifecycle,
        }
    }

    /// Register a batch of photos.
    ///
    /// Policy: every item is validated **before** any is persisted; a single
    /// invalid item (or an oversized/empty batch) fails the whole request
    /// with no side effects. Once validation passes, all items are saved in
    /// one batch, audited, and enqueued.
    pub fn register(
        &self,
        items: Vec<RegisterPhoto>,
    ) -> DomainResult<Vec<BulkRegisterItemOutcome>> {
        if items.is_empty() {
            return Err(DomainError::validation(
                "photos list is required and cannot be empty",
            ));
        }
        if items.len() > MAX_BULK_REGISTER {
            return Err(DomainError::validation(format!(
                "cannot register more than {MAX_BULK_REGISTER} photos at once"
            )));
        }
        for (index, item) in items.iter().enumerate() {
            item.validate().map_err(|err| {
                DomainError::validation(format!("photo at index {index}: {err}"))
            })?;
        }

        let photos: Vec<Photo> = items.into_iter().map(RegisterPhoto::into_photo).collect();
        let saved = self.photos.save_all(photos)?;

        let mut results = Vec::with_capacity(saved.len());
        for photo in saved {
            self.lifecycle.append_best_effort(
                photo.id,
                EventKind::Uploaded,
                format!("Photo uploaded: {}", photo.file_name),
            );
            self.queue.enqueue(photo.id);

            results.push(BulkRegisterItemOutcome {
                asset_public_id: photo.asset_public_id.clone(),
                success: true,
                photo: Some(photo),
                error: None,
            });
        }

        info!(count = results.len(), "bulk registered photos");
        Ok(results)
    }

    /// Update the status of a batch of photos.
    ///
    /// All-or-nothing: if any requested id is missing, or any transition is
    /// rejected, no photo in the batch is mutated.
    pub fn update_status(
        &self,
        photo_ids: &[PhotoId],
        status: PhotoStatus,
        error_message: Option<String>,
    ) -> DomainResult<Vec<Photo>> {
        if photo_ids.is_empty() {
            return Err(DomainError::validation(
                "photo_ids is required and cannot be empty",
            ));
        }

        let mut photos = self.photos.find_by_ids(photo_ids)?;
        if photos.len() != photo_ids.len() {
            return Err(DomainError::not_found("some photos were not found"));
        }

        // Validate every transition before mutating anything.
        for photo in &photos {
            validate_transition(photo.status, status)?;
        }

        for photo in &mut photos {
            photo.apply_status(status, error_message.clone());
        }
        let saved = self.photos.save_all(photos)?;

        for photo in &saved {
            self.lifecycle
                .append_status_events(photo.id, status, error_message.as_deref());
        }

        info!(count = saved.len(), status = %status, "bulk updated photo status");
        Ok(saved)
    }

    /// Delete a batch of photos with per-item asset-deletion outcomes.
    ///
    /// Only photos whose remote asset deletion succeeded (or that carry no
    /// asset id) are removed from the store; the rest are retained and
    /// reported in `failures`.
    pub fn delete(&self, request: &BulkDeleteRequest) -> DomainResult<BulkDeleteOutcome> {
        request.validate()?;

        let targets = self.resolve_targets(request)?;
        if targets.is_empty() {
            return Ok(BulkDeleteOutcome::empty());
        }
        debug!(count = targets.len(), mode = ?request.mode(), "resolved bulk delete targets");

        let public_ids: Vec<String> = targets
            .iter()
            .map(|p| p.asset_public_id.clone())
            .filter(|id| !id.is_empty())
            .collect();
        let asset_results = delete_many(&self.assets, &public_ids);

        let mut to_remove = Vec::new();
        let mut failures = Vec::new();
        for photo in &targets {
            let public_id = &photo.asset_public_id;
            let asset_gone = public_id.is_empty()
                || asset_results.get(public_id).copied().unwrap_or(false);
            if asset_gone {
                to_remove.push(photo.clone());
            } else {
                failures.push(FailedDeletion {
                    photo_id: photo.id,
                    asset_public_id: public_id.clone(),
                    error: "Asset deletion failed".to_string(),
                });
            }
        }

        if !to_remove.is_empty() {
            let ids: Vec<PhotoId> = to_remove.iter().map(|p| p.id).collect();
            self.photos.delete_all(&ids)?;
            for photo in &to_remove {
                self.lifecycle.append_best_effort(
                    photo.id,
                    EventKind::Deleted,
                    format!("Photo deleted: {}", photo.file_name),
                );
            }
        }

        let outcome = BulkDeleteOutcome {
            requested_count: targets.len(),
            deleted_count: to_remove.len(),
            failed_count: failures.len(),
            failures,
        };
        info!(
            requested = outcome.requested_count,
            deleted = outcome.deleted_count,
            failed = outcome.failed_count,
            "bulk delete finished"
        );
        Ok(outcome)
    }

    fn resolve_targets(&self, request: &BulkDeleteRequest) -> DomainResult<Vec<Photo>> {
        match request.mode() {
            DeleteMode::Explicit => self.photos.find_by_ids(&request.photo_ids),
            DeleteMode::AllCompleted => self.photos.find_by_status_in(&[PhotoStatus::Completed]),
            DeleteMode::AllReviewed => self.photos.find_by_status_in(&[PhotoStatus::Reviewed]),
            DeleteMode::All => {
                if request.status_filter.is_empty() {
                    self.photos.find_by_status_in(&[
                        PhotoStatus::Uploaded,
                        PhotoStatus::Processing,
                        PhotoStatus::Completed,
                        PhotoStatus::Reviewed,
                    ])
                } else {
                    self.photos.find_by_status_in(&request.status_filter)
                }
            }
        }
    }
}
