//! Lifecycle service: the single authoritative path for photo state changes.
//!
//! Every status change — whether driven by a request handler, the worker, or
//! a bulk operation — validates against the transition table, persists the
//! record, and then appends audit events. Event appends are best-effort:
//! once the record save has succeeded, a failed append is logged and the
//! mutation stands.

use std::sync::Arc;

use tracing::{debug, warn};

use photoflow_core::{DomainError, DomainResult, PhotoId};
use photoflow_events::EventKind;
use photoflow_photos::{validate_transition, Photo, PhotoStatus, RegisterPhoto};

use crate::assets::AssetStore;
use crate::event_log::{append_event, EventStore};
use crate::photo_store::PhotoStore;
use crate::queue::PhotoQueue;

/// Orchestrates register / transition / delete for single photos.
///
/// Generic over its collaborators so tests can wire in-memory doubles and a
/// deployment can substitute real backends without touching the logic.
pub struct LifecycleService<P, E, A> {
    photos: P,
    events: E,
    assets: A,
    queue: Arc<PhotoQueue>,
}

impl<P, E, A> LifecycleService<P, E, A>
where
    P: PhotoStore,
    E: EventStore,
    A: AssetStore,
{
    pub fn new(photos: P, events: E, assets: A, queue: Arc<PhotoQueue>) -> Self {
        Self {
            photos,
            events,
            assets,
            queue,
        }
    }

    pub fn queue(&self) -> &Arc<PhotoQueue> {
        &self.queue
    }

    /// Register a photo: validate, persist, audit, enqueue for processing.
    pub fn register(&self, cmd: RegisterPhoto) -> DomainResult<Photo> {
        cmd.validate()?;
        let saved = self.photos.save(cmd.into_photo())?;

        self.append_best_effort(
            saved.id,
            EventKind::Uploaded,
            format!("Photo uploaded: {}", saved.file_name),
        );
        self.queue.enqueue(saved.id);

        debug!(photo_id = %saved.id, file_name = %saved.file_name, "photo registered");
        Ok(saved)
    }

    /// Drive a photo to `proposed`, validating against the transition table.
    ///
    /// Ordering of side effects: validate (no mutation on rejection) → save →
    /// append events. The save must complete before any append is attempted;
    /// append failures do not revert the save.
    pub fn transition(
        &self,
        id: PhotoId,
        proposed: PhotoStatus,
        error_message: Option<String>,
    ) -> DomainResult<Photo> {
        let mut photo = self
            .photos
            .find_by_id(id)?
            .ok_or_else(|| DomainError::not_found(format!("photo {id}")))?;

        validate_transition(photo.status, proposed)?;

        photo.apply_status(proposed, error_message.clone());
        let saved = self.photos.save(photo)?;

        self.append_status_events(id, proposed, error_message.as_deref());

        debug!(photo_id = %id, status = %proposed, "photo transitioned");
        Ok(saved)
    }

    /// Delete a photo: best-effort asset delete, remove record, audit.
    pub fn delete(&self, id: PhotoId) -> DomainResult<()> {
        let photo = self
            .photos
            .find_by_id(id)?
            .ok_or_else(|| DomainError::not_found(format!("photo {id}")))?;

        if let Err(err) = self.assets.delete_one(&photo.asset_public_id) {
            warn!(photo_id = %id, public_id = %photo.asset_public_id, error = %err,
                "asset delete failed; removing record anyway");
        }

        self.photos.delete_all(&[id])?;
        self.append_best_effort(
            id,
            EventKind::Deleted,
            format!("Photo deleted: {}", photo.file_name),
        );
        Ok(())
    }

    /// Emit the STATUS_CHANGED event plus the status-specific event.
    ///
    /// Shared by single and bulk status updates so both produce an identical
    /// audit trail.
    pub(crate) fn append_status_events(
        &self,
        id: PhotoId,
        status: PhotoStatus,
        error_message: Option<&str>,
    ) {
        let mut message = format!("Photo status updated to {status}");
        if let Some(err) = error_message {
            message.push_str(": ");
            message.push_str(err);
        }
        self.append_best_effort(id, EventKind::StatusChanged, message);

        match status {
            PhotoStatus::Processing => {
                self.append_best_effort(id, EventKind::ProcessingStarted, "Photo processing started");
            }
            PhotoStatus::Completed => {
                self.append_best_effort(
                    id,
                    EventKind::ProcessingCompleted,
                    "Photo processing completed successfully",
                );
            }
            PhotoStatus::Failed => {
                let err = error_message.unwrap_or("Unknown error");
                self.append_best_effort(
                    id,
                    EventKind::ProcessingFailed,
                    format!("Photo processing failed: {err}"),
                );
            }
            // No extra event for Uploaded (retry) or Reviewed.
            PhotoStatus::Uploaded | PhotoStatus::Reviewed => {}
        }
    }

    pub(crate) fn append_best_effort(&self, id: PhotoId, kind: EventKind, message: impl Into<String>) {
        if let Err(err) = append_event(&self.events, id, kind, message) {
            warn!(photo_id = %id, kind = %kind, error = %err, "event append failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::InMemoryAssetStore;
    use crate::event_log::InMemoryEventStore;
    use crate::photo_store::InMemoryPhotoStore;

    type TestService =
        LifecycleService<Arc<InMemoryPhotoStore>, Arc<InMemoryEventStore>, Arc<InMemoryAssetStore>>;

    struct Fixture {
        photos: Arc<InMemoryPhotoStore>,
        events: Arc<InMemoryEventStore>,
        assets: Arc<InMemoryAssetStore>,
        queue: Arc<PhotoQueue>,
        service: TestService,
    }

    fn fixture() -> Fixture {
        let photos = InMemoryPhotoStore::arc();
        let events = InMemoryEventStore::arc();
        let assets = Arc::new(InMemoryAssetStore::new());
        let queue = Arc::new(PhotoQueue::new());
        let service = LifecycleService::new(
            photos.clone(),
            events.clone(),
            assets.clone(),
            queue.clone(),
        );
        Fixture {
            photos,
            events,
            assets,
            queue,
            service,
        }
    }

    fn register_cmd() -> RegisterPhoto {
        RegisterPhoto {
            asset_public_id: "abc123".to_string(),
            asset_url: "https://assets.example/abc123.jpg".to_string(),
            file_name: "x.jpg".to_string(),
            size_bytes: 10,
            content_type: "image/jpeg".to_string(),
        }
    }

    fn count_kind(events: &[photoflow_events::PhotoEvent], kind: EventKind) -> usize {
        events.iter().filter(|e| e.kind == kind).count()
    }

    #[test]
    fn register_persists_audits_and_enqueues() {
        let fx = fixture();
        let photo = fx.service.register(register_cmd()).unwrap();

        assert_eq!(photo.status, PhotoStatus::Uploaded);
        assert!(fx.photos.find_by_id(photo.id).unwrap().is_some());
        assert_eq!(fx.queue.len(), 1);

        let events = fx.events.for_photo(photo.id).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, EventKind::Uploaded);
        assert!(events[0].message.contains("x.jpg"));
    }

    #[test]
    fn register_rejects_invalid_command_without_side_effects() {
        let fx = fixture();
        let mut cmd = register_cmd();
        cmd.asset_public_id = String::new();

        assert!(matches!(
            fx.service.register(cmd),
            Err(DomainError::Validation(_))
        ));
        assert!(fx.photos.find_all().unwrap().is_empty());
        assert!(fx.queue.is_empty());
    }

    #[test]
    fn full_transition_path_emits_expected_events() {
        let fx = fixture();
        let photo = fx.service.register(register_cmd()).unwrap();

        fx.service
            .transition(photo.id, PhotoStatus::Processing, None)
            .unwrap();
        let done = fx
            .service
            .transition(photo.id, PhotoStatus::Completed, None)
            .unwrap();

        assert_eq!(done.status, PhotoStatus::Completed);
        assert!(done.processed_at.is_some());

        let events = fx.events.for_photo(photo.id).unwrap();
        assert_eq!(count_kind(&events, EventKind::StatusChanged), 2);
        assert_eq!(count_kind(&events, EventKind::ProcessingStarted), 1);
        assert_eq!(count_kind(&events, EventKind::ProcessingCompleted), 1);
    }

    #[test]
    fn invalid_transition_leaves_photo_and_log_untouched() {
        let fx = fixture();
        let photo = fx.service.register(register_cmd()).unwrap();
        let events_before = fx.events.for_photo(photo.id).unwrap().len();

        let err = fx
            .service
            .transition(photo.id, PhotoStatus::Completed, None)
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition { .. }));

        let stored = fx.photos.find_by_id(photo.id).unwrap().unwrap();
        assert_eq!(stored.status, PhotoStatus::Uploaded);
        assert_eq!(fx.events.for_photo(photo.id).unwrap().len(), events_before);
    }

    #[test]
    fn failed_transition_records_error_and_event() {
        let fx = fixture();
        let photo = fx.service.register(register_cmd()).unwrap();
        fx.service
            .transition(photo.id, PhotoStatus::Processing, None)
            .unwrap();

        let failed = fx
            .service
            .transition(photo.id, PhotoStatus::Failed, Some("decode error".to_string()))
            .unwrap();
        assert_eq!(failed.error_message.as_deref(), Some("decode error"));

        let events = fx.events.for_photo(photo.id).unwrap();
        let failure = events
            .iter()
            .find(|e| e.kind == EventKind::ProcessingFailed)
            .unwrap();
        assert!(failure.message.contains("decode error"));
    }

    #[test]
    fn transition_of_unknown_photo_is_not_found() {
        let fx = fixture();
        let err = fx
            .service
            .transition(PhotoId::new(), PhotoStatus::Processing, None)
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[test]
    fn delete_removes_record_even_when_asset_delete_fails() {
        let fx = fixture();
        let photo = fx.service.register(register_cmd()).unwrap();
        fx.assets.fail_deletes_for("abc123");

        fx.service.delete(photo.id).unwrap();

        assert!(fx.photos.find_by_id(photo.id).unwrap().is_none());
        let events = fx.events.for_photo(photo.id).unwrap();
        assert_eq!(count_kind(&events, EventKind::Deleted), 1);
    }
}
