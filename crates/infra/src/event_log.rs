//! Append-only event log storage and queries.
//!
//! The log is **best-effort auditing**, not transactional with the record
//! mutation it describes: the lifecycle service saves the photo first and
//! then appends events, and a failed append is logged but does not roll the
//! save back. That asymmetry is intentional.

use std::sync::{Arc, RwLock};

use photoflow_core::{DomainError, DomainResult, PhotoId};
use photoflow_events::{EventKind, PhotoEvent};

/// Hard cap on a single query page.
pub const MAX_PAGE_SIZE: usize = 500;

/// Event log abstraction: append + ordered/filtered read.
pub trait EventStore: Send + Sync {
    /// Append one event to the log.
    fn append(&self, event: PhotoEvent) -> DomainResult<()>;

    /// All events for one photo, newest first, unpaged.
    fn for_photo(&self, photo_id: PhotoId) -> DomainResult<Vec<PhotoEvent>>;

    /// One page of all events, newest first.
    ///
    /// `page` is zero-based; `size` must be positive and is clamped to
    /// [`MAX_PAGE_SIZE`].
    fn page_all(&self, page: usize, size: usize) -> DomainResult<Vec<PhotoEvent>>;
}

/// Convenience used throughout the services: build and append in one call.
pub fn append_event<E: EventStore + ?Sized>(
    store: &E,
    photo_id: PhotoId,
    kind: EventKind,
    message: impl Into<String>,
) -> DomainResult<()> {
    store.append(PhotoEvent::new(photo_id, kind, message))
}

/// In-memory event log for a single-instance deployment and tests.
#[derive(Debug, Default)]
pub struct InMemoryEventStore {
    events: RwLock<Vec<PhotoEvent>>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arc() -> Arc<Self> {
        Arc::new(Self::new())
    }
}

impl EventStore for InMemoryEventStore {
    fn append(&self, event: PhotoEvent) -> DomainResult<()> {
        self.events
            .write()
            .map_err(|_| DomainError::storage("event log lock poisoned"))?
            .push(event);
        Ok(())
    }

    fn for_photo(&self, photo_id: PhotoId) -> DomainResult<Vec<PhotoEvent>> {
        let guard = self
            .events
            .read()
            .map_err(|_| DomainError::storage("event log lock poisoned"))?;
        let mut result: Vec<_> = guard
            .iter()
            .filter(|e| e.photo_id == photo_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));
        Ok(result)
    }

    fn page_all(&self, page: usize, size: usize) -> DomainResult<Vec<PhotoEvent>> {
        if size == 0 {
            return Err(DomainError::validation("page size must be positive"));
        }
        let size = size.min(MAX_PAGE_SIZE);

        let guard = self
            .events
            .read()
            .map_err(|_| DomainError::storage("event log lock poisoned"))?;
        let mut all: Vec<_> = guard.clone();
        all.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));

        Ok(all
            .into_iter()
            .skip(page.saturating_mul(size))
            .take(size)
            .collect())
    }
}

impl<S> EventStore for Arc<S>
where
    S: EventStore + ?Sized,
{
    fn append(&self, event: PhotoEvent) -> DomainResult<()> {
        (**self).append(event)
    }

    fn for_photo(&self, photo_id: PhotoId) -> DomainResult<Vec<PhotoEvent>> {
        (**self).for_photo(photo_id)
    }

    fn page_all(&self, page: usize, size: usize) -> DomainResult<Vec<PhotoEvent>> {
        (**self).page_all(page, size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn for_photo_returns_newest_first() {
        let store = InMemoryEventStore::new();
        let id = PhotoId::new();
        let other = PhotoId::new();

        let mut first = PhotoEvent::new(id, EventKind::Uploaded, "uploaded");
        first.occurred_at = chrono::Utc::now() - chrono::Duration::seconds(10);
        store.append(first).unwrap();
        append_event(&store, other, EventKind::Uploaded, "other").unwrap();
        append_event(&store, id, EventKind::StatusChanged, "changed").unwrap();

        let events = store.for_photo(id).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].kind, EventKind::StatusChanged);
        assert_eq!(events[1].kind, EventKind::Uploaded);
    }

    #[test]
    fn page_all_pages_newest_first() {
        let store = InMemoryEventStore::new();
        for i in 0..5 {
            let mut e = PhotoEvent::new(PhotoId::new(), EventKind::Uploaded, format!("e{i}"));
            e.occurred_at = chrono::Utc::now() + chrono::Duration::seconds(i);
            store.append(e).unwrap();
        }

        let first_page = store.page_all(0, 2).unwrap();
        assert_eq!(first_page.len(), 2);
        assert_eq!(first_page[0].message, "e4");

        let last_page = store.page_all(2, 2).unwrap();
        assert_eq!(last_page.len(), 1);
        assert_eq!(last_page[0].message, "e0");

        assert!(store.page_all(10, 2).unwrap().is_empty());
    }

    #[test]
    fn zero_page_size_is_a_validation_error() {
        let store = InMemoryEventStore::new();
        assert!(matches!(
            store.page_all(0, 0),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn size_is_clamped_to_the_maximum() {
        let store = InMemoryEventStore::new();
        append_event(&store, PhotoId::new(), EventKind::Uploaded, "e").unwrap();
        let events = store.page_all(0, MAX_PAGE_SIZE * 10).unwrap();
        assert_eq!(events.len(), 1);
    }
}
