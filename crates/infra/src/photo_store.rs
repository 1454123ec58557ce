//! Photo record storage.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use photoflow_core::{DomainError, DomainResult, PhotoId};
use photoflow_photos::{Photo, PhotoStatus};

/// Photo store abstraction.
///
/// The store is the sole owner of photo records; services load a record,
/// mutate a copy, and save it back. There is no cross-call locking, so
/// concurrent saves of the same id are last-write-wins.
pub trait PhotoStore: Send + Sync {
    /// Point lookup by id.
    fn find_by_id(&self, id: PhotoId) -> DomainResult<Option<Photo>>;

    /// Insert or replace a single record.
    fn save(&self, photo: Photo) -> DomainResult<Photo>;

    /// Insert or replace a batch of records.
    fn save_all(&self, photos: Vec<Photo>) -> DomainResult<Vec<Photo>>;

    /// Resolve a set of ids; missing ids are silently absent from the result.
    fn find_by_ids(&self, ids: &[PhotoId]) -> DomainResult<Vec<Photo>>;

    /// All records whose status is in `statuses`.
    fn find_by_status_in(&self, statuses: &[PhotoStatus]) -> DomainResult<Vec<Photo>>;

    /// All records, oldest first.
    fn find_all(&self) -> DomainResult<Vec<Photo>>;

    /// Remove a batch of records by id. Unknown ids are ignored.
    fn delete_all(&self, ids: &[PhotoId]) -> DomainResult<()>;
}

/// In-memory photo store for a single-instance deployment and tests.
#[derive(Debug, Default)]
pub struct InMemoryPhotoStore {
    photos: RwLock<HashMap<PhotoId, Photo>>,
}

impl InMemoryPhotoStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arc() -> Arc<Self> {
        Arc::new(Self::new())
    }

    fn read(&self) -> DomainResult<std::sync::RwLockReadGuard<'_, HashMap<PhotoId, Photo>>> {
        self.photos
            .read()
            .map_err(|_| DomainError::storage("photo store lock poisoned"))
    }

    fn write(&self) -> DomainResult<std::sync::RwLockWriteGuard<'_, HashMap<PhotoId, Photo>>> {
        self.photos
            .write()
            .map_err(|_| DomainError::storage("photo store lock poisoned"))
    }
}

impl PhotoStore for InMemoryPhotoStore {
    fn find_by_id(&self, id: PhotoId) -> DomainResult<Option<Photo>> {
        Ok(self.read()?.get(&id).cloned())
    }

    fn save(&self, photo: Photo) -> DomainResult<Photo> {
        self.write()?.insert(photo.id, photo.clone());
        Ok(photo)
    }

    fn save_all(&self, photos: Vec<Photo>) -> DomainResult<Vec<Photo>> {
        let mut guard = self.write()?;
        for photo in &photos {
            guard.insert(photo.id, photo.clone());
        }
        Ok(photos)
    }

    fn find_by_ids(&self, ids: &[PhotoId]) -> DomainResult<Vec<Photo>> {
        let guard = self.read()?;
        Ok(ids.iter().filter_map(|id| guard.get(id).cloned()).collect())
    }

    fn find_by_status_in(&self, statuses: &[PhotoStatus]) -> DomainResult<Vec<Photo>> {
        let guard = self.read()?;
        let mut result: Vec<_> = guard
            .values()
            .filter(|p| statuses.contains(&p.status))
            .cloned()
            .collect();
        result.sort_by_key(|p| p.created_at);
        Ok(result)
    }

    fn find_all(&self) -> DomainResult<Vec<Photo>> {
        let guard = self.read()?;
        let mut result: Vec<_> = guard.values().cloned().collect();
        result.sort_by_key(|p| p.created_at);
        Ok(result)
    }

    fn delete_all(&self, ids: &[PhotoId]) -> DomainResult<()> {
        let mut guard = self.write()?;
        for id in ids {
            guard.remove(id);
        }
        Ok(())
    }
}

impl<S> PhotoStore for Arc<S>
where
    S: PhotoStore + ?Sized,
{
    fn find_by_id(&self, id: PhotoId) -> DomainResult<Option<Photo>> {
        (**self).find_by_id(id)
    }

    fn save(&self, photo: Photo) -> DomainResult<Photo> {
        (**self).save(photo)
    }

    fn save_all(&self, photos: Vec<Photo>) -> DomainResult<Vec<Photo>> {
        (**self).save_all(photos)
    }

    fn find_by_ids(&self, ids: &[PhotoId]) -> DomainResult<Vec<Photo>> {
        (**self).find_by_ids(ids)
    }

    fn find_by_status_in(&self, statuses: &[PhotoStatus]) -> DomainResult<Vec<Photo>> {
        (**self).find_by_status_in(statuses)
    }

    fn find_all(&self) -> DomainResult<Vec<Photo>> {
        (**self).find_all()
    }

    fn delete_all(&self, ids: &[PhotoId]) -> DomainResult<()> {
        (**self).delete_all(ids)
    }
}
