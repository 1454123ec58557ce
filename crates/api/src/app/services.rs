//! Service wiring for the in-memory deployment.

use std::sync::Arc;

use photoflow_infra::{
    BulkService, InMemoryAssetStore, InMemoryEventStore, InMemoryPhotoStore, LifecycleService,
    PhotoQueue,
};

type Photos = Arc<InMemoryPhotoStore>;
type Events = Arc<InMemoryEventStore>;
type Assets = Arc<InMemoryAssetStore>;

pub type Lifecycle = LifecycleService<Photos, Events, Assets>;
pub type Bulk = BulkService<Photos, Events, Assets>;

/// Shared application services, one instance per process.
pub struct AppServices {
    pub photos: Photos,
    pub events: Events,
    pub queue: Arc<PhotoQueue>,
    pub lifecycle: Arc<Lifecycle>,
    pub bulk: Bulk,
}

/// Wire the full in-memory service graph.
pub fn build_services() -> AppServices {
    let photos = InMemoryPhotoStore::arc();
    let events = InMemoryEventStore::arc();
    let assets = Arc::new(InMemoryAssetStore::new());
    let queue = Arc::new(PhotoQueue::new());

    let lifecycle = Arc::new(LifecycleService::new(
        photos.clone(),
        events.clone(),
        assets.clone(),
        queue.clone(),
    ));
    let bulk = BulkService::new(photos.clone(), assets, queue.clone(), lifecycle.clone());

    AppServices {
        photos,
        events,
        queue,
        lifecycle,
        bulk,
    }
}
