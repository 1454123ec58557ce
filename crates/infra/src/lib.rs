//! Infrastructure layer: stores, queue, worker, and application services.

pub mod assets;
pub mod bulk;
pub mod event_log;
pub mod lifecycle;
pub mod photo_store;
pub mod policy;
pub mod queue;
pub mod worker;

#[cfg(test)]
mod integration_tests;

pub use assets::{AssetStore, InMemoryAssetStore};
pub use bulk::{
    BulkDeleteOutcome, BulkDeleteRequest, BulkRegisterItemOutcome, BulkService, DeleteMode,
    FailedDeletion, MAX_BULK_REGISTER,
};
pub use event_log::{EventStore, InMemoryEventStore, MAX_PAGE_SIZE};
pub use lifecycle::LifecycleService;
pub use photo_store::{InMemoryPhotoStore, PhotoStore};
pub use policy::{PolicyOutcome, ProcessingPolicy, SimulatedPolicy};
pub use queue::PhotoQueue;
pub use worker::{ProcessingWorker, WorkerConfig, WorkerHandle, WorkerStats};
