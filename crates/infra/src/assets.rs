//! External asset storage integration (best-effort delete).
//!
//! The asset store holds the photo binaries; this core only ever asks it to
//! delete them. Deletion is best-effort: a failure is reported to the caller
//! but never aborts the enclosing operation, and a remote "not found" counts
//! as success (the asset is gone, which is all we wanted).

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, RwLock};

use tracing::{debug, warn};

/// Remote deletes are issued in chunks of this size per call.
pub const DELETE_BATCH_SIZE: usize = 30;

/// Best-effort delete capability keyed by the asset's external public id.
pub trait AssetStore: Send + Sync {
    /// Delete one asset. `Ok(())` includes the remote-not-found case.
    fn delete_one(&self, public_id: &str) -> Result<(), String>;

    /// Delete up to [`DELETE_BATCH_SIZE`] assets in one remote call.
    ///
    /// Returns `public_id -> success` for every requested id.
    fn delete_batch(&self, public_ids: &[String]) -> HashMap<String, bool>;
}

/// Delete many assets, chunked into remote batches.
///
/// Every requested id appears in the result map; a batch-level failure marks
/// its whole chunk as failed rather than propagating.
pub fn delete_many<A: AssetStore + ?Sized>(
    store: &A,
    public_ids: &[String],
) -> HashMap<String, bool> {
    let mut results = HashMap::with_capacity(public_ids.len());

    for chunk in public_ids.chunks(DELETE_BATCH_SIZE) {
        debug!(count = chunk.len(), "deleting asset batch");
        let batch_results = store.delete_batch(chunk);

        for public_id in chunk {
            let ok = batch_results.get(public_id).copied().unwrap_or(false);
            if !ok {
                warn!(public_id = %public_id, "asset delete failed");
            }
            results.insert(public_id.clone(), ok);
        }
    }

    results
}

/// In-memory asset store for a single-instance deployment and tests.
///
/// Holds a set of known public ids; ids can be marked as failing to simulate
/// remote errors. Deleting an unknown id succeeds (not-found is success).
#[derive(Debug, Default)]
pub struct InMemoryAssetStore {
    assets: RwLock<HashSet<String>>,
    failing: RwLock<HashSet<String>>,
    delete_calls: Mutex<usize>,
}

impl InMemoryAssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an asset as existing remotely.
    pub fn put(&self, public_id: impl Into<String>) {
        self.assets.write().unwrap().insert(public_id.into());
    }

    /// Make deletes of this id fail until further notice.
    pub fn fail_deletes_for(&self, public_id: impl Into<String>) {
        self.failing.write().unwrap().insert(public_id.into());
    }

    pub fn contains(&self, public_id: &str) -> bool {
        self.assets.read().unwrap().contains(public_id)
    }

    /// Number of remote batch calls observed (for batching tests).
    pub fn delete_call_count(&self) -> usize {
        *self.delete_calls.lock().unwrap()
    }
}

impl AssetStore for InMemoryAssetStore {
    fn delete_one(&self, public_id: &str) -> Result<(), String> {
        if self.failing.read().unwrap().contains(public_id) {
            return Err(format!("asset delete failed: {public_id}"));
        }
        // Removing an absent id is fine.
        self.assets.write().unwrap().remove(public_id);
        Ok(())
    }

    fn delete_batch(&self, public_ids: &[String]) -> HashMap<String, bool> {
        *self.delete_calls.lock().unwrap() += 1;
        public_ids
            .iter()
            .map(|id| (id.clone(), self.delete_one(id).is_ok()))
            .collect()
    }
}

impl<S> AssetStore for std::sync::Arc<S>
where
    S: AssetStore + ?Sized,
{
    fn delete_one(&self, public_id: &str) -> Result<(), String> {
        (**self).delete_one(public_id)
    }

    fn delete_batch(&self, public_ids: &[String]) -> HashMap<String, bool> {
        (**self).delete_batch(public_ids)
    }
}
