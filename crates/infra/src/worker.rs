//! Background processing worker.
//!
//! A single long-running consumer bound to the process lifetime: started
//! once after the rest of the system is wired, stopped via an explicit
//! shutdown handle. One bad photo never terminates the loop.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use photoflow_core::PhotoId;
use photoflow_photos::PhotoStatus;

use crate::assets::AssetStore;
use crate::event_log::EventStore;
use crate::lifecycle::LifecycleService;
use crate::photo_store::PhotoStore;
use crate::policy::{PolicyOutcome, ProcessingPolicy};
use crate::queue::PhotoQueue;

/// Worker configuration.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Thread name, used in logs.
    pub name: String,
    /// How long a queue take blocks before re-checking for shutdown.
    pub tick: Duration,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            name: "photo-processing-worker".to_string(),
            tick: Duration::from_millis(250),
        }
    }
}

/// Worker runtime statistics.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct WorkerStats {
    pub processed: u64,
    pub succeeded: u64,
    pub failed: u64,
}

/// Handle to control and join the running worker.
#[derive(Debug)]
pub struct WorkerHandle {
    shutdown: mpsc::Sender<()>,
    join: Option<thread::JoinHandle<()>>,
    stats: Arc<Mutex<WorkerStats>>,
}

impl WorkerHandle {
    /// Request graceful shutdown and wait for the worker to stop.
    ///
    /// An in-flight photo finishes before the loop exits; a blocked queue
    /// take is interrupted within one tick.
    pub fn shutdown(mut self) {
        let _ = self.shutdown.send(());
        if let Some(j) = self.join.take() {
            let _ = j.join();
        }
    }

    /// Snapshot of the worker's counters.
    pub fn stats(&self) -> WorkerStats {
        self.stats.lock().unwrap().clone()
    }
}

/// Single-consumer processing loop over the photo queue.
pub struct ProcessingWorker;

impl ProcessingWorker {
    /// Spawn the worker in a dedicated named thread.
    pub fn spawn<P, E, A>(
        queue: Arc<PhotoQueue>,
        lifecycle: Arc<LifecycleService<P, E, A>>,
        policy: Arc<dyn ProcessingPolicy>,
        config: WorkerConfig,
    ) -> WorkerHandle
    where
        P: PhotoStore + Send + Sync + 'static,
        E: EventStore + Send + Sync + 'static,
        A: AssetStore + Send + Sync + 'static,
    {
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();
        let stats = Arc::new(Mutex::new(WorkerStats::default()));
        let stats_clone = stats.clone();

        let name = config.name.clone();
        let join = thread::Builder::new()
            .name(name)
            .spawn(move || worker_loop(queue, lifecycle, policy, config, shutdown_rx, stats_clone))
            .expect("failed to spawn photo processing worker thread");

        WorkerHandle {
            shutdown: shutdown_tx,
            join: Some(join),
            stats,
        }
    }
}

fn worker_loop<P, E, A>(
    queue: Arc<PhotoQueue>,
    lifecycle: Arc<LifecycleService<P, E, A>>,
    policy: Arc<dyn ProcessingPolicy>,
    config: WorkerConfig,
    shutdown_rx: mpsc::Receiver<()>,
    stats: Arc<Mutex<WorkerStats>>,
) where
    P: PhotoStore,
    E: EventStore,
    A: AssetStore,
{
    info!(worker = %config.name, "photo processing worker started");

    loop {
        if shutdown_rx.try_recv().is_ok() {
            break;
        }

        let Some(photo_id) = queue.take_timeout(config.tick) else {
            continue;
        };

        debug!(worker = %config.name, photo_id = %photo_id, "processing photo from queue");
        let succeeded = process_photo(&lifecycle, policy.as_ref(), photo_id);

        let mut s = stats.lock().unwrap();
        s.processed += 1;
        if succeeded {
            s.succeeded += 1;
        } else {
            s.failed += 1;
        }
    }

    info!(worker = %config.name, "photo processing worker stopped");
}

/// Drive one photo through Processing → Completed/Failed.
///
/// Returns whether the photo ended up Completed. Every error is contained
/// here: the loop must survive any single bad item.
fn process_photo<P, E, A>(
    lifecycle: &LifecycleService<P, E, A>,
    policy: &dyn ProcessingPolicy,
    photo_id: PhotoId,
) -> bool
where
    P: PhotoStore,
    E: EventStore,
    A: AssetStore,
{
    let photo = match lifecycle.transition(photo_id, PhotoStatus::Processing, None) {
        Ok(photo) => photo,
        Err(err) => {
            // Stale queue entry (deleted photo) or invalid state; skip it.
            warn!(photo_id = %photo_id, error = %err, "could not start processing");
            return false;
        }
    };

    let outcome = policy.run(&photo);

    let result = match outcome {
        PolicyOutcome::Success => {
            lifecycle.transition(photo_id, PhotoStatus::Completed, None)
        }
        PolicyOutcome::Failure(message) => {
            lifecycle.transition(photo_id, PhotoStatus::Failed, Some(message))
        }
    };

    match result {
        Ok(photo) => {
            if photo.status == PhotoStatus::Completed {
                info!(photo_id = %photo_id, "photo processing completed");
                true
            } else {
                warn!(photo_id = %photo_id, error = ?photo.error_message, "photo processing failed");
                false
            }
        }
        Err(err) => {
            error!(photo_id = %photo_id, error = %err, "failed to record processing outcome");
            // Last resort: try to park the photo in Failed so it can be retried.
            if let Err(err) = lifecycle.transition(
                photo_id,
                PhotoStatus::Failed,
                Some(format!("Processing failed: {err}")),
            ) {
                error!(photo_id = %photo_id, error = %err, "failed to mark photo as failed");
            }
            false
        }
    }
}
