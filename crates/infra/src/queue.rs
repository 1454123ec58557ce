//! In-process work queue for photo processing.
//!
//! The queue carries bare photo ids — it is a notification channel, not a
//! data channel. The worker re-reads authoritative state from the photo
//! store before acting on an id. The queue is volatile: ids enqueued before
//! a process crash are lost and rediscoverable only via the store.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex};
use std::time::Duration;

use photoflow_core::PhotoId;

/// Unbounded FIFO of photo ids.
///
/// Any number of producers may [`enqueue`](Self::enqueue) concurrently;
/// enqueue never blocks and duplicates are permitted (each is processed
/// independently). A single consumer blocks on
/// [`take_timeout`](Self::take_timeout), which the worker combines with its
/// shutdown channel so a blocked take never delays cancellation by more than
/// one tick.
#[derive(Debug, Default)]
pub struct PhotoQueue {
    items: Mutex<VecDeque<PhotoId>>,
    available: Condvar,
}

impl PhotoQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push an id onto the back of the queue.
    pub fn enqueue(&self, photo_id: PhotoId) {
        let mut items = match self.items.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        items.push_back(photo_id);
        self.available.notify_one();
    }

    /// Pop the front id, blocking for up to `timeout` if the queue is empty.
    ///
    /// Returns `None` on timeout.
    pub fn take_timeout(&self, timeout: Duration) -> Option<PhotoId> {
        let mut items = match self.items.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Some(id) = items.pop_front() {
            return Some(id);
        }

        let (mut items, result) = self
            .available
            .wait_timeout_while(items, timeout, |q| q.is_empty())
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if result.timed_out() && items.is_empty() {
            None
        } else {
            items.pop_front()
        }
    }

    /// Approximate number of queued ids. For observability only.
    pub fn len(&self) -> usize {
        match self.items.lock() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
