//! Lifecycle events for the photo workflow.
//!
//! Events are:
//! - **immutable** (treat them as facts)
//! - **append-only** (never edited, never deleted — even deleting a photo
//!   appends rather than removes)
//! - tagged by [`EventKind`] and dispatched by matching the tag

pub mod event;

pub use event::{EventKind, PhotoEvent};
