//! Photos domain module.
//!
//! This crate contains business rules for photo records and their status
//! lifecycle, implemented purely as deterministic domain logic (no IO, no
//! HTTP, no storage).

pub mod photo;
pub mod transitions;

pub use photo::{Photo, PhotoStatus, RegisterPhoto};
pub use transitions::{allowed_transitions, validate_transition};
