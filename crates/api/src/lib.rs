//! HTTP surface for the photo processing backend.

pub mod app;
