use serde::Deserialize;

use photoflow_core::PhotoId;
use photoflow_photos::{PhotoStatus, RegisterPhoto};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct BulkRegisterRequest {
    pub photos: Vec<RegisterPhoto>,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: PhotoStatus,
    pub error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BulkStatusUpdateRequest {
    pub photo_ids: Vec<PhotoId>,
    pub status: PhotoStatus,
    pub error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PhotoListQuery {
    pub status: Option<PhotoStatus>,
}

#[derive(Debug, Deserialize)]
pub struct EventListQuery {
    pub photo_id: Option<String>,
    #[serde(default)]
    pub page: usize,
    #[serde(default = "default_page_size")]
    pub size: usize,
}

fn default_page_size() -> usize {
    50
}
