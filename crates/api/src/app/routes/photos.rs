//! Photo endpoints: registration, queries, status updates, deletion.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};

use photoflow_core::PhotoId;
use photoflow_infra::BulkDeleteRequest;

use crate::app::dto::{BulkRegisterRequest, BulkStatusUpdateRequest, PhotoListQuery, StatusUpdateRequest};
use crate::app::errors;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", post(register).get(list))
        .route("/bulk", post(bulk_register))
        .route("/:id", get(get_photo).delete(delete_photo))
        .route("/:id/status", put(update_status))
        .route("/status/bulk", put(bulk_update_status))
        .route("/delete/bulk", post(bulk_delete))
}

fn parse_id(raw: &str) -> Result<PhotoId, axum::response::Response> {
    raw.parse::<PhotoId>()
        .map_err(errors::domain_error_to_response)
}

/// POST /api/photos
async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    Json(request): Json<photoflow_photos::RegisterPhoto>,
) -> axum::response::Response {
    match services.lifecycle.register(request) {
        Ok(photo) => (StatusCode::CREATED, Json(photo)).into_response(),
        Err(err) => errors::domain_error_to_response(err),
    }
}

/// POST /api/photos/bulk
async fn bulk_register(
    Extension(services): Extension<Arc<AppServices>>,
    Json(request): Json<BulkRegisterRequest>,
) -> axum::response::Response {
    match services.bulk.register(request.photos) {
        Ok(results) => (StatusCode::CREATED, Json(results)).into_response(),
        Err(err) => errors::domain_error_to_response(err),
    }
}

/// GET /api/photos?status=COMPLETED
async fn list(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<PhotoListQuery>,
) -> axum::response::Response {
    use photoflow_infra::PhotoStore as _;
    let result = match query.status {
        Some(status) => services.photos.find_by_status_in(&[status]),
        None => services.photos.find_all(),
    };
    match result {
        Ok(photos) => Json(photos).into_response(),
        Err(err) => errors::domain_error_to_response(err),
    }
}

/// GET /api/photos/:id
async fn get_photo(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    use photoflow_infra::PhotoStore as _;
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match services.photos.find_by_id(id) {
        Ok(Some(photo)) => Json(photo).into_response(),
        Ok(None) => errors::json_error(
            StatusCode::NOT_FOUND,
            "not_found",
            format!("photo {id}"),
        ),
        Err(err) => errors::domain_error_to_response(err),
    }
}

/// PUT /api/photos/:id/status
async fn update_status(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(request): Json<StatusUpdateRequest>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match services
        .lifecycle
        .transition(id, request.status, request.error_message)
    {
        Ok(photo) => Json(photo).into_response(),
        Err(err) => errors::domain_error_to_response(err),
    }
}

/// PUT /api/photos/status/bulk
async fn bulk_update_status(
    Extension(services): Extension<Arc<AppServices>>,
    Json(request): Json<BulkStatusUpdateRequest>,
) -> axum::response::Response {
    match services
        .bulk
        .update_status(&request.photo_ids, request.status, request.error_message)
    {
        Ok(photos) => Json(photos).into_response(),
        Err(err) => errors::domain_error_to_response(err),
    }
}

/// DELETE /api/photos/:id
async fn delete_photo(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match services.lifecycle.delete(id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => errors::domain_error_to_response(err),
    }
}

/// POST /api/photos/delete/bulk
async fn bulk_delete(
    Extension(services): Extension<Arc<AppServices>>,
    Json(request): Json<BulkDeleteRequest>,
) -> axum::response::Response {
    match services.bulk.delete(&request) {
        Ok(outcome) => Json(outcome).into_response(),
        Err(err) => errors::domain_error_to_response(err),
    }
}
