//! Event log inspection endpoints.
//!
//! Read-only access to the lifecycle audit trail, newest first.

use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use photoflow_core::PhotoId;
use photoflow_infra::EventStore as _;

use crate::app::dto::EventListQuery;
use crate::app::errors;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new().route("/", get(list_events))
}

/// GET /api/events?photo_id=X&page=0&size=50
///
/// With `photo_id`: all events for that photo, unpaged.
/// Without: one page of all events.
async fn list_events(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<EventListQuery>,
) -> axum::response::Response {
    let result = match query.photo_id.as_deref() {
        Some(raw) => match raw.parse::<PhotoId>() {
            Ok(id) => services.events.for_photo(id),
            Err(err) => return errors::domain_error_to_response(err),
        },
        None => services.events.page_all(query.page, query.size),
    };

    match result {
        Ok(events) => Json(events).into_response(),
        Err(err) => errors::domain_error_to_response(err),
    }
}
