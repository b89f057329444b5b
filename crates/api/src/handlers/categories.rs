//! Handler for the static category catalog.

use axum::response::IntoResponse;
use axum::Json;
use toolhub_core::categories::CATEGORIES;

use crate::error::AppResult;
use crate::response::DataResponse;

/// GET /api/v1/categories
///
/// The full category catalog, in display order.
pub async fn list() -> AppResult<impl IntoResponse> {
    Ok(Json(DataResponse { data: CATEGORIES }))
}
