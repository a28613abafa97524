// handlers/mod.rs - resource handlers grouped by the gates in front of them
//
// public    - no credential required
// protected - Gate A (verified bearer token)
// elevated  - Gate A + Gate B (account role in an allowed set)

pub mod elevated;
pub mod extract;
pub mod protected;
pub mod public;

use axum::{http::StatusCode, Json};
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::database::{DocumentId, UpdateOutcome};
use crate::error::{ApiError, ApiResult};
use crate::filter::{Pagination, ZeroLimit};
use crate::state::AppState;

/// Query parameters shared by the paginated listings. Each listing reads
/// only the filters it recognizes.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub status: Option<String>,
    pub email: Option<String>,
}

impl ListParams {
    pub fn pagination(&self, state: &AppState, zero_limit: ZeroLimit) -> Pagination {
        Pagination::from_params(
            self.page.as_deref(),
            self.limit.as_deref(),
            state.listing.default_limit,
            zero_limit,
        )
    }
}

pub(crate) fn inserted(id: DocumentId) -> (StatusCode, Json<Value>) {
    (
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "acknowledged": true,
            "insertedId": id
        })),
    )
}

/// Response for a single-document update; 404 when nothing matched.
pub(crate) fn updated(outcome: UpdateOutcome, not_found: &str) -> ApiResult<Json<Value>> {
    if outcome.matched_count == 0 {
        return Err(ApiError::not_found(not_found));
    }
    Ok(Json(json!({
        "success": true,
        "matchedCount": outcome.matched_count,
        "modifiedCount": outcome.modified_count
    })))
}

/// An update payload must name at least one allowed field.
pub(crate) fn require_changes(set: Map<String, Value>) -> ApiResult<Map<String, Value>> {
    if set.is_empty() {
        return Err(ApiError::invalid_argument("No fields to update"));
    }
    Ok(set)
}
