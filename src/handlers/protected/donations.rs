// handlers/protected/donations.rs - donation request reads and writes for
// signed-in callers

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::database::models::{DonationRequest, DonationUpdate, DonorAssignment, FieldUpdate};
use crate::error::{ApiError, ApiResult};
use crate::filter::{Filter, Page, ZeroLimit};
use crate::handlers::extract::{IdPath, JsonBody, QueryParams};
use crate::handlers::{require_changes, updated, ListParams};
use crate::state::AppState;

const NOT_FOUND: &str = "Donation request not found";

/// GET /donations - paginated, optionally filtered by `email` (requester)
/// and `status`
pub async fn list(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<ListParams>,
) -> ApiResult<Json<Page<DonationRequest>>> {
    let pagination = params.pagination(&state, ZeroLimit::Unbounded);
    let filter = Filter::new()
        .eq_if_present("requester_email", params.email.as_deref())?
        .eq_if_present("donation_status", params.status.as_deref())?;
    Ok(Json(state.donations().select_page(filter, &pagination).await?))
}

/// GET /donations/:id
pub async fn show(State(state): State<AppState>, IdPath(id): IdPath) -> ApiResult<Json<DonationRequest>> {
    let donation = state
        .donations()
        .select_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))?;
    Ok(Json(donation))
}

/// PATCH /donations/:id - a donor takes on the request; status, donor name
/// and donor email are all required
pub async fn assign(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    JsonBody(body): JsonBody<DonorAssignment>,
) -> ApiResult<Json<Value>> {
    let set = body
        .complete()
        .ok_or_else(|| ApiError::invalid_argument("Status, donor name and donor email are required"))?;

    let donations = state.donations();
    let current = donations
        .select_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))?;
    state
        .transitions
        .check_donation(current.donation_status, set.donation_status)?;

    let outcome = donations.update_id(id, set.changes()?).await?;
    tracing::info!("Donation {} assigned to {}", id, set.donor_email);
    updated(outcome, NOT_FOUND)
}

/// PUT /donations/:id - merge editable fields; `_id` and status in the
/// payload are ignored
pub async fn update(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    JsonBody(body): JsonBody<DonationUpdate>,
) -> ApiResult<Json<Value>> {
    let set = require_changes(body.changes()?)?;
    let outcome = state.donations().update_id(id, set).await?;
    updated(outcome, NOT_FOUND)
}

/// DELETE /donations/:id
pub async fn delete(State(state): State<AppState>, IdPath(id): IdPath) -> ApiResult<Json<Value>> {
    if !state.donations().delete_id(id).await? {
        return Err(ApiError::not_found(NOT_FOUND));
    }
    tracing::info!("Deleted donation request {}", id);
    Ok(Json(json!({ "success": true, "deletedCount": 1 })))
}
