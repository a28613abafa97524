// handlers/elevated/donations.rs - PATCH /donations/:id/status handler (admin, volunteer)

use axum::{
    extract::{Extension, State},
    Json,
};
use serde_json::Value;

use crate::database::models::{Account, DonationStatusChange};
use crate::error::{ApiError, ApiResult};
use crate::handlers::extract::{IdPath, JsonBody};
use crate::handlers::updated;
use crate::state::AppState;

const NOT_FOUND: &str = "Donation request not found";

/// PATCH /donations/:id/status - set the status only
pub async fn set_status(
    State(state): State<AppState>,
    Extension(actor): Extension<Account>,
    IdPath(id): IdPath,
    JsonBody(body): JsonBody<DonationStatusChange>,
) -> ApiResult<Json<Value>> {
    let donations = state.donations();
    let current = donations
        .select_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))?;
    state
        .transitions
        .check_donation(current.donation_status, body.status)?;

    let outcome = donations.update_id(id, body.changes()).await?;
    tracing::info!(
        "Donation {} status {} -> {} by {} ({})",
        id,
        current.donation_status,
        body.status,
        actor.email,
        actor.role
    );
    updated(outcome, NOT_FOUND)
}
