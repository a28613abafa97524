// handlers/protected/users.rs - account reads and single-field changes

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;

use crate::database::models::{Account, FieldUpdate, RoleChange, StatusChange};
use crate::error::{ApiError, ApiResult};
use crate::filter::Filter;
use crate::handlers::extract::{IdPath, JsonBody};
use crate::handlers::updated;
use crate::state::AppState;

/// GET /users/:email - one account by email
pub async fn show(State(state): State<AppState>, Path(email): Path<String>) -> ApiResult<Json<Account>> {
    let filter = Filter::new().eq("email", email.trim())?;
    let account = state
        .users()
        .select_one(&filter)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    Ok(Json(account))
}

/// PATCH /users/:id/status - block or reactivate an account
pub async fn set_status(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    JsonBody(body): JsonBody<StatusChange>,
) -> ApiResult<Json<Value>> {
    let users = state.users();
    let current = users.select_404(id, "User").await?;
    state.transitions.check_account(current.status, body.status)?;

    let outcome = users.update_id(id, body.changes()?).await?;
    tracing::info!("Account {} status {} -> {}", id, current.status, body.status);
    updated(outcome, "User not found")
}

/// PATCH /users/:id/role - change an account's role
pub async fn set_role(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    JsonBody(body): JsonBody<RoleChange>,
) -> ApiResult<Json<Value>> {
    let outcome = state.users().update_id(id, body.changes()?).await?;
    tracing::info!("Account {} role set to {}", id, body.role);
    updated(outcome, "User not found")
}
