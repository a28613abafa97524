// handlers/public/users.rs - public account endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

use crate::database::models::{AccountUpdate, FieldUpdate, NewAccount, Timestamp};
use crate::error::{ApiError, ApiResult};
use crate::filter::Filter;
use crate::handlers::extract::JsonBody;
use crate::handlers::{inserted, require_changes, updated};
use crate::state::AppState;

/// GET /users/:email/role - `{role, status}` projection of one account
pub async fn role(State(state): State<AppState>, Path(email): Path<String>) -> ApiResult<Json<Value>> {
    let filter = Filter::new().eq("email", email.trim())?;
    let account = state
        .users()
        .select_one(&filter)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(json!({
        "role": account.role,
        "status": account.status
    })))
}

/// POST /users - create the account for an email unless one exists
///
/// Called on every sign-in, so repeating it must be harmless: an existing
/// email is answered with `inserted: false` and nothing is written.
pub async fn create(State(state): State<AppState>, JsonBody(body): JsonBody<NewAccount>) -> ApiResult<Response> {
    let email = body
        .email()
        .ok_or_else(|| ApiError::invalid_argument("Email is required"))?;

    let users = state.users();
    let filter = Filter::new().eq("email", email.as_str())?;
    if users.select_one(&filter).await?.is_some() {
        return Ok((
            StatusCode::OK,
            Json(json!({
                "message": "User already exists",
                "inserted": false
            })),
        )
            .into_response());
    }

    let id = users.insert(&body.into_account(email.clone(), Timestamp::now())).await?;
    tracing::info!("Created account {} for {}", id, email);

    let (status, Json(mut response)) = inserted(id);
    response["inserted"] = json!(true);
    Ok((status, Json(response)).into_response())
}

/// PUT /users/:email - update profile fields of the account with this email
pub async fn update(
    State(state): State<AppState>,
    Path(email): Path<String>,
    JsonBody(body): JsonBody<AccountUpdate>,
) -> ApiResult<Json<Value>> {
    let set = require_changes(body.changes()?)?;
    let filter = Filter::new().eq("email", email.trim())?;
    let outcome = state.users().update_one(&filter, set).await?;
    updated(outcome, "User not found")
}
