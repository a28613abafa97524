// handlers/elevated/users.rs - GET /users handler (admin)

use axum::{extract::State, Json};

use crate::database::models::Account;
use crate::error::ApiResult;
use crate::filter::{Filter, Page, ZeroLimit};
use crate::handlers::extract::QueryParams;
use crate::handlers::ListParams;
use crate::state::AppState;

/// GET /users - paginated accounts, optionally filtered by `status`
pub async fn list(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<ListParams>,
) -> ApiResult<Json<Page<Account>>> {
    let pagination = params.pagination(&state, ZeroLimit::Unbounded);
    let filter = Filter::new().eq_if_present("status", params.status.as_deref())?;
    Ok(Json(state.users().select_page(filter, &pagination).await?))
}
