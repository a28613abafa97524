// handlers/protected/fundings.rs - GET /fundings handler

use axum::{extract::State, Json};

use crate::database::models::Funding;
use crate::error::ApiResult;
use crate::filter::{Filter, Page, ZeroLimit};
use crate::handlers::extract::QueryParams;
use crate::handlers::ListParams;
use crate::state::AppState;

/// GET /fundings - all contributions, newest first
pub async fn list(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<ListParams>,
) -> ApiResult<Json<Page<Funding>>> {
    let pagination = params.pagination(&state, ZeroLimit::Unbounded);
    Ok(Json(state.fundings().select_page(Filter::new(), &pagination).await?))
}
