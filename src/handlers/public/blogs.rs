// handlers/public/blogs.rs - GET /blogs/published handler

use axum::{extract::State, Json};

use crate::database::models::{BlogPost, BlogStatus};
use crate::error::ApiResult;
use crate::filter::{Filter, Page, ZeroLimit};
use crate::handlers::extract::QueryParams;
use crate::handlers::ListParams;
use crate::state::AppState;

/// GET /blogs/published - published posts, newest first
pub async fn published_list(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<ListParams>,
) -> ApiResult<Json<Page<BlogPost>>> {
    let pagination = params.pagination(&state, ZeroLimit::Unbounded);
    let filter = Filter::new().eq("status", BlogStatus::Published.as_str())?;
    Ok(Json(state.blogs().select_page(filter, &pagination).await?))
}
