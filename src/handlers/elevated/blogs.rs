// handlers/elevated/blogs.rs - blog management
//
// Listing and drafting are open to admins and volunteers. Publishing and
// deleting are admin-only.

use axum::{
    extract::{Extension, State},
    response::IntoResponse,
    Json,
};
use serde_json::{json, Map, Value};

use crate::auth::IdentityClaim;
use crate::database::models::{BlogPost, BlogStatusChange, NewBlogPost, Timestamp};
use crate::error::{ApiError, ApiResult};
use crate::filter::{Filter, Page, ZeroLimit};
use crate::handlers::extract::{IdPath, JsonBody, QueryParams};
use crate::handlers::{inserted, updated, ListParams};
use crate::state::AppState;

const NOT_FOUND: &str = "Blog not found";

/// GET /blogs - all posts, optionally filtered by `status`
pub async fn list(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<ListParams>,
) -> ApiResult<Json<Page<BlogPost>>> {
    let pagination = params.pagination(&state, ZeroLimit::Unbounded);
    let filter = Filter::new().eq_if_present("status", params.status.as_deref())?;
    Ok(Json(state.blogs().select_page(filter, &pagination).await?))
}

/// POST /blogs - create a draft authored by the caller
pub async fn create(
    State(state): State<AppState>,
    Extension(claim): Extension<IdentityClaim>,
    JsonBody(body): JsonBody<NewBlogPost>,
) -> ApiResult<impl IntoResponse> {
    let post = body
        .into_post(&claim, Timestamp::now())
        .ok_or_else(|| ApiError::invalid_argument("Title and content are required"))?;

    let id = state.blogs().insert(&post).await?;
    tracing::info!("Blog draft {} created by {}", id, claim.email);
    Ok(inserted(id))
}

/// PATCH /blogs/:id/status - publish or unpublish
pub async fn set_status(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    JsonBody(body): JsonBody<BlogStatusChange>,
) -> ApiResult<Json<Value>> {
    let mut set = Map::new();
    set.insert("status".to_string(), json!(body.status.as_str()));
    set.insert("updated_at".to_string(), json!(Timestamp::now()));

    let outcome = state.blogs().update_id(id, set).await?;
    updated(outcome, NOT_FOUND)
}

/// DELETE /blogs/:id
pub async fn delete(State(state): State<AppState>, IdPath(id): IdPath) -> ApiResult<Json<Value>> {
    if !state.blogs().delete_id(id).await? {
        return Err(ApiError::not_found(NOT_FOUND));
    }
    tracing::info!("Deleted blog {}", id);
    Ok(Json(json!({ "success": true, "deletedCount": 1 })))
}
