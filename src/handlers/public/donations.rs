// handlers/public/donations.rs - public donation request endpoints

use axum::{extract::State, response::IntoResponse, Json};
use serde::Deserialize;

use crate::database::models::{DonationRequest, DonationStatus, NewDonationRequest, Timestamp};
use crate::error::{ApiError, ApiResult};
use crate::filter::{Filter, Page, Pagination, ZeroLimit};
use crate::handlers::extract::{JsonBody, QueryParams};
use crate::handlers::{inserted, ListParams};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub blood_group: Option<String>,
    pub district: Option<String>,
    pub upazila: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// GET /donations/pending - open requests, newest first
///
/// Here `limit=0` asks for an empty page rather than everything.
pub async fn pending(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<ListParams>,
) -> ApiResult<Json<Page<DonationRequest>>> {
    let pagination = params.pagination(&state, ZeroLimit::EmptyPage);
    let filter = Filter::new().eq("donation_status", DonationStatus::Pending.as_str())?;
    Ok(Json(state.donations().select_page(filter, &pagination).await?))
}

/// GET /donations/search - pending requests matching blood group and
/// location, returned as a bare array
pub async fn search(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<SearchParams>,
) -> ApiResult<Json<Vec<DonationRequest>>> {
    let filter = Filter::new()
        .eq("donation_status", DonationStatus::Pending.as_str())?
        .eq_if_present("blood_group", params.blood_group.as_deref())?
        .eq_if_present("recipient_district", params.district.as_deref())?
        .eq_if_present("recipient_upazila", params.upazila.as_deref())?;

    // No limit unless the caller asks for one.
    let pagination = Pagination::from_params(
        params.page.as_deref(),
        params.limit.as_deref(),
        0,
        ZeroLimit::Unbounded,
    );
    let (skip, limit) = pagination.window();

    let donations = state.donations();
    let query = donations.newest_first(filter).window(skip, limit);
    Ok(Json(donations.select_any(&query).await?))
}

/// POST /donations - open a new request in `pending`
pub async fn create(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<NewDonationRequest>,
) -> ApiResult<impl IntoResponse> {
    let requester_email = body
        .requester_email()
        .ok_or_else(|| ApiError::invalid_argument("Requester email is required"))?;

    let request = body.into_request(requester_email, Timestamp::now());
    let id = state.donations().insert(&request).await?;
    tracing::info!("Created donation request {} for {}", id, request.requester_email);

    Ok(inserted(id))
}
