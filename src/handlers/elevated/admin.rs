// handlers/elevated/admin.rs - GET /admin/dashboard-stats handler (admin, volunteer)

use axum::{extract::State, Json};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::database::models::Role;
use crate::database::Collection;
use crate::error::ApiResult;
use crate::filter::Filter;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_donors: u64,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_funding: Decimal,
    pub total_requests: u64,
}

/// GET /admin/dashboard-stats - donor count, funds raised, request count
pub async fn dashboard_stats(State(state): State<AppState>) -> ApiResult<Json<DashboardStats>> {
    let donors = Filter::new().eq("role", Role::Donor.as_str())?;
    let everything = Filter::new();
    let users = state.users();
    let donations = state.donations();

    let (total_donors, total_funding, total_requests) = futures::try_join!(
        users.count(&donors),
        state.store.sum(Collection::Fundings, "amount"),
        donations.count(&everything),
    )?;

    Ok(Json(DashboardStats {
        total_donors,
        total_funding,
        total_requests,
    }))
}
