use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::database::models::Role;
use crate::error::ApiError;
use crate::filter::Filter;
use crate::state::AppState;

use super::auth::claim_of;

/// State for Gate B: the shared handles plus the roles this route admits.
#[derive(Clone)]
pub struct RoleGate {
    pub state: AppState,
    pub allowed: &'static [Role],
}

/// Gate B: resolve the caller's account by email and require its role to be
/// in the allowed set. Runs after [`super::authenticate`].
pub async fn require_roles(
    State(gate): State<RoleGate>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let claim = claim_of(&request)?;

    let filter = Filter::new().eq("email", claim.email.as_str())?;
    let account = gate.state.users().select_one(&filter).await?;

    let account = match account {
        Some(account) if gate.allowed.contains(&account.role) => account,
        Some(account) => {
            tracing::warn!(
                "Role check failed: {} has role '{}', route requires one of {:?}",
                claim.email,
                account.role,
                gate.allowed
            );
            return Err(ApiError::forbidden("Forbidden access"));
        }
        None => {
            tracing::warn!("Role check failed: no account for {}", claim.email);
            return Err(ApiError::forbidden("Forbidden access"));
        }
    };

    request.extensions_mut().insert(account);
    Ok(next.run(request).await)
}
