use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::auth::IdentityClaim;
use crate::error::ApiError;
use crate::state::AppState;

/// Gate A: require a bearer credential and attach the verified
/// [`IdentityClaim`] to the request.
///
/// A missing or malformed header is 401. A token the verifier rejects is 403.
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(request.headers()).map_err(|msg| {
        tracing::warn!("Authentication failed: {}", msg);
        ApiError::unauthenticated(msg)
    })?;

    let claim = state.verifier.verify(&token).await.map_err(|e| {
        tracing::warn!("Token verification failed: {}", e);
        ApiError::forbidden("Forbidden access")
    })?;

    tracing::debug!("Authenticated {} ({})", claim.email, claim.uid);
    request.extensions_mut().insert(claim);

    Ok(next.run(request).await)
}

/// Extract the token from an `Authorization: Bearer <token>` header.
pub(crate) fn extract_bearer_token(headers: &HeaderMap) -> Result<String, &'static str> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .ok_or("Missing Authorization header")?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format")?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
        Some(_) => Err("Empty bearer token"),
        None => Err("Authorization header must use Bearer token format"),
    }
}

/// Claim attached by [`authenticate`]; absent only if a route skipped Gate A.
pub(crate) fn claim_of(request: &Request) -> Result<IdentityClaim, ApiError> {
    request
        .extensions()
        .get::<IdentityClaim>()
        .cloned()
        .ok_or_else(|| ApiError::unauthenticated("Authentication required"))
}
