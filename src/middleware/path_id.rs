use axum::{
    extract::{RawPathParams, Request},
    middleware::Next,
    response::Response,
};

use crate::database::DocumentId;
use crate::error::ApiError;

/// Reject a malformed `:id` segment before any gate that reads the store.
/// Routes without an `:id` parameter pass through untouched.
pub async fn require_valid_id(params: RawPathParams, request: Request, next: Next) -> Result<Response, ApiError> {
    if let Some((_, raw)) = params.iter().find(|(key, _)| *key == "id") {
        raw.parse::<DocumentId>()?;
    }
    Ok(next.run(request).await)
}
