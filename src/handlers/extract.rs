// handlers/extract.rs - request extractors that reject with the API error envelope

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Query},
    http::request::Parts,
};

use crate::database::DocumentId;
use crate::error::ApiError;

/// JSON body; malformed JSON and unknown enum values are 400.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

/// Query string; undecodable parameters are 400.
#[derive(Debug, FromRequestParts)]
#[from_request(via(Query), rejection(ApiError))]
pub struct QueryParams<T>(pub T);

/// Store id taken from the last path segment parameter. An id that does not
/// parse is rejected here, before the handler touches the store.
#[derive(Debug, Clone, Copy)]
pub struct IdPath(pub DocumentId);

#[async_trait]
impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state).await?;
        Ok(Self(raw.parse::<DocumentId>()?))
    }
}
