// handlers/public/fundings.rs - contribution recording and payment intents

use axum::{extract::State, response::IntoResponse, Json};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::database::models::{NewFunding, Timestamp};
use crate::error::{ApiError, ApiResult};
use crate::handlers::extract::JsonBody;
use crate::handlers::inserted;
use crate::services::payments::validate_amount;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PaymentIntentRequest {
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub amount: Option<Decimal>,
}

/// POST /fundings/create-payment-intent - `{amount}` to a client secret
pub async fn payment_intent(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<PaymentIntentRequest>,
) -> ApiResult<Json<Value>> {
    let amount = validate_amount(body.amount)?;
    let intent = state.payments.create_intent(amount).await?;

    Ok(Json(json!({ "clientSecret": intent.client_secret })))
}

/// POST /fundings - record a confirmed contribution
pub async fn create(State(state): State<AppState>, JsonBody(body): JsonBody<NewFunding>) -> ApiResult<impl IntoResponse> {
    let funding = body
        .into_funding(Timestamp::now())
        .map_err(|rejection| ApiError::invalid_argument(rejection.message()))?;

    let id = state.fundings().insert(&funding).await?;
    tracing::info!("Recorded funding {} of {} from {}", id, funding.amount, funding.email);

    Ok(inserted(id))
}
