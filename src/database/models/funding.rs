use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{non_empty, Timestamp};
use crate::database::DocumentId;

/// One fundraising contribution. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Funding {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<DocumentId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub email: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
}

/// Body of `POST /fundings`, recorded after the client confirms payment.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFunding {
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub amount: Option<Decimal>,
    pub transaction_id: Option<String>,
}

/// Why a contribution was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FundingRejection {
    MissingEmail,
    MissingAmount,
}

impl FundingRejection {
    pub fn message(&self) -> &'static str {
        match self {
            FundingRejection::MissingEmail => "Email is required",
            FundingRejection::MissingAmount => "Amount is required",
        }
    }
}

impl NewFunding {
    pub fn into_funding(self, now: Timestamp) -> Result<Funding, FundingRejection> {
        let email = non_empty(self.email).ok_or(FundingRejection::MissingEmail)?;
        let amount = self
            .amount
            .filter(|a| a.is_sign_positive() && !a.is_zero())
            .ok_or(FundingRejection::MissingAmount)?;
        Ok(Funding {
            id: None,
            name: non_empty(self.name),
            email,
            amount,
            transaction_id: non_empty(self.transaction_id),
            created_at: Some(now),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn amount_round_trips_as_json_number() {
        let new: NewFunding = serde_json::from_value(json!({
            "name": "Nadia",
            "email": "nadia@lifedrop.app",
            "amount": 25.5,
            "transactionId": "pi_123"
        }))
        .unwrap();
        let funding = new.into_funding(Timestamp::now()).unwrap();
        let value = serde_json::to_value(&funding).unwrap();
        assert_eq!(value["amount"], json!(25.5));
        assert_eq!(value["transactionId"], "pi_123");
        assert!(value["createdAt"].is_string());
    }

    #[test]
    fn rejects_missing_or_non_positive_amounts() {
        for amount in [json!(null), json!(0), json!(-3)] {
            let new: NewFunding = serde_json::from_value(json!({
                "email": "nadia@lifedrop.app",
                "amount": amount
            }))
            .unwrap();
            assert_eq!(
                new.into_funding(Timestamp::now()).unwrap_err(),
                FundingRejection::MissingAmount
            );
        }
    }
}
