use std::fmt;

use serde::{Deserialize, Serialize};

use super::{non_empty, FieldUpdate, Timestamp};
use crate::database::DocumentId;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DonationStatus {
    #[default]
    Pending,
    InProgress,
    Done,
    Canceled,
}

impl DonationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DonationStatus::Pending => "pending",
            DonationStatus::InProgress => "inprogress",
            DonationStatus::Done => "done",
            DonationStatus::Canceled => "canceled",
        }
    }
}

impl fmt::Display for DonationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonationRequest {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<DocumentId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requester_name: Option<String>,
    pub requester_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_district: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_upazila: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hospital_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub donation_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub donation_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_message: Option<String>,
    #[serde(default)]
    pub donation_status: DonationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub donor_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub donor_email: Option<String>,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
}

/// Body of `POST /donations`. New requests always start `pending`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewDonationRequest {
    pub requester_name: Option<String>,
    pub requester_email: Option<String>,
    pub recipient_name: Option<String>,
    pub recipient_district: Option<String>,
    pub recipient_upazila: Option<String>,
    pub hospital_name: Option<String>,
    pub full_address: Option<String>,
    pub blood_group: Option<String>,
    pub donation_date: Option<String>,
    pub donation_time: Option<String>,
    pub request_message: Option<String>,
}

impl NewDonationRequest {
    pub fn requester_email(&self) -> Option<String> {
        non_empty(self.requester_email.clone())
    }

    pub fn into_request(self, requester_email: String, now: Timestamp) -> DonationRequest {
        DonationRequest {
            id: None,
            requester_name: non_empty(self.requester_name),
            requester_email,
            recipient_name: non_empty(self.recipient_name),
            recipient_district: non_empty(self.recipient_district),
            recipient_upazila: non_empty(self.recipient_upazila),
            hospital_name: non_empty(self.hospital_name),
            full_address: non_empty(self.full_address),
            blood_group: non_empty(self.blood_group),
            donation_date: non_empty(self.donation_date),
            donation_time: non_empty(self.donation_time),
            request_message: non_empty(self.request_message),
            donation_status: DonationStatus::Pending,
            donor_name: None,
            donor_email: None,
            created_at: Some(now),
        }
    }
}

/// Fields `PUT /donations/:id` may merge. Everything else in the payload,
/// `_id` included, is dropped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DonationUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requester_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_district: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_upazila: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hospital_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub donation_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub donation_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_message: Option<String>,
}

impl FieldUpdate for DonationUpdate {}

/// Body of `PATCH /donations/:id`: a donor takes on the request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DonorAssignment {
    #[serde(alias = "donation_status")]
    pub status: Option<DonationStatus>,
    pub donor_name: Option<String>,
    pub donor_email: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DonorAssignmentSet {
    pub donation_status: DonationStatus,
    pub donor_name: String,
    pub donor_email: String,
}

impl FieldUpdate for DonorAssignmentSet {}

impl DonorAssignment {
    /// All three fields are required; `None` when any is missing or empty.
    pub fn complete(self) -> Option<DonorAssignmentSet> {
        Some(DonorAssignmentSet {
            donation_status: self.status?,
            donor_name: non_empty(self.donor_name)?,
            donor_email: non_empty(self.donor_email)?,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DonationStatusChange {
    #[serde(alias = "donation_status")]
    pub status: DonationStatus,
}

impl DonationStatusChange {
    pub fn changes(&self) -> serde_json::Map<String, serde_json::Value> {
        let mut set = serde_json::Map::new();
        set.insert(
            "donation_status".to_string(),
            serde_json::Value::String(self.status.as_str().to_string()),
        );
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn inprogress_uses_lowercase_wire_name() {
        assert_eq!(serde_json::to_value(DonationStatus::InProgress).unwrap(), "inprogress");
        let parsed: DonationStatus = serde_json::from_value(json!("canceled")).unwrap();
        assert_eq!(parsed, DonationStatus::Canceled);
    }

    #[test]
    fn assignment_requires_all_fields() {
        let partial = DonorAssignment {
            status: Some(DonationStatus::InProgress),
            donor_name: Some("Karim".to_string()),
            donor_email: None,
        };
        assert!(partial.complete().is_none());

        let blank = DonorAssignment {
            status: Some(DonationStatus::InProgress),
            donor_name: Some("  ".to_string()),
            donor_email: Some("k@lifedrop.app".to_string()),
        };
        assert!(blank.complete().is_none());

        let full: DonorAssignment = serde_json::from_value(json!({
            "status": "inprogress",
            "donor_name": "Karim",
            "donor_email": "k@lifedrop.app"
        }))
        .unwrap();
        let set = full.complete().unwrap().changes().unwrap();
        assert_eq!(set["donation_status"], "inprogress");
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn update_drops_id_and_status() {
        let update: DonationUpdate = serde_json::from_value(json!({
            "_id": "64f0000000000000000000aa",
            "donation_status": "done",
            "hospital_name": "Dhaka Medical"
        }))
        .unwrap();
        let set = update.changes().unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set["hospital_name"], "Dhaka Medical");
    }
}
