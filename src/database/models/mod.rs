pub mod account;
pub mod blog;
pub mod donation;
pub mod funding;
pub mod timestamp;

pub use account::{Account, AccountStatus, AccountUpdate, NewAccount, Role, RoleChange, StatusChange};
pub use blog::{BlogAuthor, BlogPost, BlogStatus, BlogStatusChange, NewBlogPost};
pub use donation::{
    DonationRequest, DonationStatus, DonationStatusChange, DonationUpdate, DonorAssignment,
    DonorAssignmentSet, NewDonationRequest,
};
pub use funding::{Funding, FundingRejection, NewFunding};
pub use timestamp::Timestamp;

use serde::Serialize;
use serde_json::{Map, Value};

/// Partial update restricted to an explicit field allow-list. Fields left as
/// `None` are skipped, so `changes()` holds only what the caller supplied.
pub trait FieldUpdate: Serialize {
    fn changes(&self) -> Result<Map<String, Value>, serde_json::Error> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            _ => Ok(Map::new()),
        }
    }
}

/// Trims the value and drops it when empty.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
