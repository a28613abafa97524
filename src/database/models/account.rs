use std::fmt;

use serde::{Deserialize, Serialize};

use super::{non_empty, FieldUpdate, Timestamp};
use crate::database::DocumentId;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Donor,
    Volunteer,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Donor => "donor",
            Role::Volunteer => "volunteer",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    #[default]
    Active,
    Blocked,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Active => "active",
            AccountStatus::Blocked => "blocked",
        }
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user record in the `users` collection, keyed by email.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<DocumentId>,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upazila: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub status: AccountStatus,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
}

/// Body of `POST /users`. Role and status are never caller-supplied.
#[derive(Debug, Clone, Deserialize)]
pub struct NewAccount {
    pub email: Option<String>,
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub blood_group: Option<String>,
    pub district: Option<String>,
    pub upazila: Option<String>,
}

impl NewAccount {
    /// Normalized email, if one was supplied.
    pub fn email(&self) -> Option<String> {
        non_empty(self.email.clone())
    }

    pub fn into_account(self, email: String, now: Timestamp) -> Account {
        Account {
            id: None,
            email,
            name: non_empty(self.name),
            avatar: non_empty(self.avatar),
            blood_group: non_empty(self.blood_group),
            district: non_empty(self.district),
            upazila: non_empty(self.upazila),
            role: Role::Donor,
            status: AccountStatus::Active,
            created_at: Some(now),
        }
    }
}

/// Profile fields a user may change on their own record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upazila: Option<String>,
}

impl FieldUpdate for AccountUpdate {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusChange {
    pub status: AccountStatus,
}

impl FieldUpdate for StatusChange {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleChange {
    pub role: Role,
}

impl FieldUpdate for RoleChange {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn legacy_documents_default_role_and_status() {
        let account: Account = serde_json::from_value(json!({
            "_id": DocumentId::new().to_string(),
            "email": "old@lifedrop.app"
        }))
        .unwrap();
        assert_eq!(account.role, Role::Donor);
        assert_eq!(account.status, AccountStatus::Active);
    }

    #[test]
    fn new_accounts_ignore_privileged_fields() {
        let new: NewAccount = serde_json::from_value(json!({
            "email": " donor@lifedrop.app ",
            "name": "Rahim",
            "role": "admin",
            "status": "blocked"
        }))
        .unwrap();
        let email = new.email().unwrap();
        let account = new.into_account(email, Timestamp::now());
        assert_eq!(account.email, "donor@lifedrop.app");
        assert_eq!(account.role, Role::Donor);
        assert_eq!(account.status, AccountStatus::Active);
    }

    #[test]
    fn update_keeps_only_allowed_fields() {
        let update: AccountUpdate = serde_json::from_value(json!({
            "_id": "ignored",
            "email": "hijack@lifedrop.app",
            "role": "admin",
            "district": "Dhaka"
        }))
        .unwrap();
        let changes = update.changes().unwrap();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes["district"], "Dhaka");
    }

    #[test]
    fn unknown_role_is_rejected() {
        assert!(serde_json::from_value::<RoleChange>(json!({"role": "root"})).is_err());
    }
}
