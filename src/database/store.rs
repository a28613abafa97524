//! The document store seam. Handlers only see [`DocumentStore`]; the
//! Postgres and in-memory backends both implement it.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::filter::{Filter, FindQuery};

use super::manager::DatabaseError;

/// Store-assigned document id, exposed to clients as `_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(Uuid);

impl DocumentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for DocumentId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl FromStr for DocumentId {
    type Err = DatabaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| DatabaseError::InvalidId(s.to_string()))
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Donations,
    Fundings,
    Blogs,
}

impl Collection {
    pub const ALL: [Collection; 4] = [
        Collection::Users,
        Collection::Donations,
        Collection::Fundings,
        Collection::Blogs,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Donations => "donations",
            Collection::Fundings => "fundings",
            Collection::Blogs => "blogs",
        }
    }

    /// Timestamp field listings sort on, newest first.
    pub fn sort_field(&self) -> &'static str {
        match self {
            Collection::Blogs => "created_at",
            _ => "createdAt",
        }
    }
}

/// A stored document: id plus JSON body (the body never holds `_id`).
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: DocumentId,
    pub body: Map<String, Value>,
}

impl Document {
    pub fn into_value(self) -> Value {
        let mut body = self.body;
        body.insert("_id".to_string(), Value::String(self.id.to_string()));
        Value::Object(body)
    }

    pub fn into_model<T: DeserializeOwned>(self) -> Result<T, DatabaseError> {
        Ok(serde_json::from_value(self.into_value())?)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOutcome {
    pub matched_count: u64,
    pub modified_count: u64,
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find(&self, collection: Collection, query: &FindQuery) -> Result<Vec<Document>, DatabaseError>;

    async fn count(&self, collection: Collection, filter: &Filter) -> Result<u64, DatabaseError>;

    async fn find_one(&self, collection: Collection, filter: &Filter) -> Result<Option<Document>, DatabaseError>;

    async fn find_by_id(&self, collection: Collection, id: DocumentId) -> Result<Option<Document>, DatabaseError>;

    async fn insert_one(&self, collection: Collection, body: Map<String, Value>) -> Result<DocumentId, DatabaseError>;

    /// Merge `set` into the document's top-level fields.
    async fn update_by_id(
        &self,
        collection: Collection,
        id: DocumentId,
        set: Map<String, Value>,
    ) -> Result<UpdateOutcome, DatabaseError>;

    /// Merge `set` into the first document matching `filter`.
    async fn update_one(
        &self,
        collection: Collection,
        filter: &Filter,
        set: Map<String, Value>,
    ) -> Result<UpdateOutcome, DatabaseError>;

    async fn delete_by_id(&self, collection: Collection, id: DocumentId) -> Result<bool, DatabaseError>;

    /// Sum of a numeric field across the whole collection.
    async fn sum(&self, collection: Collection, field: &str) -> Result<Decimal, DatabaseError>;

    async fn ping(&self) -> Result<(), DatabaseError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ids_strictly() {
        let id = DocumentId::new();
        assert_eq!(id.to_string().parse::<DocumentId>().unwrap(), id);
        assert!(matches!(
            "64f1c2a9e4b0".parse::<DocumentId>(),
            Err(DatabaseError::InvalidId(_))
        ));
        assert!("".parse::<DocumentId>().is_err());
    }

    #[test]
    fn document_value_carries_id() {
        let id = DocumentId::new();
        let mut body = Map::new();
        body.insert("email".to_string(), Value::String("a@b.c".to_string()));
        let value = Document { id, body }.into_value();
        assert_eq!(value["_id"], Value::String(id.to_string()));
        assert_eq!(value["email"], "a@b.c");
    }
}
