use std::collections::HashMap;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use crate::filter::filter_order::FilterOrder;
use crate::filter::{Filter, FilterSort, FindQuery};

use super::manager::DatabaseError;
use super::store::{Collection, Document, DocumentId, DocumentStore, UpdateOutcome};

/// In-process document store with the same query semantics as the Postgres
/// backend. Used for local runs without `DATABASE_URL` and by the tests.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<Collection, Vec<Document>>>,
    calls: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of store operations served so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn merge_into(doc: &mut Document, set: &Map<String, Value>) -> bool {
        let mut changed = false;
        for (key, value) in set {
            if key == "_id" {
                continue;
            }
            if doc.body.get(key) != Some(value) {
                doc.body.insert(key.clone(), value.clone());
                changed = true;
            }
        }
        changed
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find(&self, collection: Collection, query: &FindQuery) -> Result<Vec<Document>, DatabaseError> {
        self.record_call();
        let collections = self.collections.read().await;
        let mut matching: Vec<Document> = collections
            .get(&collection)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| query.filter.matches(&doc.body))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        matching.sort_by(|a, b| FilterOrder::compare(&query.sort, &a.body, &b.body));

        let skip = usize::try_from(query.skip).unwrap_or(usize::MAX);
        let take = query
            .limit
            .map(|l| usize::try_from(l).unwrap_or(usize::MAX))
            .unwrap_or(usize::MAX);
        Ok(matching.into_iter().skip(skip).take(take).collect())
    }

    async fn count(&self, collection: Collection, filter: &Filter) -> Result<u64, DatabaseError> {
        self.record_call();
        let collections = self.collections.read().await;
        let count = collections
            .get(&collection)
            .map(|docs| docs.iter().filter(|doc| filter.matches(&doc.body)).count())
            .unwrap_or(0);
        Ok(count as u64)
    }

    async fn find_one(&self, collection: Collection, filter: &Filter) -> Result<Option<Document>, DatabaseError> {
        self.record_call();
        let collections = self.collections.read().await;
        let sort = FilterSort::newest_first(collection.sort_field());
        Ok(collections
            .get(&collection)
            .and_then(|docs| {
                docs.iter()
                    .filter(|doc| filter.matches(&doc.body))
                    .min_by(|a, b| FilterOrder::compare(&sort, &a.body, &b.body))
            })
            .cloned())
    }

    async fn find_by_id(&self, collection: Collection, id: DocumentId) -> Result<Option<Document>, DatabaseError> {
        self.record_call();
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .and_then(|docs| docs.iter().find(|doc| doc.id == id))
            .cloned())
    }

    async fn insert_one(&self, collection: Collection, mut body: Map<String, Value>) -> Result<DocumentId, DatabaseError> {
        self.record_call();
        body.remove("_id");
        let id = DocumentId::new();
        let mut collections = self.collections.write().await;
        collections
            .entry(collection)
            .or_default()
            .push(Document { id, body });
        Ok(id)
    }

    async fn update_by_id(
        &self,
        collection: Collection,
        id: DocumentId,
        set: Map<String, Value>,
    ) -> Result<UpdateOutcome, DatabaseError> {
        self.record_call();
        let mut collections = self.collections.write().await;
        let target = collections
            .get_mut(&collection)
            .and_then(|docs| docs.iter_mut().find(|doc| doc.id == id));
        Ok(match target {
            Some(doc) => UpdateOutcome {
                matched_count: 1,
                modified_count: u64::from(Self::merge_into(doc, &set)),
            },
            None => UpdateOutcome::default(),
        })
    }

    async fn update_one(
        &self,
        collection: Collection,
        filter: &Filter,
        set: Map<String, Value>,
    ) -> Result<UpdateOutcome, DatabaseError> {
        self.record_call();
        let mut collections = self.collections.write().await;
        let target = collections
            .get_mut(&collection)
            .and_then(|docs| docs.iter_mut().find(|doc| filter.matches(&doc.body)));
        Ok(match target {
            Some(doc) => UpdateOutcome {
                matched_count: 1,
                modified_count: u64::from(Self::merge_into(doc, &set)),
            },
            None => UpdateOutcome::default(),
        })
    }

    async fn delete_by_id(&self, collection: Collection, id: DocumentId) -> Result<bool, DatabaseError> {
        self.record_call();
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(&collection) else {
            return Ok(false);
        };
        let before = docs.len();
        docs.retain(|doc| doc.id != id);
        Ok(docs.len() < before)
    }

    async fn sum(&self, collection: Collection, field: &str) -> Result<Decimal, DatabaseError> {
        self.record_call();
        let collections = self.collections.read().await;
        let total = collections
            .get(&collection)
            .map(|docs| {
                docs.iter()
                    .filter_map(|doc| doc.body.get(field).and_then(as_decimal))
                    .sum()
            })
            .unwrap_or_default();
        Ok(total)
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}

fn as_decimal(value: &Value) -> Option<Decimal> {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        _ => return None,
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}
