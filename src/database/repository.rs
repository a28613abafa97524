use std::marker::PhantomData;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

use crate::filter::{Filter, FilterSort, FindQuery, Page, Pagination};

use super::manager::DatabaseError;
use super::store::{Collection, DocumentId, DocumentStore, UpdateOutcome};

/// Typed access to one collection. Models serialize to the stored body and
/// deserialize from it with `_id` attached.
pub struct Repository<T> {
    collection: Collection,
    store: Arc<dyn DocumentStore>,
    _phantom: PhantomData<fn() -> T>,
}

impl<T> Repository<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(collection: Collection, store: Arc<dyn DocumentStore>) -> Self {
        Self {
            collection,
            store,
            _phantom: PhantomData,
        }
    }

    pub fn newest_first(&self, filter: Filter) -> FindQuery {
        FindQuery::new(filter, FilterSort::newest_first(self.collection.sort_field()))
    }

    /// Count and page are separate reads under the same filter, so a write
    /// landing between them can make `totalCount` disagree with `items`.
    pub async fn select_page(&self, filter: Filter, pagination: &Pagination) -> Result<Page<T>, DatabaseError> {
        let (skip, limit) = pagination.window();
        let query = self.newest_first(filter.clone()).window(skip, limit);

        let (total_count, items) = futures::try_join!(
            self.store.count(self.collection, &filter),
            self.select_any(&query)
        )?;

        Ok(Page::new(items, total_count, pagination))
    }

    pub async fn select_any(&self, query: &FindQuery) -> Result<Vec<T>, DatabaseError> {
        self.store
            .find(self.collection, query)
            .await?
            .into_iter()
            .map(|doc| doc.into_model())
            .collect()
    }

    pub async fn select_one(&self, filter: &Filter) -> Result<Option<T>, DatabaseError> {
        self.store
            .find_one(self.collection, filter)
            .await?
            .map(|doc| doc.into_model())
            .transpose()
    }

    pub async fn select_id(&self, id: DocumentId) -> Result<Option<T>, DatabaseError> {
        self.store
            .find_by_id(self.collection, id)
            .await?
            .map(|doc| doc.into_model())
            .transpose()
    }

    pub async fn select_404(&self, id: DocumentId, what: &str) -> Result<T, DatabaseError> {
        self.select_id(id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("{} not found", what)))
    }

    pub async fn count(&self, filter: &Filter) -> Result<u64, DatabaseError> {
        self.store.count(self.collection, filter).await
    }

    pub async fn insert(&self, model: &T) -> Result<DocumentId, DatabaseError> {
        let body = match serde_json::to_value(model)? {
            Value::Object(body) => body,
            other => {
                return Err(DatabaseError::QueryError(format!(
                    "{} documents must be objects, got {}",
                    self.collection.name(),
                    other
                )))
            }
        };
        self.store.insert_one(self.collection, body).await
    }

    pub async fn update_id(&self, id: DocumentId, set: Map<String, Value>) -> Result<UpdateOutcome, DatabaseError> {
        self.store.update_by_id(self.collection, id, set).await
    }

    pub async fn update_one(&self, filter: &Filter, set: Map<String, Value>) -> Result<UpdateOutcome, DatabaseError> {
        self.store.update_one(self.collection, filter, set).await
    }

    pub async fn delete_id(&self, id: DocumentId) -> Result<bool, DatabaseError> {
        self.store.delete_by_id(self.collection, id).await
    }
}
