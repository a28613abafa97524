use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use sqlx::{postgres::PgRow, types::Json, PgPool, Row};
use uuid::Uuid;

use crate::filter::{Filter, FilterSort, FindQuery, SqlResult};

use super::manager::DatabaseError;
use super::store::{Collection, Document, DocumentId, DocumentStore, UpdateOutcome};

/// Postgres-backed document store: each collection is a table of
/// `(id UUID, doc JSONB)` rows.
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_documents(&self, sql: &SqlResult) -> Result<Vec<Document>, DatabaseError> {
        let mut q = sqlx::query(&sql.query);
        for p in sql.params.iter() {
            q = q.bind(p);
        }
        let rows = q.fetch_all(&self.pool).await?;
        rows.iter().map(row_to_document).collect()
    }

    /// Merge `set` into the rows selected by `target_sql`, reporting how many
    /// were matched and how many actually changed.
    async fn merge(
        &self,
        table: &str,
        target_sql: SqlResult,
        set: Map<String, Value>,
    ) -> Result<UpdateOutcome, DatabaseError> {
        let patch_param = target_sql.params.len() + 1;
        let target = &target_sql.query;
        let query = format!(
            "WITH target AS ({target}), \
             updated AS (UPDATE \"{table}\" t SET doc = t.doc || ${patch_param} \
                         FROM target WHERE t.id = target.id AND NOT (target.doc @> ${patch_param}) \
                         RETURNING t.id) \
             SELECT (SELECT COUNT(*) FROM target) AS matched, (SELECT COUNT(*) FROM updated) AS modified"
        );

        let mut q = sqlx::query(&query);
        for p in target_sql.params.iter() {
            q = q.bind(p);
        }
        let row = q.bind(Json(Value::Object(set))).fetch_one(&self.pool).await?;

        let matched: i64 = row.try_get("matched")?;
        let modified: i64 = row.try_get("modified")?;
        Ok(UpdateOutcome {
            matched_count: matched.max(0) as u64,
            modified_count: modified.max(0) as u64,
        })
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn find(&self, collection: Collection, query: &FindQuery) -> Result<Vec<Document>, DatabaseError> {
        let sql = query.to_sql(collection.name())?;
        self.fetch_documents(&sql).await
    }

    async fn count(&self, collection: Collection, filter: &Filter) -> Result<u64, DatabaseError> {
        let sql = filter.to_count_sql(collection.name())?;
        let mut q = sqlx::query(&sql.query);
        for p in sql.params.iter() {
            q = q.bind(p);
        }
        let row = q.fetch_one(&self.pool).await?;
        let count: i64 = row.try_get("count")?;
        Ok(count.max(0) as u64)
    }

    async fn find_one(&self, collection: Collection, filter: &Filter) -> Result<Option<Document>, DatabaseError> {
        let query = FindQuery::new(filter.clone(), FilterSort::newest_first(collection.sort_field()))
            .window(0, Some(1));
        Ok(self.find(collection, &query).await?.into_iter().next())
    }

    async fn find_by_id(&self, collection: Collection, id: DocumentId) -> Result<Option<Document>, DatabaseError> {
        let row = sqlx::query(&format!(
            "SELECT id, doc FROM \"{}\" WHERE id = $1",
            collection.name()
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(row_to_document).transpose()
    }

    async fn insert_one(&self, collection: Collection, mut body: Map<String, Value>) -> Result<DocumentId, DatabaseError> {
        body.remove("_id");
        let id = DocumentId::new();
        sqlx::query(&format!(
            "INSERT INTO \"{}\" (id, doc) VALUES ($1, $2)",
            collection.name()
        ))
        .bind(id.as_uuid())
        .bind(Json(Value::Object(body)))
        .execute(&self.pool)
        .await?;
        Ok(id)
    }

    async fn update_by_id(
        &self,
        collection: Collection,
        id: DocumentId,
        mut set: Map<String, Value>,
    ) -> Result<UpdateOutcome, DatabaseError> {
        set.remove("_id");
        let target = SqlResult {
            query: format!(
                "SELECT id, doc FROM \"{}\" WHERE id = $1::uuid",
                collection.name()
            ),
            params: vec![id.to_string()],
        };
        self.merge(collection.name(), target, set).await
    }

    async fn update_one(
        &self,
        collection: Collection,
        filter: &Filter,
        mut set: Map<String, Value>,
    ) -> Result<UpdateOutcome, DatabaseError> {
        set.remove("_id");
        let where_sql = filter.to_where_sql(0);
        let where_clause = if where_sql.query.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", where_sql.query)
        };
        let target = SqlResult {
            query: format!(
                "SELECT id, doc FROM \"{}\"{} LIMIT 1",
                collection.name(),
                where_clause
            ),
            params: where_sql.params,
        };
        self.merge(collection.name(), target, set).await
    }

    async fn delete_by_id(&self, collection: Collection, id: DocumentId) -> Result<bool, DatabaseError> {
        let result = sqlx::query(&format!("DELETE FROM \"{}\" WHERE id = $1", collection.name()))
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn sum(&self, collection: Collection, field: &str) -> Result<Decimal, DatabaseError> {
        Filter::validate_field(field)?;
        let row = sqlx::query(&format!(
            "SELECT COALESCE(SUM((doc->>'{}')::numeric), 0) AS total FROM \"{}\"",
            field,
            collection.name()
        ))
        .fetch_one(&self.pool)
        .await?;
        Ok(row.try_get("total")?)
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

fn row_to_document(row: &PgRow) -> Result<Document, DatabaseError> {
    let id: Uuid = row.try_get("id")?;
    let doc: Value = row.try_get("doc")?;
    match doc {
        Value::Object(body) => Ok(Document {
            id: id.into(),
            body,
        }),
        other => Err(DatabaseError::QueryError(format!(
            "document {} is not an object: {}",
            id, other
        ))),
    }
}
