use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::filter::FilterError;

use super::store::Collection;

/// Errors from the document store
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Invalid id: {0}")]
    InvalidId(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Query error: {0}")]
    QueryError(String),

    #[error("Malformed document: {0}")]
    Document(#[from] serde_json::Error),

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Opens the process-wide Postgres pool and prepares the collection tables.
pub struct DatabaseManager;

impl DatabaseManager {
    /// Build the shared pool. Called once at process start; the pool lives
    /// until process exit.
    pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
        let url = config
            .url
            .as_deref()
            .ok_or(DatabaseError::ConfigMissing("DATABASE_URL"))?;
        Self::validate_url(url)?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(url)
            .await?;

        info!(
            "Connected to document database (max {} connections)",
            config.max_connections
        );
        Ok(pool)
    }

    /// One table per collection: store-assigned id plus the JSONB body.
    pub async fn migrate(pool: &PgPool) -> Result<(), DatabaseError> {
        for collection in Collection::ALL {
            let table = Self::quote_identifier(collection.name());
            sqlx::query(&format!(
                "CREATE TABLE IF NOT EXISTS {} (id UUID PRIMARY KEY, doc JSONB NOT NULL)",
                table
            ))
            .execute(pool)
            .await?;

            sqlx::query(&format!(
                "CREATE INDEX IF NOT EXISTS {} ON {} ((doc->>'{}'))",
                Self::quote_identifier(&format!("{}_sort_idx", collection.name())),
                table,
                collection.sort_field()
            ))
            .execute(pool)
            .await?;
        }

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS \"users_email_idx\" ON \"users\" ((doc->>'email'))",
        )
        .execute(pool)
        .await?;

        info!("Collection tables ready");
        Ok(())
    }

    fn validate_url(url: &str) -> Result<(), DatabaseError> {
        let parsed = url::Url::parse(url).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        match parsed.scheme() {
            "postgres" | "postgresql" => Ok(()),
            _ => Err(DatabaseError::InvalidDatabaseUrl),
        }
    }

    /// Quote SQL identifier to prevent injection
    fn quote_identifier(name: &str) -> String {
        format!("\"{}\"", name.replace('"', "\"\""))
    }
}
