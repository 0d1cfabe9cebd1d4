// crates/db/src/lib.rs
// Read-only SQLite access for the field intelligence star schema.

pub mod fixtures;
mod queries;

pub use fieldintel_core::{SchemaMap, SchemaVariant};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{ConnectOptions, SqlitePool};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Database file not found: {}", .0.display())]
    NotFound(PathBuf),
}

pub type DbResult<T> = Result<T, DbError>;

/// Main database handle wrapping a SQLite connection pool.
///
/// The schema layout is fixed when the handle is opened; every report reads
/// its SQL fragments from [`Database::schema`].
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
    variant: SchemaVariant,
}

impl Database {
    /// Open an existing store read-only.
    ///
    /// With `variant = None` the layout is detected once from `sqlite_master`.
    pub async fn open(path: &Path, variant: Option<SchemaVariant>) -> DbResult<Self> {
        if !path.is_file() {
            return Err(DbError::NotFound(path.to_owned()));
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .read_only(true)
            .busy_timeout(std::time::Duration::from_secs(30))
            .log_slow_statements(
                tracing::log::LevelFilter::Warn,
                std::time::Duration::from_secs(5),
            );

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await?;

        let variant = match variant {
            Some(v) => v,
            None => detect_variant(&pool).await?,
        };

        info!(path = %path.display(), schema = %variant, "Database opened");
        Ok(Self {
            pool,
            variant,
        })
    }

    /// Create an in-memory database with the given layout's tables (for testing).
    ///
    /// Uses `shared_cache(true)` so all pool connections share the same
    /// in-memory database.
    pub async fn new_in_memory(variant: SchemaVariant) -> DbResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?
            .shared_cache(true)
            .busy_timeout(std::time::Duration::from_secs(5));
        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await?;
        sqlx::raw_sql(fixtures::ddl(variant)).execute(&pool).await?;
        Ok(Self {
            pool,
            variant,
        })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn variant(&self) -> SchemaVariant {
        self.variant
    }

    pub fn schema(&self) -> &'static SchemaMap {
        self.variant.map()
    }

    /// Whether `table` exists in the store.
    pub async fn table_exists(&self, table: &str) -> DbResult<bool> {
        table_exists(&self.pool, table).await
    }
}

async fn table_exists(pool: &SqlitePool, table: &str) -> DbResult<bool> {
    let (count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1")
            .bind(table)
            .fetch_one(pool)
            .await?;
    Ok(count > 0)
}

async fn detect_variant(pool: &SqlitePool) -> DbResult<SchemaVariant> {
    if table_exists(pool, SchemaVariant::SEVERITY_MARKER_TABLE).await? {
        Ok(SchemaVariant::Severity)
    } else {
        Ok(SchemaVariant::Outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_creates_tables() {
        let db = Database::new_in_memory(SchemaVariant::Severity).await.unwrap();
        assert!(db.table_exists("fact_conversation").await.unwrap());
        assert!(db.table_exists("dim_team").await.unwrap());
        assert!(!db.table_exists("no_such_table").await.unwrap());
    }

    #[tokio::test]
    async fn test_open_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Database::open(&dir.path().join("missing.db"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_open_detects_layout() {
        let dir = tempfile::tempdir().unwrap();
        for variant in [SchemaVariant::Outcome, SchemaVariant::Severity] {
            let path = dir.path().join(format!("{variant}.db"));
            let options = SqliteConnectOptions::new()
                .filename(&path)
                .create_if_missing(true);
            let pool = SqlitePoolOptions::new().connect_with(options).await.unwrap();
            sqlx::raw_sql(fixtures::ddl(variant)).execute(&pool).await.unwrap();
            pool.close().await;

            let db = Database::open(&path, None).await.unwrap();
            assert_eq!(db.variant(), variant);
        }
    }

    #[tokio::test]
    async fn test_open_is_read_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ro.db");
        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await.unwrap();
        sqlx::raw_sql(fixtures::ddl(SchemaVariant::Outcome))
            .execute(&pool)
            .await
            .unwrap();
        pool.close().await;

        let db = Database::open(&path, Some(SchemaVariant::Outcome)).await.unwrap();
        let write = sqlx::query("INSERT INTO dim_region (region_id, region_name) VALUES (1, 'x')")
            .execute(db.pool())
            .await;
        assert!(write.is_err());
    }
}
