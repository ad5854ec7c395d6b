use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Connection, Pool, Sqlite};

use crate::db::FlagStore;
use crate::db::models::{Flag, validate_flag_name};
use crate::db::schema::{self, FLAGS_INIT};
use crate::error::FlagError;

pub type SqlitePool = Pool<Sqlite>;

/// SQLite-backed flag table; the file is created on first connect.
#[derive(Clone)]
pub struct SqliteFlagStore {
    pool: SqlitePool,
}

impl SqliteFlagStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let connect_opts = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(connect_opts)
            .await?;
        let mut conn = pool.acquire().await?;
        conn.ping().await?;
        drop(conn);
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl FlagStore for SqliteFlagStore {
    async fn ensure_schema(&self) -> Result<(), FlagError> {
        // sqlx::query runs a single statement at a time
        for stmt in schema::statements(FLAGS_INIT) {
            sqlx::query(stmt).execute(&self.pool).await?;
        }
        Ok(())
    }

    async fn ensure_default_row(
        &self,
        name: &str,
        default_enabled: bool,
    ) -> Result<(), FlagError> {
        validate_flag_name(name)?;
        sqlx::query(schema::sqlite::INSERT_DEFAULT)
            .bind(name)
            .bind(default_enabled)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn read_flag(&self, name: &str) -> Result<bool, FlagError> {
        validate_flag_name(name)?;
        let row: Option<Flag> = sqlx::query_as(schema::sqlite::SELECT_ENABLED)
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|flag| flag.enabled)
            .ok_or_else(|| FlagError::FlagNotFound(name.to_string()))
    }

    async fn write_flag(&self, name: &str, enabled: bool) -> Result<(), FlagError> {
        validate_flag_name(name)?;
        let result = sqlx::query(schema::sqlite::UPDATE_ENABLED)
            .bind(enabled)
            .bind(name)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(FlagError::FlagNotFound(name.to_string()));
        }
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "sqlite"
    }
}
