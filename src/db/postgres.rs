use async_trait::async_trait;
use sqlx::Connection;
use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::db::FlagStore;
use crate::db::models::{Flag, validate_flag_name};
use crate::db::schema::{self, FLAGS_INIT};
use crate::error::FlagError;

/// PostgreSQL-backed flag table.
#[derive(Clone)]
pub struct PgFlagStore {
    pool: PgPool,
}

impl PgFlagStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Single connect + liveness probe; retries live in the caller.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await?;
        let mut conn = pool.acquire().await?;
        conn.ping().await?;
        drop(conn);
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl FlagStore for PgFlagStore {
    async fn ensure_schema(&self) -> Result<(), FlagError> {
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
        sqlx::query(schema::pg::INSERT_DEFAULT)
            .bind(name)
            .bind(default_enabled)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn read_flag(&self, name: &str) -> Result<bool, FlagError> {
        validate_flag_name(name)?;
        let row: Option<Flag> = sqlx::query_as(schema::pg::SELECT_ENABLED)
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|flag| flag.enabled)
            .ok_or_else(|| FlagError::FlagNotFound(name.to_string()))
    }

    async fn write_flag(&self, name: &str, enabled: bool) -> Result<(), FlagError> {
        validate_flag_name(name)?;
        let result = sqlx::query(schema::pg::UPDATE_ENABLED)
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
        "postgres"
    }
}
