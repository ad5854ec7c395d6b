//! Persistent store for flag rows.
//!
//! Layout:
//! - `schema.rs`: DDL and per-backend SQL text
//! - `models.rs`: the `Flag` row and name validation
//! - `retry.rs`: bounded retry used by [`connect`]
//! - `postgres.rs` / `sqlite.rs`: sqlx backends implementing [`FlagStore`]

pub mod models;
pub mod postgres;
pub mod retry;
pub mod schema;
pub mod sqlite;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::error::FlagError;

pub use models::{FEATURE_FLAG, Flag};
pub use postgres::PgFlagStore;
pub use retry::RetryPolicy;
pub use sqlite::SqliteFlagStore;

/// Durable storage of named boolean flags.
#[async_trait]
pub trait FlagStore: Send + Sync {
    /// Create the `flags` table if it does not exist.
    async fn ensure_schema(&self) -> Result<(), FlagError>;

    /// Insert `name` with `default_enabled` unless a row already exists.
    async fn ensure_default_row(&self, name: &str, default_enabled: bool)
    -> Result<(), FlagError>;

    async fn read_flag(&self, name: &str) -> Result<bool, FlagError>;

    /// Overwrite the stored value. No retry.
    async fn write_flag(&self, name: &str, enabled: bool) -> Result<(), FlagError>;

    fn backend(&self) -> &'static str;
}

/// Open a store for `url`, retrying connect + ping per `policy`.
///
/// `postgres://` / `postgresql://` select PostgreSQL, `sqlite:` selects SQLite.
pub async fn connect(
    url: &str,
    policy: RetryPolicy,
    max_connections: u32,
) -> Result<Arc<dyn FlagStore>, FlagError> {
    let store: Arc<dyn FlagStore> = if url.starts_with("postgres://")
        || url.starts_with("postgresql://")
    {
        let store = retry::retry_bounded(policy, "waiting for database connection", || {
            PgFlagStore::connect(url, max_connections)
        })
        .await
        .map_err(|source| FlagError::Connect {
            attempts: policy.attempts(),
            source,
        })?;
        Arc::new(store)
    } else if url.starts_with("sqlite:") {
        let store = retry::retry_bounded(policy, "waiting for database connection", || {
            SqliteFlagStore::connect(url, max_connections)
        })
        .await
        .map_err(|source| FlagError::Connect {
            attempts: policy.attempts(),
            source,
        })?;
        Arc::new(store)
    } else {
        let scheme = url.split(':').next().unwrap_or_default();
        return Err(FlagError::UnsupportedDatabase(scheme.to_string()));
    };

    info!(backend = store.backend(), "connected to database");
    Ok(store)
}
