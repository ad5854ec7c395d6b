use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::db::{FEATURE_FLAG, FlagStore};
use crate::error::FlagError;
use crate::service::flag_cache::FlagCache;

/// Binds the in-memory cache to the durable store for the single managed flag.
///
/// Reads never touch the store. Writes update the cache first and then the
/// store; if the store write fails the error is returned and the cache keeps
/// the new value, so the two diverge until the next successful write.
///
/// Writes are serialized so the cache always ends on the value of the last
/// store write to complete. Readers only take the cache lock.
pub struct FlagService {
    store: Arc<dyn FlagStore>,
    cache: FlagCache,
    write_gate: Mutex<()>,
    flag_name: &'static str,
}

impl FlagService {
    pub fn new(store: Arc<dyn FlagStore>) -> Self {
        Self {
            store,
            cache: FlagCache::default(),
            write_gate: Mutex::new(()),
            flag_name: FEATURE_FLAG,
        }
    }

    pub fn flag_name(&self) -> &'static str {
        self.flag_name
    }

    /// Bootstrap the table and default row, then seed the cache.
    ///
    /// Schema and default-row failures are returned (startup-fatal). A failed
    /// seed read only logs a warning and leaves the cache at `false`.
    pub async fn initialize(&self) -> Result<(), FlagError> {
        self.store.ensure_schema().await?;
        self.store.ensure_default_row(self.flag_name, false).await?;

        match self.store.read_flag(self.flag_name).await {
            Ok(enabled) => {
                self.cache.set(enabled);
                info!(flag = self.flag_name, enabled, "flag state loaded from store");
            }
            Err(e) => {
                warn!(
                    flag = self.flag_name,
                    error = %e,
                    "could not fetch flag state from store; serving default"
                );
            }
        }
        Ok(())
    }

    pub fn get_state(&self) -> bool {
        self.cache.get()
    }

    pub async fn set_state(&self, enabled: bool) -> Result<(), FlagError> {
        // held until the store write returns
        let _gate = self.write_gate.lock().await;
        self.cache.set(enabled);

        if let Err(e) = self.store.write_flag(self.flag_name, enabled).await {
            error!(
                flag = self.flag_name,
                enabled,
                error = %e,
                "store update failed; cache and store now diverge"
            );
            return Err(e);
        }

        info!(flag = self.flag_name, enabled, "flag state saved to store and memory");
        Ok(())
    }
}
