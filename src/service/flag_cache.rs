use std::sync::{PoisonError, RwLock, RwLockReadGuard};

/// In-memory copy of the flag value.
///
/// Readers share the lock; `set` is exclusive. The guard is never held
/// across an `.await`, so a slow store call cannot stall readers.
#[derive(Debug, Default)]
pub struct FlagCache {
    value: RwLock<bool>,
}

impl FlagCache {
    pub fn new(initial: bool) -> Self {
        Self {
            value: RwLock::new(initial),
        }
    }

    pub fn get(&self) -> bool {
        *self.read()
    }

    pub fn set(&self, enabled: bool) {
        let mut guard = self.value.write().unwrap_or_else(PoisonError::into_inner);
        *guard = enabled;
    }

    fn read(&self) -> RwLockReadGuard<'_, bool> {
        // a bool cannot be left half-written, so a poisoned lock is still usable
        self.value.read().unwrap_or_else(PoisonError::into_inner)
    }
}
