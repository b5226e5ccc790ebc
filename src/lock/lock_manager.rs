use std::sync::Arc;

use super::LockError;

/// A blocking mutual-exclusion lock that can be released from any thread.
pub trait Lock: Send + Sync {
    /// Block until the lock is ours.
    fn lock(&self) -> Result<(), LockError>;

    /// Fails with `ReleaseFailed` when the lock is not held.
    fn unlock(&self) -> Result<(), LockError>;
}

/// Factory trait for obtaining per-record locks.
///
/// Repeated calls with the same `id` must return the same logical lock.
/// The default `InMemoryLockManager` keeps one lock per id in a `HashMap`;
/// a multi-process deployment would back this with something shared.
pub trait LockManager: Send + Sync {
    /// The concrete lock type returned by this manager.
    type Lock: Lock;

    /// Get (or create) a lock for the given identifier.
    fn get_lock(&self, id: &str) -> Result<Arc<Self::Lock>, LockError>;

    /// Run `f` while holding the lock for `id`.
    ///
    /// The lock is released whether `f` succeeds or fails. A release
    /// failure is reported only when `f` itself succeeded.
    fn with_lock<T, E, F>(&self, id: &str, f: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
        E: From<LockError>,
    {
        let lock = self.get_lock(id)?;
        lock.lock()?;
        let result = f();
        let released = lock.unlock();
        match (result, released) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(e)) => Err(e.into()),
            (Err(e), _) => Err(e),
        }
    }
}
