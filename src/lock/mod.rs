//! Per-id write serialization.
//!
//! The Collection Service takes the lock for a movie id around every
//! read-merge-write, so concurrent patches of the same record never
//! interleave. Different ids never contend.

mod error;
mod in_memory;
mod lock_manager;

pub use error::LockError;
pub use in_memory::{InMemoryLock, InMemoryLockManager};
pub use lock_manager::{Lock, LockManager};
