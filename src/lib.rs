//! Shared movie watch list.
//!
//! A soft-delete collection of movies behind a single shared password,
//! served over REST, plus the client-side engine that sorts, groups and
//! shuffles the cached list and syncs user changes back.

pub mod auth;
pub mod client;
pub mod collection;
pub mod config;
#[cfg(feature = "http")]
pub mod http;
pub mod lock;
pub mod model;
pub mod movie;
pub mod telemetry;

pub use auth::{AuthError, AuthGate, Session, SessionToken, SharedPasswordGate};
pub use collection::{CollectionError, CollectionService, MovieRepository};
pub use config::{Config, ConfigError};
pub use lock::{InMemoryLock, InMemoryLockManager, Lock, LockError, LockManager};
#[cfg(feature = "sqlite")]
pub use model::SqliteModelStore;
pub use model::{InMemoryModelStore, Model, ModelError, ModelStore, Versioned};
pub use movie::{Movie, MovieId, MoviePatch, NewMovie};
