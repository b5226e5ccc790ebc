//! Models - durable keyed storage for typed records.
//!
//! A `ModelStore` persists any `Model` by id and hands it back wrapped in
//! `Versioned<T>`. The Collection Service is the only writer; everything it
//! stores is a `Movie`, but the store itself is schema-agnostic.
//!
//! ## Example
//!
//! ```ignore
//! use watchlist::{InMemoryModelStore, ModelStore, Movie};
//!
//! let store = InMemoryModelStore::new();
//! store.insert_model(&movie)?;
//! let loaded = store.get_model::<Movie>(&movie.id.to_string())?;
//! ```

mod in_memory;
#[cfg(feature = "sqlite")]
mod sqlite;
mod store;

use serde::{de::DeserializeOwned, Serialize};
use std::fmt;

/// Trait for types that can be stored as models.
pub trait Model: Serialize + DeserializeOwned + Clone + Send + Sync {
    /// The collection name for this model type (e.g., "movies").
    /// Maps to a key prefix in the in-memory store and a column value in SQLite.
    const COLLECTION: &'static str;

    /// Returns the unique identifier for this model instance.
    fn id(&self) -> String;
}

/// A versioned wrapper around model data for optimistic concurrency control.
#[derive(Debug, Clone)]
pub struct Versioned<T> {
    pub data: T,
    pub version: u64,
}

/// Error type for model store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// Optimistic concurrency conflict.
    ConcurrencyConflict {
        collection: String,
        id: String,
        expected: u64,
        actual: u64,
    },
    /// Serialization/deserialization error.
    Serde(String),
    /// Storage-level error.
    Storage(String),
    /// Model not found.
    NotFound { collection: String, id: String },
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::ConcurrencyConflict {
                collection,
                id,
                expected,
                actual,
            } => write!(
                f,
                "concurrency conflict on {}:{} (expected version {}, actual {})",
                collection, id, expected, actual
            ),
            ModelError::Serde(msg) => write!(f, "model serialization error: {}", msg),
            ModelError::Storage(msg) => write!(f, "model storage error: {}", msg),
            ModelError::NotFound { collection, id } => {
                write!(f, "model not found: {}:{}", collection, id)
            }
        }
    }
}

impl std::error::Error for ModelError {}

pub use in_memory::InMemoryModelStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteModelStore;
pub use store::ModelStore;
