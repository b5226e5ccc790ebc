//! ModelStore - Abstract CRUD storage for models.

use super::{Model, ModelError, Versioned};

/// Abstract CRUD storage for models.
///
/// Every successful write is committed before the call returns.
pub trait ModelStore: Send + Sync {
    /// Get a model by ID. Returns None if not found.
    fn get_model<M: Model>(&self, id: &str) -> Result<Option<Versioned<M>>, ModelError>;

    /// List every model of the collection in insertion order.
    fn list_models<M: Model>(&self) -> Result<Vec<Versioned<M>>, ModelError>;

    /// Insert a new model. Fails if it already exists.
    fn insert_model<M: Model>(&self, model: &M) -> Result<Versioned<M>, ModelError>;

    /// Update an existing model with optimistic concurrency control.
    fn update_model<M: Model>(
        &self,
        model: &M,
        expected_version: u64,
    ) -> Result<Versioned<M>, ModelError>;

    /// Delete a model by ID. Returns true if it existed.
    fn delete_model<M: Model>(&self, id: &str) -> Result<bool, ModelError>;

    /// Find models matching a predicate, in insertion order.
    fn find_models<M: Model>(
        &self,
        predicate: &dyn Fn(&M) -> bool,
    ) -> Result<Vec<Versioned<M>>, ModelError> {
        Ok(self
            .list_models::<M>()?
            .into_iter()
            .filter(|v| predicate(&v.data))
            .collect())
    }
}
