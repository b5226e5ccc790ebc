use super::CollectionError;
use crate::model::{ModelError, ModelStore, Versioned};
use crate::movie::{Movie, MovieId};

/// Typed view of the `movies` collection in a [`ModelStore`].
///
/// Store failures surface as [`ModelError`]; the service decides how a
/// missing record is reported.
pub struct MovieRepository<'a, S> {
    store: &'a S,
}

impl<'a, S: ModelStore> MovieRepository<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Records with `is_deleted == false`, in creation order.
    pub fn active(&self) -> Result<Vec<Movie>, ModelError> {
        let found = self.store.find_models::<Movie>(&|movie| movie.is_active())?;
        Ok(found.into_iter().map(|v| v.data).collect())
    }

    /// Every record, soft-deleted ones included, with its version.
    pub fn all(&self) -> Result<Vec<Versioned<Movie>>, ModelError> {
        self.store.list_models()
    }

    pub fn load(&self, id: MovieId) -> Result<Option<Versioned<Movie>>, ModelError> {
        self.store.get_model(&id.to_string())
    }

    /// Like [`load`](Self::load), but a missing id is `NotFound`.
    pub fn require(&self, id: MovieId) -> Result<Versioned<Movie>, CollectionError> {
        self.load(id)?.ok_or(CollectionError::NotFound(id))
    }

    pub fn insert(&self, movie: &Movie) -> Result<Versioned<Movie>, ModelError> {
        self.store.insert_model(movie)
    }

    /// Write `movie` if the stored version is still `expected_version`.
    pub fn save(&self, movie: &Movie, expected_version: u64) -> Result<Versioned<Movie>, ModelError> {
        self.store.update_model(movie, expected_version)
    }

    /// Returns `false` when there was nothing to remove.
    pub fn remove(&self, id: MovieId) -> Result<bool, ModelError> {
        self.store.delete_model::<Movie>(&id.to_string())
    }
}
