use std::sync::Arc;

use tracing::{error, info, instrument, warn};

use super::{CollectionError, MovieRepository};
use crate::auth::{AuthError, AuthGate, Session};
use crate::lock::{InMemoryLockManager, LockManager};
use crate::model::{ModelStore, Versioned};
use crate::movie::{Movie, MovieId, MoviePatch, NewMovie};

pub(crate) const MISSING_FIELDS: &str = "Name and genre are required";

/// Stateless mediator between callers and the store.
///
/// Generic over the store `S` and the per-id lock manager `L`. The service
/// owns no movie data of its own; everything lives in `S`.
pub struct CollectionService<S, L = InMemoryLockManager> {
    store: S,
    locks: L,
    gate: Arc<dyn AuthGate>,
}

impl<S: ModelStore> CollectionService<S, InMemoryLockManager> {
    pub fn new(store: S, gate: Arc<dyn AuthGate>) -> Self {
        Self::with_locks(store, InMemoryLockManager::new(), gate)
    }
}

impl<S: ModelStore, L: LockManager> CollectionService<S, L> {
    pub fn with_locks(store: S, locks: L, gate: Arc<dyn AuthGate>) -> Self {
        Self { store, locks, gate }
    }

    /// The gate this service checks sessions against.
    pub fn gate(&self) -> &Arc<dyn AuthGate> {
        &self.gate
    }

    /// Unchecked access to the stored movies (administration and tests).
    pub fn movies(&self) -> MovieRepository<'_, S> {
        MovieRepository::new(&self.store)
    }

    fn authorize(&self, session: &Session, operation: &'static str) -> Result<(), CollectionError> {
        self.gate.verify(session).map_err(|e| {
            match &e {
                AuthError::Internal(_) => error!(operation, error = %e, "session check failed"),
                _ => warn!(operation, reason = %e, "unauthorized call rejected"),
            }
            CollectionError::from(e)
        })
    }

    fn load(&self, id: MovieId) -> Result<Versioned<Movie>, CollectionError> {
        self.movies().require(id).map_err(|e| match e {
            missing @ CollectionError::NotFound(_) => {
                warn!(movie_id = %id, "movie not found");
                missing
            }
            other => store_failure(other),
        })
    }

    /// All records with `is_deleted == false`, in creation order.
    pub fn list_active(&self, session: &Session) -> Result<Vec<Movie>, CollectionError> {
        self.authorize(session, "list")?;
        self.movies().active().map_err(|e| store_failure(e.into()))
    }

    /// One record, deleted or not.
    pub fn get(&self, session: &Session, id: MovieId) -> Result<Movie, CollectionError> {
        self.authorize(session, "get")?;
        self.load(id).map(|v| v.data)
    }

    /// Validate, assign a fresh id, persist, and return the full record.
    #[instrument(skip(self, session), fields(movie_id = tracing::field::Empty))]
    pub fn create(&self, session: &Session, new: &NewMovie) -> Result<Movie, CollectionError> {
        self.authorize(session, "create")?;
        let (name, genre) = new.validated().ok_or_else(|| {
            warn!("create rejected: missing name or genre");
            CollectionError::Validation(MISSING_FIELDS.to_string())
        })?;

        let movie = Movie::create(name, genre);
        tracing::Span::current().record("movie_id", tracing::field::display(&movie.id));
        let stored = self
            .movies()
            .insert(&movie)
            .map_err(|e| store_failure(e.into()))?;
        info!(name = %stored.data.name, genre = %stored.data.genre, "movie created");
        Ok(stored.data)
    }

    /// Merge-patch `seen` and/or `is_deleted`. Fields absent from `patch`
    /// keep their stored value. Re-applying a patch is a no-op.
    #[instrument(skip(self, session, id), fields(movie_id = %id))]
    pub fn update(
        &self,
        session: &Session,
        id: MovieId,
        patch: &MoviePatch,
    ) -> Result<Movie, CollectionError> {
        self.authorize(session, "update")?;
        self.locks.with_lock(&id.to_string(), || {
            let current = self.load(id)?;
            let next = patch.apply(&current.data);
            if next == current.data {
                return Ok(current.data);
            }
            let stored = self
                .movies()
                .save(&next, current.version)
                .map_err(|e| store_failure(e.into()))?;
            info!(
                seen = stored.data.seen,
                is_deleted = stored.data.is_deleted,
                version = stored.version,
                "movie updated"
            );
            Ok(stored.data)
        })
    }

    /// Permanently remove a record. Administrative escape hatch, gated
    /// by the same session check as everything else.
    #[instrument(skip(self, session, id), fields(movie_id = %id))]
    pub fn hard_delete(&self, session: &Session, id: MovieId) -> Result<(), CollectionError> {
        self.authorize(session, "hard_delete")?;
        self.locks.with_lock(&id.to_string(), || {
            let removed = self
                .movies()
                .remove(id)
                .map_err(|e| store_failure(e.into()))?;
            if !removed {
                warn!("hard delete of missing movie");
                return Err(CollectionError::NotFound(id));
            }
            info!("movie hard-deleted");
            Ok(())
        })
    }
}

fn store_failure(err: CollectionError) -> CollectionError {
    error!(error = %err, "store failure");
    err
}
