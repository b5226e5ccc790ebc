//! Sync Controller: runs each user mutation as a confirmed round trip.
//!
//! Nothing is applied locally before the service answers. While a request
//! for a movie is in flight, further mutations of that movie are refused
//! with [`SyncError::Busy`]; likewise a second add while one is running.

use std::fmt;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tracing::{info, warn};

use super::api::{ApiError, MovieApi};
use super::state::{reduce, ClientState, Event};
use super::view::{render, shuffle_order, Rendered};
use crate::movie::{Movie, MovieId, MoviePatch, NewMovie};

pub const MISSING_FIELDS: &str = "Movie title and genre are required";

/// Why a controller action did not complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// Refused locally; no request was sent.
    Invalid(String),
    /// A request for the same target is still in flight.
    Busy,
    /// The id is not in the local cache.
    UnknownMovie(MovieId),
    /// The round trip failed.
    Api(ApiError),
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncError::Invalid(msg) => write!(f, "{}", msg),
            SyncError::Busy => write!(f, "request already in flight"),
            SyncError::UnknownMovie(id) => write!(f, "movie {} is not loaded", id),
            SyncError::Api(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for SyncError {}

impl From<ApiError> for SyncError {
    fn from(err: ApiError) -> Self {
        SyncError::Api(err)
    }
}

/// Owns the client state and funnels every change through [`reduce`].
pub struct SyncController<A> {
    api: A,
    state: ClientState,
    rng: Box<dyn RngCore + Send>,
}

impl<A: MovieApi> SyncController<A> {
    pub fn new(api: A) -> Self {
        Self::with_rng(api, StdRng::from_entropy())
    }

    /// Use a specific random source for shuffles.
    pub fn with_rng(api: A, rng: impl RngCore + Send + 'static) -> Self {
        Self {
            api,
            state: ClientState::default(),
            rng: Box::new(rng),
        }
    }

    pub fn state(&self) -> &ClientState {
        &self.state
    }

    pub fn movies(&self) -> &[Movie] {
        &self.state.movies
    }

    pub fn render(&self) -> Rendered<'_> {
        render(&self.state.movies, &self.state.view)
    }

    /// Dispatch an event directly. Useful for UI glue that runs requests
    /// elsewhere.
    pub fn dispatch(&mut self, event: Event) {
        let state = std::mem::take(&mut self.state);
        self.state = reduce(state, event);
    }

    /// Replace the cache with the service's active list.
    pub async fn load(&mut self) -> Result<(), SyncError> {
        self.dispatch(Event::LoadStarted);
        let result = self.api.list().await;
        if let Err(e) = &result {
            warn!(error = %e, "load failed");
        }
        let outcome: Result<(), SyncError> = result.as_ref().map(|_| ()).map_err(|e| e.clone().into());
        self.dispatch(Event::Loaded(result));
        outcome
    }

    /// Create a movie and append the server's record to the cache.
    pub async fn add(&mut self, name: &str, genre: &str) -> Result<Movie, SyncError> {
        if self.state.adding {
            return Err(SyncError::Busy);
        }
        let new = NewMovie::new(name, genre);
        if new.validated().is_none() {
            self.dispatch(Event::Rejected(MISSING_FIELDS.to_string()));
            return Err(SyncError::Invalid(MISSING_FIELDS.to_string()));
        }

        self.dispatch(Event::AddStarted);
        let result = self.api.create(&new).await;
        match &result {
            Ok(movie) => info!(movie_id = %movie.id, "movie added"),
            Err(e) => warn!(error = %e, "add failed"),
        }
        let outcome = result.clone().map_err(SyncError::from);
        self.dispatch(Event::Added(result));
        outcome
    }

    /// Flip `seen` for a cached movie. The server's record replaces ours.
    pub async fn toggle_seen(&mut self, id: MovieId) -> Result<Movie, SyncError> {
        let current = self.claim(id)?;
        let patch = MoviePatch::seen(!current.seen);
        let result = self.api.update(id, &patch).await;
        if let Err(e) = &result {
            warn!(movie_id = %id, error = %e, "toggle seen failed");
        }
        let outcome = result.clone().map_err(SyncError::from);
        self.dispatch(Event::SeenToggled(id, result));
        outcome
    }

    /// Soft-delete a cached movie and drop it from the cache once confirmed.
    pub async fn soft_delete(&mut self, id: MovieId) -> Result<Movie, SyncError> {
        self.claim(id)?;
        let result = self.api.update(id, &MoviePatch::soft_delete()).await;
        if let Err(e) = &result {
            warn!(movie_id = %id, error = %e, "soft delete failed");
        }
        let outcome = result.clone().map_err(SyncError::from);
        self.dispatch(Event::SoftDeleted(id, result));
        outcome
    }

    pub fn toggle_sort(&mut self) {
        self.dispatch(Event::ToggleSort);
    }

    pub fn toggle_group(&mut self) {
        self.dispatch(Event::ToggleGroup);
    }

    /// Draw and freeze a fresh random order of the cached movies.
    pub fn shuffle(&mut self) {
        let order = shuffle_order(&self.state.movies, &mut self.rng);
        self.dispatch(Event::Shuffled(order));
    }

    pub fn dismiss_notice(&mut self) {
        self.dispatch(Event::DismissNotice);
    }

    /// Mark `id` in flight and return its cached record.
    fn claim(&mut self, id: MovieId) -> Result<Movie, SyncError> {
        if self.state.is_pending(id) {
            return Err(SyncError::Busy);
        }
        let current = self
            .state
            .movie(id)
            .cloned()
            .ok_or(SyncError::UnknownMovie(id))?;
        self.dispatch(Event::MutationStarted(id));
        Ok(current)
    }
}
