//! Client state and its transition function.

use std::collections::BTreeSet;

use super::api::ApiError;
use super::view::ViewState;
use crate::movie::{Movie, MovieId};

pub const LOAD_FAILED: &str = "Failed to load movies. Please try again.";
pub const ADD_FAILED: &str = "Failed to add movie. Please try again.";
pub const UPDATE_FAILED: &str = "Failed to update movie. Please try again.";
pub const DELETE_FAILED: &str = "Failed to delete movie. Please try again.";
pub const ADD_SUCCEEDED: &str = "Movie added successfully!";

/// Everything the list screen shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientState {
    /// Active movies, in the order the service listed or created them.
    pub movies: Vec<Movie>,
    pub view: ViewState,
    pub loading: bool,
    pub adding: bool,
    /// Ids with a mutation in flight.
    pub pending: BTreeSet<MovieId>,
    pub error: Option<String>,
    pub notice: Option<String>,
}

impl ClientState {
    pub fn movie(&self, id: MovieId) -> Option<&Movie> {
        self.movies.iter().find(|m| m.id == id)
    }

    pub fn is_pending(&self, id: MovieId) -> bool {
        self.pending.contains(&id)
    }
}

/// Inputs to [`reduce`]: user actions and completed round trips.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    LoadStarted,
    Loaded(Result<Vec<Movie>, ApiError>),
    ToggleSort,
    ToggleGroup,
    Shuffled(Vec<MovieId>),
    AddStarted,
    Added(Result<Movie, ApiError>),
    MutationStarted(MovieId),
    SeenToggled(MovieId, Result<Movie, ApiError>),
    SoftDeleted(MovieId, Result<Movie, ApiError>),
    /// Refused locally before any request was made.
    Rejected(String),
    DismissNotice,
}

/// Apply `event` to `state`.
///
/// A failed round trip never touches `movies` or `view`; it only records
/// the error and clears the in-flight marker.
pub fn reduce(mut state: ClientState, event: Event) -> ClientState {
    match event {
        Event::LoadStarted => {
            state.loading = true;
        }
        Event::Loaded(result) => {
            state.loading = false;
            match result {
                Ok(movies) => {
                    state.movies = movies;
                    state.error = None;
                }
                Err(_) => state.error = Some(LOAD_FAILED.to_string()),
            }
        }
        Event::ToggleSort => state.view.toggle_sort(),
        Event::ToggleGroup => state.view.toggle_group(),
        Event::Shuffled(order) => state.view.freeze(order),
        Event::AddStarted => {
            state.adding = true;
        }
        Event::Added(result) => {
            state.adding = false;
            match result {
                Ok(movie) => {
                    state.movies.push(movie);
                    state.notice = Some(ADD_SUCCEEDED.to_string());
                }
                Err(_) => state.error = Some(ADD_FAILED.to_string()),
            }
        }
        Event::MutationStarted(id) => {
            state.pending.insert(id);
        }
        Event::SeenToggled(id, result) => {
            state.pending.remove(&id);
            match result {
                Ok(updated) => {
                    if let Some(slot) = state.movies.iter_mut().find(|m| m.id == id) {
                        *slot = updated;
                    }
                }
                Err(_) => state.error = Some(UPDATE_FAILED.to_string()),
            }
        }
        Event::SoftDeleted(id, result) => {
            state.pending.remove(&id);
            match result {
                Ok(_) => state.movies.retain(|m| m.id != id),
                Err(_) => state.error = Some(DELETE_FAILED.to_string()),
            }
        }
        Event::Rejected(message) => state.error = Some(message),
        Event::DismissNotice => state.notice = None,
    }
    state
}
