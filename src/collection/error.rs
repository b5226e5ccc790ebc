//! Error type for Collection Service operations.

use std::error::Error;
use std::fmt;

use crate::auth::AuthError;
use crate::lock::LockError;
use crate::model::ModelError;
use crate::movie::MovieId;

/// Why a Collection Service call failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionError {
    /// No valid session.
    Unauthorized(AuthError),
    /// Required creation fields missing or blank.
    Validation(String),
    /// No record with this id.
    NotFound(MovieId),
    /// Persistence unavailable or inconsistent. Never retried.
    Store(String),
}

impl fmt::Display for CollectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectionError::Unauthorized(_) => write!(f, "Unauthorized"),
            CollectionError::Validation(msg) => write!(f, "{}", msg),
            CollectionError::NotFound(_) => write!(f, "Movie not found"),
            CollectionError::Store(msg) => write!(f, "store failure: {}", msg),
        }
    }
}

impl Error for CollectionError {}

/// `AuthError::Internal` maps to `Store`; every other refusal is `Unauthorized`.
impl From<AuthError> for CollectionError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Internal(msg) => CollectionError::Store(msg),
            other => CollectionError::Unauthorized(other),
        }
    }
}

impl From<ModelError> for CollectionError {
    fn from(err: ModelError) -> Self {
        CollectionError::Store(err.to_string())
    }
}

impl From<LockError> for CollectionError {
    fn from(err: LockError) -> Self {
        CollectionError::Store(err.to_string())
    }
}

impl CollectionError {
    /// Map this error to an HTTP status code.
    pub fn status_code(&self) -> u16 {
        match self {
            CollectionError::Unauthorized(_) => 401,
            CollectionError::Validation(_) => 400,
            CollectionError::NotFound(_) => 404,
            CollectionError::Store(_) => 500,
        }
    }
}
