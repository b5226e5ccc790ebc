//! The movie record and its request shapes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::Model;

/// Opaque, immutable movie identifier. Serialized as a plain string.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovieId(Uuid);

impl MovieId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for MovieId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MovieId({})", &self.0.to_string()[..8])
    }
}

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MovieId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// A watch-list entry.
///
/// `name` and `genre` are fixed at creation. `seen` toggles freely;
/// `is_deleted` only ever goes from `false` to `true`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: MovieId,
    pub name: String,
    pub genre: String,
    pub seen: bool,
    pub is_deleted: bool,
}

impl Movie {
    /// Build a fresh, unseen, active record. Callers validate first.
    pub(crate) fn create(name: String, genre: String) -> Self {
        Self {
            id: MovieId::new(),
            name,
            genre,
            seen: false,
            is_deleted: false,
        }
    }

    pub fn is_active(&self) -> bool {
        !self.is_deleted
    }
}

impl Model for Movie {
    const COLLECTION: &'static str = "movies";

    fn id(&self) -> String {
        self.id.to_string()
    }
}

/// Body of a create request. Both fields are required and non-blank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMovie {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
}

impl NewMovie {
    pub fn new(name: impl Into<String>, genre: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            genre: Some(genre.into()),
        }
    }

    /// Trimmed `(name, genre)`, or `None` if either is absent or blank.
    pub fn validated(&self) -> Option<(String, String)> {
        let name = self.name.as_deref().map(str::trim).unwrap_or_default();
        let genre = self.genre.as_deref().map(str::trim).unwrap_or_default();
        if name.is_empty() || genre.is_empty() {
            return None;
        }
        Some((name.to_string(), genre.to_string()))
    }
}

/// Merge-patch over the mutable fields. Absent fields are left unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoviePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seen: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_deleted: Option<bool>,
}

impl MoviePatch {
    pub fn seen(seen: bool) -> Self {
        Self {
            seen: Some(seen),
            is_deleted: None,
        }
    }

    pub fn soft_delete() -> Self {
        Self {
            seen: None,
            is_deleted: Some(true),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_none() && self.is_deleted.is_none()
    }

    /// Apply to `movie`. `isDeleted: false` never revives a deleted record.
    pub fn apply(&self, movie: &Movie) -> Movie {
        let mut next = movie.clone();
        if let Some(seen) = self.seen {
            next.seen = seen;
        }
        if let Some(deleted) = self.is_deleted {
            next.is_deleted = movie.is_deleted || deleted;
        }
        next
    }
}
