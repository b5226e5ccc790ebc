//! Collection Service - the authoritative CRUD + soft-delete API over movies.
//!
//! Every operation checks the caller's [`Session`](crate::Session) with the
//! configured [`AuthGate`](crate::AuthGate) before it reads or writes
//! anything. Writes go through a per-id lock so a merge-patch is always
//! applied to the latest stored value.

mod error;
mod repository;
mod service;

pub use error::CollectionError;
pub use repository::MovieRepository;
pub use service::CollectionService;
