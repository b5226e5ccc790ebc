//! Auth Gate - the shared-password session check in front of every
//! Collection Service call.
//!
//! Credentials are exchanged once for an opaque [`SessionToken`]; each
//! request then carries a [`Session`] built from its headers. Nothing here
//! is global: the token travels with the request.

mod error;
mod gate;
mod session;

pub use error::AuthError;
pub use gate::{AuthGate, SessionToken, SharedPasswordGate, DEFAULT_SESSION_TTL_DAYS};
pub use session::Session;
