//! Client side of the watch list: the View-State Engine, the client state
//! machine and the Sync Controller that keeps the cache in step with the
//! Collection Service.
//!
//! ```ignore
//! let mut sync = SyncController::new(HttpApi::new("http://localhost:3000", token));
//! sync.load().await?;
//! sync.add("Inception", "Sci-Fi").await?;
//! sync.toggle_group();
//! let rendered = sync.render();
//! ```

mod api;
mod state;
mod sync;
mod view;

#[cfg(feature = "http")]
pub use api::HttpApi;
pub use api::{ApiError, MovieApi, ServiceApi};
pub use state::{
    reduce, ClientState, Event, ADD_FAILED, ADD_SUCCEEDED, DELETE_FAILED, LOAD_FAILED,
    UPDATE_FAILED,
};
pub use sync::{SyncController, SyncError, MISSING_FIELDS};
pub use view::{compare_names, render, shuffle_order, GenreGroup, Rendered, SortDirection, ViewState};
