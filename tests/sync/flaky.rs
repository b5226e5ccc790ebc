//! Failed round trips leave the cache exactly as it was.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use watchlist::client::{
    ApiError, MovieApi, ServiceApi, SyncController, SyncError, ADD_FAILED, DELETE_FAILED,
    LOAD_FAILED, UPDATE_FAILED,
};
use watchlist::{InMemoryLockManager, InMemoryModelStore, Movie, MovieId, MoviePatch, NewMovie};

use crate::service_api;

/// Forwards to a real service until switched off, then fails every call
/// without forwarding.
struct Flaky {
    inner: ServiceApi<InMemoryModelStore, InMemoryLockManager>,
    down: Arc<AtomicBool>,
}

impl Flaky {
    fn check(&self) -> Result<(), ApiError> {
        if self.down.load(Ordering::SeqCst) {
            return Err(ApiError::Status {
                status: 500,
                message: "Failed to update movie".into(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl MovieApi for Flaky {
    async fn list(&self) -> Result<Vec<Movie>, ApiError> {
        self.check()?;
        self.inner.list().await
    }
    async fn create(&self, new: &NewMovie) -> Result<Movie, ApiError> {
        self.check()?;
        self.inner.create(new).await
    }
    async fn update(&self, id: MovieId, patch: &MoviePatch) -> Result<Movie, ApiError> {
        self.check()?;
        self.inner.update(id, patch).await
    }
}

async fn loaded() -> (SyncController<Flaky>, Arc<AtomicBool>) {
    let (_, inner) = service_api();
    let down = Arc::new(AtomicBool::new(false));
    let mut sync = SyncController::new(Flaky {
        inner,
        down: Arc::clone(&down),
    });
    for (name, genre) in [("Heat", "Crime"), ("Alien", "Horror"), ("Up", "Animation")] {
        sync.add(name, genre).await.unwrap();
    }
    sync.toggle_group();
    sync.shuffle();
    sync.dismiss_notice();
    (sync, down)
}

#[tokio::test]
async fn failed_mutations_leave_cache_untouched() {
    let (mut sync, down) = loaded().await;
    let before = sync.state().clone();
    let target = before.movies[1].id;
    down.store(true, Ordering::SeqCst);

    let err = sync.add("Cats", "Musical").await.unwrap_err();
    assert!(matches!(err, SyncError::Api(_)));
    assert_eq!(sync.state().error.as_deref(), Some(ADD_FAILED));
    assert_eq!(sync.state().movies, before.movies);
    assert_eq!(sync.state().view, before.view);
    assert!(!sync.state().adding);
    assert_eq!(sync.state().notice, None);

    sync.toggle_seen(target).await.unwrap_err();
    assert_eq!(sync.state().error.as_deref(), Some(UPDATE_FAILED));
    assert_eq!(sync.state().movies, before.movies);

    sync.soft_delete(target).await.unwrap_err();
    assert_eq!(sync.state().error.as_deref(), Some(DELETE_FAILED));
    assert_eq!(sync.state().movies, before.movies);
    assert_eq!(sync.state().view, before.view);
    assert!(sync.state().pending.is_empty());

    sync.load().await.unwrap_err();
    assert_eq!(sync.state().error.as_deref(), Some(LOAD_FAILED));
    assert_eq!(sync.state().movies, before.movies);
    assert!(!sync.state().loading);
}

#[tokio::test]
async fn recovery_after_an_outage() {
    let (mut sync, down) = loaded().await;
    let target = sync.movies()[0].id;

    down.store(true, Ordering::SeqCst);
    sync.toggle_seen(target).await.unwrap_err();

    down.store(false, Ordering::SeqCst);
    let seen = sync.toggle_seen(target).await.unwrap();
    assert!(seen.seen);

    sync.load().await.unwrap();
    assert_eq!(sync.state().error, None);
    assert!(sync.state().movie(target).unwrap().seen);
}
