//! Happy paths against a real service.

use rand::rngs::StdRng;
use rand::SeedableRng;
use watchlist::client::{Rendered, SyncController, SyncError, ADD_SUCCEEDED, MISSING_FIELDS};

use crate::service_api;

#[tokio::test]
async fn load_add_toggle_and_delete() {
    let (service, api) = service_api();
    let mut sync = SyncController::new(api);
    sync.load().await.unwrap();
    assert!(sync.movies().is_empty());

    let heat = sync.add("Heat", "Crime").await.unwrap();
    let alien = sync.add("Alien", "Horror").await.unwrap();
    assert_eq!(sync.state().notice.as_deref(), Some(ADD_SUCCEEDED));
    assert_eq!(sync.render().names(), ["Alien", "Heat"]);

    let seen = sync.toggle_seen(heat.id).await.unwrap();
    assert!(seen.seen);
    assert_eq!(
        sync.state().movie(heat.id),
        Some(&seen),
        "cache holds the server record"
    );
    let unseen = sync.toggle_seen(heat.id).await.unwrap();
    assert!(!unseen.seen);

    sync.soft_delete(alien.id).await.unwrap();
    assert_eq!(sync.render().names(), ["Heat"]);

    let stored = service.movies().load(alien.id).unwrap().unwrap();
    assert!(stored.data.is_deleted);

    sync.load().await.unwrap();
    let ids: Vec<_> = sync.movies().iter().map(|m| m.id).collect();
    assert_eq!(ids, [heat.id]);
}

#[tokio::test]
async fn blank_input_never_reaches_the_service() {
    let (service, api) = service_api();
    let mut sync = SyncController::new(api);

    let err = sync.add("Heat", "   ").await.unwrap_err();
    assert_eq!(err, SyncError::Invalid(MISSING_FIELDS.into()));
    assert!(service.movies().all().unwrap().is_empty());
}

#[tokio::test]
async fn grouped_shuffled_view() {
    let (_, api) = service_api();
    let mut sync = SyncController::with_rng(api, StdRng::seed_from_u64(11));
    for (name, genre) in [("A", "X"), ("B", "Y"), ("C", "X"), ("D", "Y"), ("E", "Z")] {
        sync.add(name, genre).await.unwrap();
    }

    sync.toggle_group();
    let Rendered::Grouped(groups) = sync.render() else {
        panic!("expected groups");
    };
    let genres: Vec<&str> = groups.iter().map(|g| g.genre).collect();
    assert_eq!(genres, ["X", "Y", "Z"]);

    sync.shuffle();
    assert!(sync.state().view.grouped, "shuffle keeps grouping");
    let shuffled = sync.render();
    assert_eq!(shuffled.len(), 5);
    let mut names = shuffled.names();
    names.sort();
    assert_eq!(names, ["A", "B", "C", "D", "E"]);

    // Added after the shuffle: lands at the end of its genre.
    sync.add("F", "X").await.unwrap();
    let Rendered::Grouped(groups) = sync.render() else {
        panic!("expected groups");
    };
    let x = groups.iter().find(|g| g.genre == "X").unwrap();
    assert_eq!(x.movies.last().unwrap().name, "F");

    sync.toggle_sort();
    assert!(!sync.state().view.is_shuffled());
}
