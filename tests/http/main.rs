//! REST surface integration tests.
//!
//! Starts an axum server on port 0 and exercises it with reqwest.
#![cfg(feature = "http")]

use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::{json, Value};
use watchlist::{
    http, AuthError, AuthGate, CollectionService, InMemoryModelStore, Session, SessionToken,
    SharedPasswordGate,
};

const PASSWORD: &str = "movienight";

/// Bind to port 0 and return the base URL.
async fn start_server() -> String {
    start_server_with(Arc::new(SharedPasswordGate::new(PASSWORD))).await
}

async fn start_server_with(gate: Arc<dyn AuthGate>) -> String {
    let service = Arc::new(CollectionService::new(InMemoryModelStore::new(), gate));
    let app = http::router(service);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

async fn login(client: &reqwest::Client, base: &str) -> String {
    let resp = client
        .post(format!("{base}/auth/login"))
        .json(&json!({ "password": PASSWORD }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert!(body["expiresAt"].is_string());
    body["token"].as_str().unwrap().to_string()
}

async fn create(client: &reqwest::Client, base: &str, token: &str, name: &str, genre: &str) -> Value {
    let resp = client
        .post(format!("{base}/movies"))
        .bearer_auth(token)
        .json(&json!({ "name": name, "genre": genre }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    resp.json().await.unwrap()
}

#[tokio::test]
async fn health_needs_no_session() {
    let base = start_server().await;
    let resp = reqwest::get(format!("{base}/health")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["ok"], true);
}

#[tokio::test]
async fn wrong_password_is_refused() {
    let base = start_server().await;
    let resp = reqwest::Client::new()
        .post(format!("{base}/auth/login"))
        .json(&json!({ "password": "popcorn" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Incorrect password" }));
}

#[tokio::test]
async fn every_movie_route_requires_a_session() {
    let base = start_server().await;
    let client = reqwest::Client::new();
    let id = watchlist::MovieId::new();

    let requests = [
        client.get(format!("{base}/movies")),
        client
            .post(format!("{base}/movies"))
            .json(&json!({ "name": "Heat", "genre": "Crime" })),
        client.post(format!("{base}/movies")).body("not json"),
        client.get(format!("{base}/movies/{id}")),
        client
            .patch(format!("{base}/movies/{id}"))
            .json(&json!({ "seen": true })),
        client.delete(format!("{base}/movies/{id}")),
        client.get(format!("{base}/movies/garbage")).bearer_auth("forged"),
    ];
    for request in requests {
        let resp = request.send().await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body, json!({ "error": "Unauthorized" }));
    }
}

#[tokio::test]
async fn create_list_patch_and_soft_delete() {
    let base = start_server().await;
    let client = reqwest::Client::new();
    let token = login(&client, &base).await;

    let inception = create(&client, &base, &token, "Inception", "Sci-Fi").await;
    assert_eq!(inception["name"], "Inception");
    assert_eq!(inception["genre"], "Sci-Fi");
    assert_eq!(inception["seen"], false);
    assert_eq!(inception["isDeleted"], false);
    let id = inception["id"].as_str().unwrap().to_string();

    let heat = create(&client, &base, &token, "Heat", "Crime").await;

    let listed: Value = client
        .get(format!("{base}/movies"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listed, json!([inception.clone(), heat.clone()]));

    let resp = client
        .patch(format!("{base}/movies/{id}"))
        .bearer_auth(&token)
        .json(&json!({ "seen": true }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let seen: Value = resp.json().await.unwrap();
    assert_eq!(seen["seen"], true);
    assert_eq!(seen["isDeleted"], false);

    let resp = client
        .patch(format!("{base}/movies/{id}"))
        .bearer_auth(&token)
        .json(&json!({ "isDeleted": true }))
        .send()
        .await
        .unwrap();
    let deleted: Value = resp.json().await.unwrap();
    assert_eq!(deleted["seen"], true);
    assert_eq!(deleted["isDeleted"], true);

    let listed: Value = client
        .get(format!("{base}/movies"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listed, json!([heat]));

    let fetched: Value = client
        .get(format!("{base}/movies/{id}"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched["isDeleted"], true);
}

#[tokio::test]
async fn missing_fields_are_a_bad_request() {
    let base = start_server().await;
    let client = reqwest::Client::new();
    let token = login(&client, &base).await;

    for body in [
        json!({ "name": "Heat" }),
        json!({ "genre": "Crime" }),
        json!({ "name": "", "genre": "Crime" }),
    ] {
        let resp = client
            .post(format!("{base}/movies"))
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body, json!({ "error": "Name and genre are required" }));
    }
}

#[tokio::test]
async fn unknown_and_malformed_ids_are_not_found() {
    let base = start_server().await;
    let client = reqwest::Client::new();
    let token = login(&client, &base).await;
    let missing = watchlist::MovieId::new();

    for path in [format!("/movies/{missing}"), "/movies/not-a-uuid".to_string()] {
        let resp = client
            .get(format!("{base}{path}"))
            .bearer_auth(&token)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body, json!({ "error": "Movie not found" }));

        let resp = client
            .patch(format!("{base}{path}"))
            .bearer_auth(&token)
            .json(&json!({ "seen": true }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = client
            .delete(format!("{base}{path}"))
            .bearer_auth(&token)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}

#[tokio::test]
async fn hard_delete_removes_the_record() {
    let base = start_server().await;
    let client = reqwest::Client::new();
    let token = login(&client, &base).await;
    let movie = create(&client, &base, &token, "Heat", "Crime").await;
    let id = movie["id"].as_str().unwrap();

    let resp = client
        .delete(format!("{base}/movies/{id}"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "message": "Movie deleted successfully" }));

    let resp = client
        .get(format!("{base}/movies/{id}"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn logout_revokes_the_token() {
    let base = start_server().await;
    let client = reqwest::Client::new();
    let token = login(&client, &base).await;

    let resp = client
        .post(format!("{base}/auth/logout"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .get(format!("{base}/movies"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

/// A gate whose session table is unusable.
struct PoisonedGate;

impl AuthGate for PoisonedGate {
    fn authenticate(&self, _: &str) -> Result<SessionToken, AuthError> {
        Err(AuthError::Internal("session map poisoned".into()))
    }
    fn verify(&self, _: &Session) -> Result<(), AuthError> {
        Err(AuthError::Internal("session map poisoned".into()))
    }
    fn revoke(&self, _: &Session) -> Result<(), AuthError> {
        Err(AuthError::Internal("session map poisoned".into()))
    }
}

#[tokio::test]
async fn session_store_failures_are_server_errors() {
    let base = start_server_with(Arc::new(PoisonedGate)).await;
    let client = reqwest::Client::new();

    let resp = client.get(format!("{base}/movies")).bearer_auth("t").send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Failed to fetch movies" }));

    let resp = client
        .get(format!("{base}/movies/not-an-id"))
        .bearer_auth("t")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let resp = client
        .post(format!("{base}/movies"))
        .bearer_auth("t")
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let resp = client
        .post(format!("{base}/auth/logout"))
        .bearer_auth("t")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
