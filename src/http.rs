//! HTTP transport for the Collection Service.
//!
//! Requires the `http` feature. Uses axum for routing.
//!
//! ## Routes
//!
//! - `POST /auth/login`: `{password}` → `{token, expiresAt}`.
//! - `POST /auth/logout`: revoke the presented token.
//! - `GET /movies`: active movies.
//! - `POST /movies`: `{name, genre}` → 201 with the created movie.
//! - `GET /movies/:id`: one movie, deleted or not.
//! - `PATCH /movies/:id`: merge-patch `{seen?, isDeleted?}`.
//! - `DELETE /movies/:id`: hard delete.
//! - `GET /health`: liveness, no session required.
//!
//! Every `/movies` route expects `Authorization: Bearer <token>`; without a
//! valid one it answers 401 `{"error":"Unauthorized"}`.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use crate::auth::{AuthError, Session};
use crate::collection::{CollectionError, CollectionService};
use crate::lock::LockManager;
use crate::model::ModelStore;
use crate::movie::{MovieId, MoviePatch, NewMovie};

type Shared<S, L> = Arc<CollectionService<S, L>>;

#[derive(Debug, Deserialize)]
struct LoginBody {
    #[serde(default)]
    password: String,
}

/// Build an axum `Router` serving the watch list API.
pub fn router<S, L>(service: Shared<S, L>) -> Router
where
    S: ModelStore + 'static,
    L: LockManager + 'static,
{
    Router::new()
        .route("/health", get(health_handler))
        .route("/auth/login", post(login_handler::<S, L>))
        .route("/auth/logout", post(logout_handler::<S, L>))
        .route(
            "/movies",
            get(list_handler::<S, L>).post(create_handler::<S, L>),
        )
        .route(
            "/movies/:id",
            get(get_handler::<S, L>)
                .patch(update_handler::<S, L>)
                .delete(delete_handler::<S, L>),
        )
        .with_state(service)
}

/// Serve the API over HTTP at the given address (e.g. `"0.0.0.0:3000"`).
pub async fn serve<S, L>(service: Shared<S, L>, addr: &str) -> Result<(), std::io::Error>
where
    S: ModelStore + 'static,
    L: LockManager + 'static,
{
    let app = router(service);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "watchlist listening");
    axum::serve(listener, app).await
}

async fn health_handler() -> impl IntoResponse {
    Json(json!({ "ok": true }))
}

async fn login_handler<S, L>(
    State(service): State<Shared<S, L>>,
    body: Result<Json<LoginBody>, JsonRejection>,
) -> Response
where
    S: ModelStore + 'static,
    L: LockManager + 'static,
{
    let password = body.map(|Json(b)| b.password).unwrap_or_default();
    match service.gate().authenticate(&password) {
        Ok(token) => {
            info!("session issued");
            (StatusCode::OK, Json(token)).into_response()
        }
        Err(AuthError::BadCredential) => {
            warn!("login rejected");
            error_response(StatusCode::UNAUTHORIZED, "Incorrect password")
        }
        Err(e) => {
            tracing::error!(error = %e, "login failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong")
        }
    }
}

async fn logout_handler<S, L>(State(service): State<Shared<S, L>>, headers: HeaderMap) -> Response
where
    S: ModelStore + 'static,
    L: LockManager + 'static,
{
    let session = session_from_headers(&headers);
    match service.gate().revoke(&session) {
        Ok(()) => (StatusCode::OK, Json(json!({ "message": "Signed out" }))).into_response(),
        Err(e) => auth_failure(e),
    }
}

async fn list_handler<S, L>(State(service): State<Shared<S, L>>, headers: HeaderMap) -> Response
where
    S: ModelStore + 'static,
    L: LockManager + 'static,
{
    let session = session_from_headers(&headers);
    match blocking(service, move |svc| svc.list_active(&session)).await {
        Ok(movies) => (StatusCode::OK, Json(movies)).into_response(),
        Err(e) => collection_error(e, "fetch movies"),
    }
}

async fn create_handler<S, L>(
    State(service): State<Shared<S, L>>,
    headers: HeaderMap,
    body: Result<Json<NewMovie>, JsonRejection>,
) -> Response
where
    S: ModelStore + 'static,
    L: LockManager + 'static,
{
    let session = session_from_headers(&headers);
    let new = match body {
        Ok(Json(new)) => new,
        Err(rejection) => return bad_body(&service, &session, rejection),
    };
    match blocking(service, move |svc| svc.create(&session, &new)).await {
        Ok(movie) => (StatusCode::CREATED, Json(movie)).into_response(),
        Err(e) => collection_error(e, "create movie"),
    }
}

async fn get_handler<S, L>(
    State(service): State<Shared<S, L>>,
    Path(raw_id): Path<String>,
    headers: HeaderMap,
) -> Response
where
    S: ModelStore + 'static,
    L: LockManager + 'static,
{
    let session = session_from_headers(&headers);
    let id = match parse_id(&service, &session, &raw_id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    match blocking(service, move |svc| svc.get(&session, id)).await {
        Ok(movie) => (StatusCode::OK, Json(movie)).into_response(),
        Err(e) => collection_error(e, "fetch movie"),
    }
}

async fn update_handler<S, L>(
    State(service): State<Shared<S, L>>,
    Path(raw_id): Path<String>,
    headers: HeaderMap,
    body: Result<Json<MoviePatch>, JsonRejection>,
) -> Response
where
    S: ModelStore + 'static,
    L: LockManager + 'static,
{
    let session = session_from_headers(&headers);
    let id = match parse_id(&service, &session, &raw_id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let patch = match body {
        Ok(Json(patch)) => patch,
        Err(rejection) => return bad_body(&service, &session, rejection),
    };
    match blocking(service, move |svc| svc.update(&session, id, &patch)).await {
        Ok(movie) => (StatusCode::OK, Json(movie)).into_response(),
        Err(e) => collection_error(e, "update movie"),
    }
}

async fn delete_handler<S, L>(
    State(service): State<Shared<S, L>>,
    Path(raw_id): Path<String>,
    headers: HeaderMap,
) -> Response
where
    S: ModelStore + 'static,
    L: LockManager + 'static,
{
    let session = session_from_headers(&headers);
    let id = match parse_id(&service, &session, &raw_id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    match blocking(service, move |svc| svc.hard_delete(&session, id)).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "message": "Movie deleted successfully" })),
        )
            .into_response(),
        Err(e) => collection_error(e, "delete movie"),
    }
}

/// Store calls may block (SQLite, per-id locks); keep them off the reactor.
async fn blocking<S, L, T, F>(service: Shared<S, L>, f: F) -> Result<T, CollectionError>
where
    S: ModelStore + 'static,
    L: LockManager + 'static,
    T: Send + 'static,
    F: FnOnce(&CollectionService<S, L>) -> Result<T, CollectionError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || f(&service))
        .await
        .map_err(|e| CollectionError::Store(e.to_string()))?
}

/// Unparseable ids cannot name a stored movie: 404 once the caller is known.
fn parse_id<S, L>(service: &Shared<S, L>, session: &Session, raw: &str) -> Result<MovieId, Response>
where
    S: ModelStore + 'static,
    L: LockManager + 'static,
{
    service.gate().verify(session).map_err(auth_failure)?;
    raw.parse::<MovieId>().map_err(|_| {
        warn!(id = raw, "malformed movie id");
        error_response(StatusCode::NOT_FOUND, "Movie not found")
    })
}

fn bad_body<S, L>(service: &Shared<S, L>, session: &Session, rejection: JsonRejection) -> Response
where
    S: ModelStore + 'static,
    L: LockManager + 'static,
{
    if let Err(e) = service.gate().verify(session) {
        return auth_failure(e);
    }
    warn!(reason = %rejection.body_text(), "malformed request body");
    error_response(StatusCode::BAD_REQUEST, &rejection.body_text())
}

fn collection_error(err: CollectionError, action: &str) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    match err {
        CollectionError::Store(_) => error_response(status, &format!("Failed to {}", action)),
        other => error_response(status, &other.to_string()),
    }
}

fn auth_failure(err: AuthError) -> Response {
    match err {
        AuthError::Internal(msg) => {
            tracing::error!(error = %msg, "session check failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong")
        }
        _ => error_response(StatusCode::UNAUTHORIZED, "Unauthorized"),
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

/// Extract session variables from HTTP headers.
///
/// All headers are lowercased and included as session variables.
fn session_from_headers(headers: &HeaderMap) -> Session {
    let mut vars = HashMap::new();
    for (name, value) in headers.iter() {
        if let Ok(v) = value.to_str() {
            vars.insert(name.as_str().to_string(), v.to_string());
        }
    }
    Session::from_map(vars)
}
