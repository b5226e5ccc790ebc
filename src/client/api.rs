//! The seam between the Sync Controller and a Collection Service.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::auth::Session;
use crate::collection::{CollectionError, CollectionService};
use crate::lock::LockManager;
use crate::model::ModelStore;
use crate::movie::{Movie, MovieId, MoviePatch, NewMovie};

/// Failure of one remote call, as the client sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The service answered with an error status.
    Status { status: u16, message: String },
    /// The request never completed.
    Transport(String),
    /// The response body was not what we expected.
    Decode(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Status { status, message } => write!(f, "{} ({})", message, status),
            ApiError::Transport(msg) => write!(f, "transport error: {}", msg),
            ApiError::Decode(msg) => write!(f, "decode error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<CollectionError> for ApiError {
    fn from(err: CollectionError) -> Self {
        ApiError::Status {
            status: err.status_code(),
            message: err.to_string(),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// The calls the client makes.
#[async_trait]
pub trait MovieApi: Send + Sync {
    async fn list(&self) -> Result<Vec<Movie>, ApiError>;
    async fn create(&self, new: &NewMovie) -> Result<Movie, ApiError>;
    async fn update(&self, id: MovieId, patch: &MoviePatch) -> Result<Movie, ApiError>;
}

/// In-process transport: calls a `CollectionService` directly with a
/// fixed session.
///
/// The service methods block (store I/O and per-id locks) and run inline on
/// the polling task. Use it in tests and single-user embedding; a server
/// should go through `http::router`, which moves that work to
/// `spawn_blocking`.
pub struct ServiceApi<S, L> {
    service: Arc<CollectionService<S, L>>,
    session: Session,
}

impl<S: ModelStore, L: LockManager> ServiceApi<S, L> {
    pub fn new(service: Arc<CollectionService<S, L>>, session: Session) -> Self {
        Self { service, session }
    }
}

#[async_trait]
impl<S: ModelStore, L: LockManager> MovieApi for ServiceApi<S, L> {
    async fn list(&self) -> Result<Vec<Movie>, ApiError> {
        Ok(self.service.list_active(&self.session)?)
    }

    async fn create(&self, new: &NewMovie) -> Result<Movie, ApiError> {
        Ok(self.service.create(&self.session, new)?)
    }

    async fn update(&self, id: MovieId, patch: &MoviePatch) -> Result<Movie, ApiError> {
        Ok(self.service.update(&self.session, id, patch)?)
    }
}

#[cfg(feature = "http")]
pub use remote::HttpApi;

#[cfg(feature = "http")]
mod remote {
    use super::*;
    use serde::de::DeserializeOwned;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct ErrorBody {
        error: String,
    }

    /// REST transport with a bearer token.
    pub struct HttpApi {
        client: reqwest::Client,
        base_url: String,
        token: String,
    }

    impl HttpApi {
        /// `base_url` without a trailing slash, e.g. `http://127.0.0.1:3000`.
        pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
            Self {
                client: reqwest::Client::new(),
                base_url: base_url.into().trim_end_matches('/').to_string(),
                token: token.into(),
            }
        }

        fn url(&self, path: &str) -> String {
            format!("{}{}", self.base_url, path)
        }

        async fn send<T: DeserializeOwned>(
            &self,
            request: reqwest::RequestBuilder,
        ) -> Result<T, ApiError> {
            let response = request
                .bearer_auth(&self.token)
                .send()
                .await
                .map_err(|e| ApiError::Transport(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                let message = response
                    .json::<ErrorBody>()
                    .await
                    .map(|b| b.error)
                    .unwrap_or_else(|_| status.to_string());
                return Err(ApiError::Status {
                    status: status.as_u16(),
                    message,
                });
            }
            response
                .json::<T>()
                .await
                .map_err(|e| ApiError::Decode(e.to_string()))
        }
    }

    #[async_trait]
    impl MovieApi for HttpApi {
        async fn list(&self) -> Result<Vec<Movie>, ApiError> {
            self.send(self.client.get(self.url("/movies"))).await
        }

        async fn create(&self, new: &NewMovie) -> Result<Movie, ApiError> {
            self.send(self.client.post(self.url("/movies")).json(new))
                .await
        }

        async fn update(&self, id: MovieId, patch: &MoviePatch) -> Result<Movie, ApiError> {
            let path = format!("/movies/{}", id);
            self.send(self.client.patch(self.url(&path)).json(patch))
                .await
        }
    }
}
