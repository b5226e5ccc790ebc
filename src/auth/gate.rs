use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AuthError, Session};

pub const DEFAULT_SESSION_TTL_DAYS: i64 = 30;

/// An issued session credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Exchanges credentials for session tokens and checks them on every call.
pub trait AuthGate: Send + Sync {
    /// Trade the shared password for a fresh token.
    fn authenticate(&self, password: &str) -> Result<SessionToken, AuthError>;

    /// Accept or refuse the caller behind `session`.
    fn verify(&self, session: &Session) -> Result<(), AuthError>;

    /// Forget the token carried by `session` (sign-out).
    fn revoke(&self, session: &Session) -> Result<(), AuthError>;
}

type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Single shared credential; tokens live in memory for a fixed TTL.
pub struct SharedPasswordGate {
    password: String,
    ttl: Duration,
    sessions: RwLock<HashMap<String, DateTime<Utc>>>,
    clock: Clock,
}

impl SharedPasswordGate {
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            password: password.into(),
            ttl: Duration::days(DEFAULT_SESSION_TTL_DAYS),
            sessions: RwLock::new(HashMap::new()),
            clock: Arc::new(Utc::now),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Replace the wall clock (tests drive expiry with this).
    pub fn with_clock<F>(mut self, clock: F) -> Self
    where
        F: Fn() -> DateTime<Utc> + Send + Sync + 'static,
    {
        self.clock = Arc::new(clock);
        self
    }

    /// Number of live (unexpired) sessions.
    #[cfg(test)]
    fn active_sessions(&self) -> Result<usize, AuthError> {
        let now = (self.clock)();
        let sessions = self
            .sessions
            .read()
            .map_err(|_| AuthError::Internal("session map poisoned".into()))?;
        Ok(sessions.values().filter(|exp| **exp > now).count())
    }
}

impl AuthGate for SharedPasswordGate {
    fn authenticate(&self, password: &str) -> Result<SessionToken, AuthError> {
        if password.is_empty() || !same_secret(password, &self.password) {
            return Err(AuthError::BadCredential);
        }

        let now = (self.clock)();
        let expires_at = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AuthError::Internal(format!("session ttl {} overflows", self.ttl)))?;
        let token = SessionToken {
            token: Uuid::new_v4().simple().to_string(),
            expires_at,
        };

        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| AuthError::Internal("session map poisoned".into()))?;
        sessions.retain(|_, exp| *exp > now);
        sessions.insert(token.token.clone(), token.expires_at);
        Ok(token)
    }

    fn verify(&self, session: &Session) -> Result<(), AuthError> {
        let token = session.token().ok_or(AuthError::MissingToken)?;
        let sessions = self
            .sessions
            .read()
            .map_err(|_| AuthError::Internal("session map poisoned".into()))?;
        let expires_at = sessions.get(token).ok_or(AuthError::InvalidToken)?;
        if *expires_at <= (self.clock)() {
            return Err(AuthError::Expired);
        }
        Ok(())
    }

    fn revoke(&self, session: &Session) -> Result<(), AuthError> {
        let token = session.token().ok_or(AuthError::MissingToken)?;
        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| AuthError::Internal("session map poisoned".into()))?;
        sessions
            .remove(token)
            .map(|_| ())
            .ok_or(AuthError::InvalidToken)
    }
}

/// Compare without stopping at the first differing byte.
fn same_secret(given: &str, expected: &str) -> bool {
    given.len() == expected.len()
        && given
            .bytes()
            .zip(expected.bytes())
            .fold(0u8, |diff, (a, b)| diff | (a ^ b))
            == 0
}
