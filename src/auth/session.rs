//! Request-scoped session variables.

use std::collections::HashMap;

const AUTHORIZATION: &str = "authorization";
const SESSION_TOKEN: &str = "x-session-token";

/// Variables attached to one incoming request.
///
/// Over HTTP these are the lowercased request headers. The session token
/// is read from `Authorization: Bearer <token>`, falling back to
/// `x-session-token`.
#[derive(Debug, Clone, Default)]
pub struct Session {
    variables: HashMap<String, String>,
}

impl Session {
    /// Create an empty (anonymous) session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session from a map of variables.
    pub fn from_map(variables: HashMap<String, String>) -> Self {
        Self { variables }
    }

    /// Shorthand for a session carrying just a bearer token.
    pub fn with_token(token: impl AsRef<str>) -> Self {
        let mut session = Self::new();
        session.set(AUTHORIZATION, format!("Bearer {}", token.as_ref()));
        session
    }

    /// The session token, if the request carried one.
    pub fn token(&self) -> Option<&str> {
        if let Some(value) = self.get(AUTHORIZATION) {
            let mut parts = value.splitn(2, ' ');
            if let (Some(scheme), Some(token)) = (parts.next(), parts.next()) {
                if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() {
                    return Some(token.trim());
                }
            }
        }
        self.get(SESSION_TOKEN).filter(|t| !t.is_empty())
    }

    /// Get a session variable by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(|v| v.as_str())
    }

    /// Set a session variable.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(key.into(), value.into());
    }
}
