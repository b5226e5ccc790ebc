use std::fmt;

/// Why a caller was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The request carried no session token.
    MissingToken,
    /// The token was never issued or has been revoked.
    InvalidToken,
    /// The token was issued but its lifetime has elapsed.
    Expired,
    /// The presented password did not match the shared credential.
    BadCredential,
    /// Session bookkeeping failed (poisoned lock).
    Internal(String),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::MissingToken => write!(f, "missing session token"),
            AuthError::InvalidToken => write!(f, "invalid session token"),
            AuthError::Expired => write!(f, "session expired"),
            AuthError::BadCredential => write!(f, "incorrect password"),
            AuthError::Internal(msg) => write!(f, "session store error: {}", msg),
        }
    }
}

impl std::error::Error for AuthError {}
