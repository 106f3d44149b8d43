use thiserror::Error;

use crate::user::errors::UserError;

/// Closed set of authentication failures.
///
/// Every variant maps to a fixed HTTP status at the boundary; all are
/// recoverable by the caller. Infrastructure faults ride in `Database`.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("User with {field} '{value}' already exists")]
    DuplicateUser { field: &'static str, value: String },

    /// The message never reveals whether the identifier or the password was
    /// wrong.
    #[error("Invalid username/email or password")]
    BadCredentials,

    /// Malformed, unsigned, wrong-claims, unknown or revoked token.
    #[error("{0}")]
    InvalidToken(String),

    /// Distinct from `InvalidToken` so clients can decide whether a refresh
    /// flow is worth retrying.
    #[error("{0}")]
    TokenExpired(String),

    /// A referenced user vanished after authentication succeeded.
    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Password error: {0}")]
    Password(#[from] auth::PasswordError),

    #[error("Token error: {0}")]
    Token(#[from] auth::TokenError),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<UserError> for AuthError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::UsernameAlreadyExists(value) => AuthError::DuplicateUser {
                field: "username",
                value,
            },
            UserError::EmailAlreadyExists(value) => AuthError::DuplicateUser {
                field: "email",
                value,
            },
            UserError::NotFound(id) => AuthError::UserNotFound(id),
            UserError::Password(e) => AuthError::Password(e),
            other => AuthError::Database(other.to_string()),
        }
    }
}
