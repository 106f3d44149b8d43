use chrono::DateTime;
use chrono::Utc;

use crate::user::models::EmailAddress;
use crate::user::models::PersonName;
use crate::user::models::UserId;
use crate::user::models::Username;

/// A persisted refresh token: the rotation unit for re-authentication.
///
/// Rows are revoked, never deleted, so a replayed token is distinguishable
/// from one that never existed.
#[derive(Debug, Clone)]
pub struct RefreshToken {
    /// Opaque random token string, unique
    pub token: String,
    pub user_id: UserId,
    pub expires_at: DateTime<Utc>,
    pub revoked: bool,
    pub created_at: DateTime<Utc>,
}

impl RefreshToken {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Usable iff not revoked and not yet expired.
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        !self.revoked && !self.is_expired(now)
    }
}

/// Validated registration command.
#[derive(Debug)]
pub struct RegisterCommand {
    pub username: Username,
    pub email: EmailAddress,
    pub password: String,
    pub first_name: Option<PersonName>,
    pub last_name: Option<PersonName>,
}

/// Login credentials as presented by the caller.
#[derive(Debug)]
pub struct Credentials {
    pub username_or_email: String,
    pub password: String,
}

/// Tokens and user summary returned by register, login and refresh.
#[derive(Debug, Clone)]
pub struct AuthenticatedSession {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    /// Access-token lifetime in seconds
    pub expires_in: i64,
    pub user_id: UserId,
    pub username: String,
    pub email: String,
    pub roles: Vec<String>,
}
