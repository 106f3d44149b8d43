use async_trait::async_trait;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::AuthenticatedSession;
use crate::domain::auth::models::Credentials;
use crate::domain::auth::models::RefreshToken;
use crate::domain::auth::models::RegisterCommand;
use crate::user::models::Role;
use crate::user::models::RoleName;
use crate::user::models::UserId;

/// Port for authentication operations.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Create an account and open its first session.
    ///
    /// # Errors
    /// * `DuplicateUser` - Username or email is already taken, whether caught
    ///   by the advisory pre-check or by the storage unique constraint
    async fn register(&self, command: RegisterCommand)
        -> Result<AuthenticatedSession, AuthError>;

    /// Verify credentials and open a fresh session.
    ///
    /// All refresh tokens from prior sessions are revoked before the new one
    /// is issued.
    ///
    /// # Errors
    /// * `BadCredentials` - Unknown identifier, wrong password, or a
    ///   soft-deleted account; indistinguishable by design
    async fn login(&self, credentials: Credentials) -> Result<AuthenticatedSession, AuthError>;

    /// Trade a live refresh token for a new token pair.
    ///
    /// Strict single-use rotation: the presented token is revoked whether or
    /// not the replacement is ever redeemed.
    ///
    /// # Errors
    /// * `InvalidToken` - Token is unknown or already revoked
    /// * `TokenExpired` - Token is past its expiry
    /// * `UserNotFound` - Owning user vanished since the token was issued
    async fn refresh(&self, refresh_token: &str) -> Result<AuthenticatedSession, AuthError>;

    /// Revoke a refresh token, ending its session.
    ///
    /// Revoking an already-revoked token succeeds; only an unknown token is
    /// an error.
    ///
    /// # Errors
    /// * `InvalidToken` - Token is unknown
    async fn logout(&self, refresh_token: &str) -> Result<(), AuthError>;
}

/// Persistence operations for refresh tokens.
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync + 'static {
    /// Persist a new refresh token.
    async fn create(&self, token: RefreshToken) -> Result<RefreshToken, AuthError>;

    /// Look up a token by its opaque string.
    async fn find_by_token(&self, token: &str) -> Result<Option<RefreshToken>, AuthError>;

    /// Mark a single token revoked. Revoking an already-revoked row is a
    /// no-op.
    async fn revoke(&self, token: &str) -> Result<(), AuthError>;

    /// Mark every token owned by a user revoked.
    async fn revoke_all_for_user(&self, user_id: &UserId) -> Result<(), AuthError>;
}

/// Persistence operations for role records.
#[async_trait]
pub trait RoleRepository: Send + Sync + 'static {
    /// Fetch the role row by name, creating it if missing.
    async fn find_or_create(&self, name: RoleName) -> Result<Role, AuthError>;
}
