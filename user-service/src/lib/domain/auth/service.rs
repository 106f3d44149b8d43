use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::AuthenticatedSession;
use crate::domain::auth::models::Credentials;
use crate::domain::auth::models::RefreshToken;
use crate::domain::auth::models::RegisterCommand;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::auth::ports::RefreshTokenRepository;
use crate::domain::auth::ports::RoleRepository;
use crate::user::models::NewUser;
use crate::user::models::RoleName;
use crate::user::models::User;
use crate::user::models::UserId;
use crate::user::ports::UserRepository;

/// Authentication orchestrator.
///
/// Composes the credential store, password hasher, token codec and refresh
/// token store. Holds no mutable state, so one instance is shared across
/// all request workers; durable state lives behind the repositories.
pub struct AuthService<UR, RR, RO>
where
    UR: UserRepository,
    RR: RefreshTokenRepository,
    RO: RoleRepository,
{
    users: Arc<UR>,
    refresh_tokens: Arc<RR>,
    roles: Arc<RO>,
    password_hasher: auth::PasswordHasher,
    token_codec: Arc<auth::TokenCodec>,
    refresh_token_ttl_secs: i64,
}

impl<UR, RR, RO> AuthService<UR, RR, RO>
where
    UR: UserRepository,
    RR: RefreshTokenRepository,
    RO: RoleRepository,
{
    pub fn new(
        users: Arc<UR>,
        refresh_tokens: Arc<RR>,
        roles: Arc<RO>,
        token_codec: Arc<auth::TokenCodec>,
        refresh_token_ttl_secs: i64,
    ) -> Self {
        Self {
            users,
            refresh_tokens,
            roles,
            password_hasher: auth::PasswordHasher::new(),
            token_codec,
            refresh_token_ttl_secs,
        }
    }

    /// Look up by username-or-email and compare the password.
    ///
    /// Unknown identifier, wrong password and soft-deleted account all
    /// surface as `BadCredentials` so callers cannot enumerate users.
    async fn verify_credentials(&self, credentials: &Credentials) -> Result<User, AuthError> {
        let user = self
            .users
            .find_by_username_or_email(&credentials.username_or_email)
            .await?
            .ok_or(AuthError::BadCredentials)?;

        if !user.is_active() {
            return Err(AuthError::BadCredentials);
        }

        let matches = self
            .password_hasher
            .verify(&credentials.password, &user.password_hash)?;
        if !matches {
            return Err(AuthError::BadCredentials);
        }

        Ok(user)
    }

    /// Mint an access token and persist a fresh refresh token for a user.
    async fn issue_session(&self, user: &User) -> Result<AuthenticatedSession, AuthError> {
        let access_token = self
            .token_codec
            .issue(user.id.0, user.username.as_str())?;
        let refresh_token = self.create_refresh_token(&user.id).await?;

        Ok(AuthenticatedSession {
            access_token,
            refresh_token: refresh_token.token,
            token_type: "Bearer",
            expires_in: self.token_codec.access_token_ttl_secs(),
            user_id: user.id,
            username: user.username.to_string(),
            email: user.email.to_string(),
            roles: user.role_names(),
        })
    }

    async fn create_refresh_token(&self, user_id: &UserId) -> Result<RefreshToken, AuthError> {
        let now = Utc::now();
        let token = RefreshToken {
            token: Uuid::new_v4().to_string(),
            user_id: *user_id,
            expires_at: now + Duration::seconds(self.refresh_token_ttl_secs),
            revoked: false,
            created_at: now,
        };

        self.refresh_tokens.create(token).await
    }
}

#[async_trait]
impl<UR, RR, RO> AuthServicePort for AuthService<UR, RR, RO>
where
    UR: UserRepository,
    RR: RefreshTokenRepository,
    RO: RoleRepository,
{
    async fn register(
        &self,
        command: RegisterCommand,
    ) -> Result<AuthenticatedSession, AuthError> {
        tracing::info!(username = %command.username, "Registering new user");

        if self.users.exists_by_username(&command.username).await? {
            return Err(AuthError::DuplicateUser {
                field: "username",
                value: command.username.to_string(),
            });
        }
        if self.users.exists_by_email(&command.email).await? {
            return Err(AuthError::DuplicateUser {
                field: "email",
                value: command.email.to_string(),
            });
        }

        let default_role = self.roles.find_or_create(RoleName::User).await?;

        let password_hash = self.password_hasher.hash(&command.password)?;
        let new_user = NewUser {
            username: command.username,
            email: command.email,
            password_hash,
            first_name: command.first_name,
            last_name: command.last_name,
        };

        // The pre-checks above only avoid wasted hashing; the unique
        // constraints decide races, surfaced by the repository as the
        // matching already-exists error.
        let user = self.users.create(new_user, &default_role).await?;
        tracing::info!(user_id = %user.id, "User registered");

        self.issue_session(&user).await
    }

    async fn login(&self, credentials: Credentials) -> Result<AuthenticatedSession, AuthError> {
        tracing::info!(identifier = %credentials.username_or_email, "Login attempt");

        let user = self.verify_credentials(&credentials).await?;

        // Login starts a fresh session: prior refresh tokens must be
        // revoked before the replacement exists.
        self.refresh_tokens.revoke_all_for_user(&user.id).await?;

        let session = self.issue_session(&user).await?;
        tracing::info!(user_id = %user.id, "User logged in");
        Ok(session)
    }

    async fn refresh(&self, refresh_token: &str) -> Result<AuthenticatedSession, AuthError> {
        let stored = self
            .refresh_tokens
            .find_by_token(refresh_token)
            .await?
            .ok_or_else(|| AuthError::InvalidToken("Refresh token not found".to_string()))?;

        if stored.revoked {
            return Err(AuthError::InvalidToken(
                "Refresh token has been revoked".to_string(),
            ));
        }
        if stored.is_expired(Utc::now()) {
            return Err(AuthError::TokenExpired(
                "Refresh token has expired".to_string(),
            ));
        }

        let user = self
            .users
            .find_by_id(&stored.user_id)
            .await?
            .filter(User::is_active)
            .ok_or_else(|| AuthError::UserNotFound(stored.user_id.to_string()))?;

        // Strict single-use rotation: the presented token is retired before
        // its replacement is created.
        self.refresh_tokens.revoke(&stored.token).await?;

        let session = self.issue_session(&user).await?;
        tracing::info!(user_id = %user.id, "Access token refreshed");
        Ok(session)
    }

    async fn logout(&self, refresh_token: &str) -> Result<(), AuthError> {
        let stored = self
            .refresh_tokens
            .find_by_token(refresh_token)
            .await?
            .ok_or_else(|| AuthError::InvalidToken("Refresh token not found".to_string()))?;

        // Revoking an already-revoked token is a no-op success.
        self.refresh_tokens.revoke(&stored.token).await?;

        tracing::info!(user_id = %stored.user_id, "User logged out");
        Ok(())
    }
}
