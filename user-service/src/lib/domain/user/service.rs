use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::auth::ports::RefreshTokenRepository;
use crate::user::errors::UserError;
use crate::user::models::ChangePasswordCommand;
use crate::user::models::UpdateUserCommand;
use crate::user::models::User;
use crate::user::models::UserId;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

/// Domain service for the user profile surface.
///
/// Holds the refresh-token store alongside the user store because password
/// changes and account deletion invalidate every open session.
pub struct UserService<UR, RR>
where
    UR: UserRepository,
    RR: RefreshTokenRepository,
{
    users: Arc<UR>,
    refresh_tokens: Arc<RR>,
    password_hasher: auth::PasswordHasher,
}

impl<UR, RR> UserService<UR, RR>
where
    UR: UserRepository,
    RR: RefreshTokenRepository,
{
    pub fn new(users: Arc<UR>, refresh_tokens: Arc<RR>) -> Self {
        Self {
            users,
            refresh_tokens,
            password_hasher: auth::PasswordHasher::new(),
        }
    }

    /// Load a user that exists and is not soft-deleted.
    async fn load_active(&self, id: &UserId) -> Result<User, UserError> {
        self.users
            .find_by_id(id)
            .await?
            .filter(User::is_active)
            .ok_or(UserError::NotFound(id.to_string()))
    }

    async fn revoke_sessions(&self, id: &UserId) -> Result<(), UserError> {
        self.refresh_tokens
            .revoke_all_for_user(id)
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))
    }
}

#[async_trait]
impl<UR, RR> UserServicePort for UserService<UR, RR>
where
    UR: UserRepository,
    RR: RefreshTokenRepository,
{
    async fn get_user(&self, id: &UserId) -> Result<User, UserError> {
        self.load_active(id).await
    }

    async fn update_user(
        &self,
        id: &UserId,
        command: UpdateUserCommand,
    ) -> Result<User, UserError> {
        let mut user = self.load_active(id).await?;

        if let Some(new_email) = command.email {
            user.email = new_email;
        }
        if let Some(new_first_name) = command.first_name {
            user.first_name = Some(new_first_name);
        }
        if let Some(new_last_name) = command.last_name {
            user.last_name = Some(new_last_name);
        }

        self.users.update(&user).await?;
        tracing::info!(user_id = %user.id, "User profile updated");

        Ok(user)
    }

    async fn change_password(
        &self,
        id: &UserId,
        command: ChangePasswordCommand,
    ) -> Result<(), UserError> {
        let mut user = self.load_active(id).await?;

        let matches = self
            .password_hasher
            .verify(&command.current_password, &user.password_hash)?;
        if !matches {
            return Err(UserError::InvalidCredentials);
        }

        user.password_hash = self.password_hasher.hash(&command.new_password)?;
        self.users.update(&user).await?;

        // A changed password invalidates every open session.
        self.revoke_sessions(id).await?;
        tracing::info!(user_id = %id, "Password changed, sessions revoked");

        Ok(())
    }

    async fn delete_user(&self, id: &UserId) -> Result<(), UserError> {
        // Ensure the target exists and is still active before marking it.
        self.load_active(id).await?;

        self.users.soft_delete(id).await?;
        self.revoke_sessions(id).await?;
        tracing::info!(user_id = %id, "User soft-deleted, sessions revoked");

        Ok(())
    }
}
