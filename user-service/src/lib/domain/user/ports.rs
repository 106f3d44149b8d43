use async_trait::async_trait;

use crate::user::errors::UserError;
use crate::user::models::ChangePasswordCommand;
use crate::user::models::EmailAddress;
use crate::user::models::NewUser;
use crate::user::models::Role;
use crate::user::models::UpdateUserCommand;
use crate::user::models::User;
use crate::user::models::UserId;
use crate::user::models::Username;

/// Port for user profile operations.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// Retrieve an active user by identifier.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist or is soft-deleted
    async fn get_user(&self, id: &UserId) -> Result<User, UserError>;

    /// Apply a partial profile update.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist or is soft-deleted
    /// * `EmailAlreadyExists` - New email is already registered
    async fn update_user(&self, id: &UserId, command: UpdateUserCommand)
        -> Result<User, UserError>;

    /// Replace the password after verifying the current one, revoking all
    /// refresh tokens for the user.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist or is soft-deleted
    /// * `InvalidCredentials` - Current password does not match
    async fn change_password(
        &self,
        id: &UserId,
        command: ChangePasswordCommand,
    ) -> Result<(), UserError>;

    /// Soft-delete a user and revoke all their refresh tokens.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist or is already soft-deleted
    async fn delete_user(&self, id: &UserId) -> Result<(), UserError>;
}

/// Persistence operations for the user aggregate.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist a new user with its default role.
    ///
    /// The unique constraints on username and email are authoritative here;
    /// a violation surfaces as the matching already-exists error.
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `EmailAlreadyExists` - Email is already registered
    async fn create(&self, user: NewUser, default_role: &Role) -> Result<User, UserError>;

    /// Retrieve a user by identifier, soft-deleted rows included.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;

    /// Retrieve a user whose username or email equals the identifier.
    async fn find_by_username_or_email(&self, identifier: &str)
        -> Result<Option<User>, UserError>;

    /// Whether any row (deleted or not) holds this username.
    async fn exists_by_username(&self, username: &Username) -> Result<bool, UserError>;

    /// Whether any row (deleted or not) holds this email.
    async fn exists_by_email(&self, email: &EmailAddress) -> Result<bool, UserError>;

    /// Write back mutable fields (email, names, password hash).
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `EmailAlreadyExists` - New email is already registered
    async fn update(&self, user: &User) -> Result<(), UserError>;

    /// Set the soft-delete marker on an active user.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist or is already soft-deleted
    async fn soft_delete(&self, id: &UserId) -> Result<(), UserError>;
}
