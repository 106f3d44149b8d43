use std::collections::HashMap;
use std::sync::atomic::AtomicI64;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use auth::TokenCodec;
use auth::TokenSettings;
use chrono::Duration;
use chrono::Utc;
use user_service::domain::auth::errors::AuthError;
use user_service::domain::auth::models::RefreshToken;
use user_service::domain::auth::ports::RefreshTokenRepository;
use user_service::domain::auth::ports::RoleRepository;
use user_service::domain::auth::service::AuthService;
use user_service::domain::user::service::UserService;
use user_service::inbound::http::router::create_router;
use user_service::inbound::http::router::AppState;
use user_service::user::errors::UserError;
use user_service::user::models::EmailAddress;
use user_service::user::models::NewUser;
use user_service::user::models::Role;
use user_service::user::models::RoleName;
use user_service::user::models::User;
use user_service::user::models::UserId;
use user_service::user::models::Username;
use user_service::user::ports::UserRepository;

/// Test application that spawns the real router on a random port, wired to
/// in-memory adapters behind the same ports as the Postgres ones.
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub refresh_tokens: Arc<InMemoryRefreshTokenRepository>,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        let users = Arc::new(InMemoryUserRepository::new());
        let refresh_tokens = Arc::new(InMemoryRefreshTokenRepository::new());
        let roles = Arc::new(InMemoryRoleRepository::new());

        let token_codec = Arc::new(
            TokenCodec::new(TokenSettings {
                secret: "test-secret-key-for-jwt-signing-at-least-32-bytes".to_string(),
                issuer: "community-platform".to_string(),
                audience: "community-platform-api".to_string(),
                access_token_ttl_secs: 900,
                clock_skew_secs: 0,
            })
            .expect("Failed to build token codec"),
        );

        let auth_service = Arc::new(AuthService::new(
            Arc::clone(&users),
            Arc::clone(&refresh_tokens),
            roles,
            Arc::clone(&token_codec),
            3600,
        ));
        let user_service = Arc::new(UserService::new(users, Arc::clone(&refresh_tokens)));

        let state = AppState {
            auth_service,
            user_service,
            token_codec,
        };

        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let router = create_router(state);
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            refresh_tokens,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    /// Helper to make PATCH request with Bearer token
    pub fn patch_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .patch(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Helper to make DELETE request with Bearer token
    pub fn delete_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .delete(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }
}

/// In-memory user store enforcing the same uniqueness rules as the schema.
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
    next_id: AtomicI64,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: NewUser, default_role: &Role) -> Result<User, UserError> {
        let mut users = self.users.lock().unwrap();

        // Uniqueness holds against every row, soft-deleted ones included.
        if users.iter().any(|u| u.username == user.username) {
            return Err(UserError::UsernameAlreadyExists(
                user.username.as_str().to_string(),
            ));
        }
        if users.iter().any(|u| u.email == user.email) {
            return Err(UserError::EmailAlreadyExists(
                user.email.as_str().to_string(),
            ));
        }

        let created = User {
            id: UserId(self.next_id.fetch_add(1, Ordering::SeqCst)),
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            first_name: user.first_name,
            last_name: user.last_name,
            roles: vec![default_role.name],
            created_at: Utc::now(),
            deleted_at: None,
        };
        users.push(created.clone());

        Ok(created)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.id == *id).cloned())
    }

    async fn find_by_username_or_email(
        &self,
        identifier: &str,
    ) -> Result<Option<User>, UserError> {
        let users = self.users.lock().unwrap();
        Ok(users
            .iter()
            .find(|u| u.username.as_str() == identifier || u.email.as_str() == identifier)
            .cloned())
    }

    async fn exists_by_username(&self, username: &Username) -> Result<bool, UserError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().any(|u| u.username == *username))
    }

    async fn exists_by_email(&self, email: &EmailAddress) -> Result<bool, UserError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().any(|u| u.email == *email))
    }

    async fn update(&self, user: &User) -> Result<(), UserError> {
        let mut users = self.users.lock().unwrap();

        if users
            .iter()
            .any(|u| u.id != user.id && u.email == user.email)
        {
            return Err(UserError::EmailAlreadyExists(
                user.email.as_str().to_string(),
            ));
        }

        let stored = users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or(UserError::NotFound(user.id.to_string()))?;
        stored.email = user.email.clone();
        stored.first_name = user.first_name.clone();
        stored.last_name = user.last_name.clone();
        stored.password_hash = user.password_hash.clone();

        Ok(())
    }

    async fn soft_delete(&self, id: &UserId) -> Result<(), UserError> {
        let mut users = self.users.lock().unwrap();
        let stored = users
            .iter_mut()
            .find(|u| u.id == *id && u.deleted_at.is_none())
            .ok_or(UserError::NotFound(id.to_string()))?;
        stored.deleted_at = Some(Utc::now());

        Ok(())
    }
}

/// In-memory refresh-token store keyed by the opaque token string.
pub struct InMemoryRefreshTokenRepository {
    tokens: Mutex<HashMap<String, RefreshToken>>,
}

impl InMemoryRefreshTokenRepository {
    pub fn new() -> Self {
        Self {
            tokens: Mutex::new(HashMap::new()),
        }
    }

    /// Test hook: backdate a token's expiry.
    pub fn expire(&self, token: &str) {
        let mut tokens = self.tokens.lock().unwrap();
        if let Some(stored) = tokens.get_mut(token) {
            stored.expires_at = Utc::now() - Duration::hours(1);
        }
    }
}

#[async_trait]
impl RefreshTokenRepository for InMemoryRefreshTokenRepository {
    async fn create(&self, token: RefreshToken) -> Result<RefreshToken, AuthError> {
        let mut tokens = self.tokens.lock().unwrap();
        tokens.insert(token.token.clone(), token.clone());
        Ok(token)
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<RefreshToken>, AuthError> {
        let tokens = self.tokens.lock().unwrap();
        Ok(tokens.get(token).cloned())
    }

    async fn revoke(&self, token: &str) -> Result<(), AuthError> {
        let mut tokens = self.tokens.lock().unwrap();
        if let Some(stored) = tokens.get_mut(token) {
            stored.revoked = true;
        }
        Ok(())
    }

    async fn revoke_all_for_user(&self, user_id: &UserId) -> Result<(), AuthError> {
        let mut tokens = self.tokens.lock().unwrap();
        for stored in tokens.values_mut().filter(|t| t.user_id == *user_id) {
            stored.revoked = true;
        }
        Ok(())
    }
}

/// In-memory role store.
pub struct InMemoryRoleRepository {
    roles: Mutex<Vec<Role>>,
}

impl InMemoryRoleRepository {
    pub fn new() -> Self {
        Self {
            roles: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl RoleRepository for InMemoryRoleRepository {
    async fn find_or_create(&self, name: RoleName) -> Result<Role, AuthError> {
        let mut roles = self.roles.lock().unwrap();
        if let Some(role) = roles.iter().find(|r| r.name == name) {
            return Ok(role.clone());
        }

        let role = Role {
            id: roles.len() as i64 + 1,
            name,
        };
        roles.push(role.clone());
        Ok(role)
    }
}
