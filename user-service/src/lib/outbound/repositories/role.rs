use async_trait::async_trait;
use sqlx::FromRow;
use sqlx::PgPool;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::ports::RoleRepository;
use crate::user::models::Role;
use crate::user::models::RoleName;

pub struct PostgresRoleRepository {
    pool: PgPool,
}

impl PostgresRoleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct RoleRow {
    id: i64,
    name: String,
}

impl RoleRow {
    fn into_role(self) -> Result<Role, AuthError> {
        let name = self
            .name
            .parse::<RoleName>()
            .map_err(|e| AuthError::Database(e.to_string()))?;
        Ok(Role { id: self.id, name })
    }
}

#[async_trait]
impl RoleRepository for PostgresRoleRepository {
    async fn find_or_create(&self, name: RoleName) -> Result<Role, AuthError> {
        let existing = sqlx::query_as::<_, RoleRow>("SELECT id, name FROM roles WHERE name = $1")
            .bind(name.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AuthError::Database(e.to_string()))?;

        if let Some(row) = existing {
            return row.into_role();
        }

        tracing::info!(role = %name, "Creating default role");

        // The upsert keeps concurrent first registrations from racing on the
        // role row.
        let row = sqlx::query_as::<_, RoleRow>(
            "INSERT INTO roles (name) VALUES ($1)
             ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
             RETURNING id, name",
        )
        .bind(name.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AuthError::Database(e.to_string()))?;

        row.into_role()
    }
}
