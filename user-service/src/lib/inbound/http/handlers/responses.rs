use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use crate::domain::auth::models::AuthenticatedSession;
use crate::user::models::PersonName;
use crate::user::models::User;

/// Response body shared by register, login and refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponseData {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    /// Access-token lifetime in seconds
    pub expires_in: i64,
    pub user_id: i64,
    pub username: String,
    pub email: String,
    pub roles: Vec<String>,
}

impl From<AuthenticatedSession> for AuthResponseData {
    fn from(session: AuthenticatedSession) -> Self {
        Self {
            access_token: session.access_token,
            refresh_token: session.refresh_token,
            token_type: session.token_type.to_string(),
            expires_in: session.expires_in,
            user_id: session.user_id.0,
            username: session.username,
            email: session.email,
            roles: session.roles,
        }
    }
}

/// Public user summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub roles: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.0,
            username: user.username.as_str().to_string(),
            email: user.email.as_str().to_string(),
            first_name: user.first_name.as_ref().map(name_to_string),
            last_name: user.last_name.as_ref().map(name_to_string),
            roles: user.role_names(),
            created_at: user.created_at,
        }
    }
}

fn name_to_string(name: &PersonName) -> String {
    name.as_str().to_string()
}
