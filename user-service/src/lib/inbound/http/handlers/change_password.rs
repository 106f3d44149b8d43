use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;
use crate::user::models::ChangePasswordCommand;
use crate::user::models::UserId;
use crate::user::ports::UserServicePort;

/// Minimum accepted password length.
const PASSWORD_MIN_LENGTH: usize = 8;

pub async fn change_password(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Extension(caller): Extension<AuthenticatedUser>,
    Json(body): Json<ChangePasswordRequest>,
) -> Result<StatusCode, ApiError> {
    if caller.user_id != UserId(user_id) {
        return Err(ApiError::Forbidden(
            "Cannot change another user's password".to_string(),
        ));
    }

    if body.new_password.len() < PASSWORD_MIN_LENGTH {
        return Err(ApiError::UnprocessableEntity(
            "Password must be at least 8 characters".to_string(),
        ));
    }

    state
        .user_service
        .change_password(
            &UserId(user_id),
            ChangePasswordCommand {
                current_password: body.current_password,
                new_password: body.new_password,
            },
        )
        .await
        .map_err(ApiError::from)?;

    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    current_password: String,
    new_password: String,
}
