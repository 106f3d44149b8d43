use axum::extract::Request;
use axum::extract::State;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;

use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;
use crate::user::models::UserId;

/// Extension type carrying the verified caller identity
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub username: String,
}

/// Middleware that verifies Bearer access tokens and adds the caller
/// identity to request extensions.
///
/// Issuer, audience, type-marker, subject and username checks all happen in
/// the codec; a failure here never reaches a handler.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_token_from_header(&req)?;

    let verified = state.token_codec.verify(token).map_err(|e| {
        tracing::warn!("Access token rejected: {}", e);
        match e {
            auth::TokenError::Expired => {
                ApiError::TokenExpired("Access token has expired".to_string()).into_response()
            }
            _ => ApiError::InvalidToken("Invalid access token".to_string()).into_response(),
        }
    })?;

    req.extensions_mut().insert(AuthenticatedUser {
        user_id: UserId(verified.user_id),
        username: verified.username,
    });

    Ok(next.run(req).await)
}

fn extract_token_from_header(req: &Request) -> Result<&str, Response> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or_else(|| {
            ApiError::Unauthorized("Missing Authorization header".to_string()).into_response()
        })?;

    let auth_str = auth_header.to_str().map_err(|_| {
        ApiError::Unauthorized("Invalid Authorization header".to_string()).into_response()
    })?;

    if !auth_str.starts_with("Bearer ") {
        return Err(ApiError::Unauthorized(
            "Invalid Authorization header format. Expected: Bearer <token>".to_string(),
        )
        .into_response());
    }

    Ok(auth_str.trim_start_matches("Bearer "))
}
