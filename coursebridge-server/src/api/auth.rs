//! Bearer authentication middleware
//!
//! Tokens are minted by the external identity provider; this middleware
//! only validates them through the [`AuthProvider`] seam and attaches the
//! resolved [`AuthUser`] as a request extension. Admin routes additionally
//! require the profile admin flag.
//!
//! The health endpoint and the public read surface do not pass through
//! here.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::error::ApiError;
use crate::services::auth::{AuthError, AuthProvider, AuthUser};
use crate::AppState;

/// Require a valid bearer token; 401 otherwise
pub async fn require_user(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = authenticate(state.auth.as_ref(), request.headers()).await?;
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Require a valid bearer token whose profile carries the admin flag;
/// 401 without credentials, 403 without the role
pub async fn require_admin(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = authenticate(state.auth.as_ref(), request.headers()).await?;

    let is_admin = crate::db::profiles::is_admin(&state.db, &user.id.to_string()).await?;
    if !is_admin {
        return Err(ApiError::Forbidden(
            "Administrator access required".to_string(),
        ));
    }

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

async fn authenticate(
    provider: &dyn AuthProvider,
    headers: &HeaderMap,
) -> Result<AuthUser, ApiError> {
    let header_value = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing bearer token".to_string()))?;

    let token = header_value
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::Unauthorized("Malformed authorization header".to_string()))?;

    provider.get_user(token).await.map_err(|e| match e {
        AuthError::InvalidToken => {
            ApiError::Unauthorized("Invalid or expired token".to_string())
        }
        other => {
            warn!(error = %other, "Auth provider lookup failed");
            ApiError::Internal("Token validation unavailable".to_string())
        }
    })
}
