//! Bearer-token validation against the external identity provider
//!
//! The server never issues tokens. Requests arrive with a bearer token
//! minted elsewhere; [`AuthProvider`] resolves it to a user identity or
//! rejects it. Handlers and middleware only see the trait, so tests swap
//! in a static implementation.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

const USER_AGENT: &str = "CourseBridge/0.1.0";

/// Auth provider errors
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Auth API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Identity resolved from a bearer token
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Token validation seam
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Resolve a bearer token to its user, or reject it
    async fn get_user(&self, token: &str) -> Result<AuthUser, AuthError>;
}

/// Production provider: GET {base_url}/user with the caller's token
pub struct HttpAuthProvider {
    http_client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct UserPayload {
    id: Uuid,
    email: Option<String>,
    phone: Option<String>,
}

impl HttpAuthProvider {
    pub fn new(base_url: String) -> Result<Self, AuthError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| AuthError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url,
        })
    }
}

#[async_trait]
impl AuthProvider for HttpAuthProvider {
    async fn get_user(&self, token: &str) -> Result<AuthUser, AuthError> {
        let url = format!("{}/user", self.base_url.trim_end_matches('/'));

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| AuthError::NetworkError(e.to_string()))?;

        let status = response.status();

        if status == 401 || status == 403 {
            return Err(AuthError::InvalidToken);
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AuthError::ApiError(status.as_u16(), error_text));
        }

        let payload: UserPayload = response
            .json()
            .await
            .map_err(|e| AuthError::ParseError(e.to_string()))?;

        tracing::debug!(user_id = %payload.id, "Token validated");

        Ok(AuthUser {
            id: payload.id,
            email: payload.email,
            phone: payload.phone,
        })
    }
}
