use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Failure talking to the identity provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("identity provider rejected the request with status {status}")]
    Rejected { status: u16 },

    #[error("identity provider request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Errors returned by the auth endpoints. Each maps to a status code and a
/// `{"error": "..."}` body.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Authorization code is required")]
    MissingCode,

    #[error("Discord credentials not configured")]
    NotConfigured,

    #[error("Failed to exchange code for token")]
    TokenExchange,

    #[error("Failed to fetch user data")]
    UserFetch,

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Internal server error")]
    Internal(String),
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::MissingCode | AuthError::TokenExchange | AuthError::UserFetch => {
                StatusCode::BAD_REQUEST
            }
            AuthError::NotAuthenticated | AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
            AuthError::NotConfigured | AuthError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<ProviderError> for AuthError {
    fn from(err: ProviderError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match &self {
            AuthError::Internal(detail) => tracing::error!(%detail, "auth request failed"),
            other => tracing::warn!(error = %other, "auth request rejected"),
        }
        let body = serde_json::json!({ "error": self.to_string() });
        (self.status(), Json(body)).into_response()
    }
}
