//! Sign-in endpoints
//!
//! `POST /api/auth/discord` trades an authorization code for a session (two
//! cookies). `GET /api/auth/me` revalidates the session cookie against the
//! provider and returns the user.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::HeaderMap;
use axum::response::{AppendHeaders, IntoResponse};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::config::AuthConfig;
use crate::error::{AuthError, ProviderError};
use crate::provider::IdentityProvider;

pub const TOKEN_COOKIE: &str = "discord_token";
pub const USER_COOKIE: &str = "user_id";

#[derive(Clone)]
pub struct AuthState {
    pub config: Arc<AuthConfig>,
    pub provider: Arc<dyn IdentityProvider>,
}

impl AuthState {
    pub fn new(config: AuthConfig, provider: impl IdentityProvider + 'static) -> Self {
        Self {
            config: Arc::new(config),
            provider: Arc::new(provider),
        }
    }
}

pub fn router(state: AuthState) -> Router {
    Router::new()
        .route("/api/auth/discord", post(exchange))
        .route("/api/auth/me", get(me))
        .with_state(state)
}

async fn exchange(
    State(state): State<AuthState>,
    body: Bytes,
) -> Result<impl IntoResponse, AuthError> {
    let request: Value = serde_json::from_slice(&body)
        .map_err(|e| AuthError::Internal(format!("malformed exchange body: {e}")))?;
    let code = request
        .get("code")
        .and_then(code_param)
        .ok_or(AuthError::MissingCode)?;

    let credentials = state.config.credentials()?;
    let redirect_uri = state.config.redirect_uri();

    let grant = state
        .provider
        .exchange_code(credentials, &code, &redirect_uri)
        .await
        .map_err(|e| rejected_as(e, AuthError::TokenExchange))?;

    let user = state
        .provider
        .fetch_user(&grant.access_token)
        .await
        .map_err(|e| rejected_as(e, AuthError::UserFetch))?;

    tracing::info!(user_id = %user.id, "discord sign-in completed");

    let secure = state.config.secure_cookies;
    let max_age = grant.expires_in;
    let cookies = AppendHeaders([
        (SET_COOKIE, session_cookie(TOKEN_COOKIE, &grant.access_token, max_age, secure)),
        (SET_COOKIE, session_cookie(USER_COOKIE, &user.id, max_age, secure)),
    ]);
    Ok((cookies, Json(json!({ "success": true, "user": user }))))
}

async fn me(
    State(state): State<AuthState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AuthError> {
    let token = cookie_value(&headers, TOKEN_COOKIE);
    let user_id = cookie_value(&headers, USER_COOKIE);
    let (Some(token), Some(_user_id)) = (token, user_id) else {
        return Err(AuthError::NotAuthenticated);
    };

    let user = state
        .provider
        .fetch_user(&token)
        .await
        .map_err(|e| rejected_as(e, AuthError::InvalidToken))?;

    Ok(Json(json!({ "user": user })))
}

/// Form value for a JSON `code`. Falsy JSON (`null`, `false`, `0`, `""`)
/// counts as missing; other scalars are sent in their text form.
fn code_param(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(code) if code.is_empty() => None,
        Value::String(code) => Some(code.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}

/// Provider rejections become `rejection`; transport failures stay internal.
fn rejected_as(err: ProviderError, rejection: AuthError) -> AuthError {
    match err {
        ProviderError::Rejected { status } => {
            tracing::debug!(status, "identity provider rejected request");
            rejection
        }
        other => other.into(),
    }
}

/// HTTP-only, SameSite=Lax cookie expiring with the token.
pub fn session_cookie(name: &str, value: &str, max_age_secs: u64, secure: bool) -> String {
    let mut cookie =
        format!("{name}={value}; Path=/; Max-Age={max_age_secs}; HttpOnly; SameSite=Lax");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// First value of cookie `name` across all `Cookie` headers.
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty())
}
