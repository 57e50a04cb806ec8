//! Identity exchange configuration

use std::env;

use crate::error::AuthError;

pub const DEFAULT_PUBLIC_URL: &str = "http://localhost:3000";
pub const DEFAULT_API_BASE: &str = "https://discord.com/api";
pub const CALLBACK_PATH: &str = "/auth/discord/callback";

#[derive(Debug, Clone, PartialEq)]
pub struct AuthConfig {
    /// OAuth client id. Missing credentials surface per request, not at boot.
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    /// Public origin of the site, used to build the redirect URI.
    pub public_url: String,
    /// Mark session cookies `Secure` (production only).
    pub secure_cookies: bool,
    pub api_base: String,
}

/// Client credentials borrowed from an [`AuthConfig`].
#[derive(Debug, Clone, Copy)]
pub struct Credentials<'a> {
    pub client_id: &'a str,
    pub client_secret: &'a str,
}

impl AuthConfig {
    pub fn from_env() -> Self {
        Self {
            client_id: non_empty_var("DISCORD_CLIENT_ID"),
            client_secret: non_empty_var("DISCORD_CLIENT_SECRET"),
            public_url: non_empty_var("BIOLINK_PUBLIC_URL")
                .unwrap_or_else(|| DEFAULT_PUBLIC_URL.to_string()),
            secure_cookies: env::var("BIOLINK_ENV")
                .map(|v| v.eq_ignore_ascii_case("production"))
                .unwrap_or(false),
            api_base: non_empty_var("DISCORD_API_BASE")
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
        }
    }

    pub fn redirect_uri(&self) -> String {
        format!("{}{}", self.public_url.trim_end_matches('/'), CALLBACK_PATH)
    }

    pub fn credentials(&self) -> Result<Credentials<'_>, AuthError> {
        match (self.client_id.as_deref(), self.client_secret.as_deref()) {
            (Some(client_id), Some(client_secret)) => Ok(Credentials {
                client_id,
                client_secret,
            }),
            _ => Err(AuthError::NotConfigured),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            public_url: DEFAULT_PUBLIC_URL.to_string(),
            secure_cookies: false,
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redirect_uri_uses_public_url() {
        let config = AuthConfig {
            public_url: "https://bio.example/".to_string(),
            ..AuthConfig::default()
        };
        assert_eq!(config.redirect_uri(), "https://bio.example/auth/discord/callback");
        assert_eq!(
            AuthConfig::default().redirect_uri(),
            "http://localhost:3000/auth/discord/callback"
        );
    }

    #[test]
    fn credentials_require_both_halves() {
        let mut config = AuthConfig {
            client_id: Some("id".to_string()),
            ..AuthConfig::default()
        };
        assert!(matches!(config.credentials(), Err(AuthError::NotConfigured)));

        config.client_secret = Some("secret".to_string());
        let creds = config.credentials().unwrap();
        assert_eq!(creds.client_id, "id");
        assert_eq!(creds.client_secret, "secret");
    }
}
