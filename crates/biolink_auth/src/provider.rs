//! Identity provider client
//!
//! Two calls: trade an authorization code for an access token, then read the
//! user behind a token. No retries.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::Credentials;
use crate::error::ProviderError;

/// Token endpoint response (fields we use).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    /// Token lifetime in seconds.
    pub expires_in: u64,
}

/// Normalized user record returned to the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub discriminator: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn exchange_code(
        &self,
        credentials: Credentials<'_>,
        code: &str,
        redirect_uri: &str,
    ) -> Result<TokenGrant, ProviderError>;

    async fn fetch_user(&self, access_token: &str) -> Result<UserRecord, ProviderError>;
}

/// Discord REST client.
pub struct DiscordClient {
    api_base: String,
    client: reqwest::Client,
}

impl DiscordClient {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl IdentityProvider for DiscordClient {
    async fn exchange_code(
        &self,
        credentials: Credentials<'_>,
        code: &str,
        redirect_uri: &str,
    ) -> Result<TokenGrant, ProviderError> {
        let url = format!("{}/oauth2/token", self.api_base);
        let form = [
            ("client_id", credentials.client_id),
            ("client_secret", credentials.client_secret),
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", redirect_uri),
        ];
        let response = self.client.post(&url).form(&form).send().await?;

        if !response.status().is_success() {
            return Err(ProviderError::Rejected {
                status: response.status().as_u16(),
            });
        }

        Ok(response.json().await?)
    }

    async fn fetch_user(&self, access_token: &str) -> Result<UserRecord, ProviderError> {
        let url = format!("{}/users/@me", self.api_base);
        let response = self
            .client
            .get(&url)
            .bearer_auth(access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::Rejected {
                status: response.status().as_u16(),
            });
        }

        Ok(response.json().await?)
    }
}
