//! Biolink Server
//!
//! Boots logging and settings, then serves the particle and sign-in APIs

mod particles;

use anyhow::{Context, Result};
use axum::routing::get;
use axum::Router;
use biolink_auth::{AuthConfig, AuthState, DiscordClient};
use biolink_services::Settings;
use tracing_subscriber::EnvFilter;

const DEFAULT_ADDR: &str = "127.0.0.1:3000";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("Biolink v{}", biolink_core::VERSION);

    let settings = match std::env::var("BIOLINK_SETTINGS") {
        Ok(path) => Settings::load(&path)
            .with_context(|| format!("loading settings from {path}"))?,
        Err(_) => Settings::default(),
    };
    tracing::debug!(?settings, "settings resolved");

    let auth_config = AuthConfig::from_env();
    if auth_config.credentials().is_err() {
        tracing::warn!("DISCORD_CLIENT_ID/DISCORD_CLIENT_SECRET not set; sign-in will fail");
    }
    let provider = DiscordClient::new(auth_config.api_base.clone());
    let app = app(&settings, AuthState::new(auth_config, provider));

    let addr = std::env::var("BIOLINK_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, app).await?;
    Ok(())
}

fn app(settings: &Settings, auth: AuthState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .merge(particles::router(settings.particles.clone()))
        .merge(biolink_auth::router(auth))
}
