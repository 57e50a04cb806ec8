//! Particle placement endpoint
//!
//! Serves the same records the client computes, so server-rendered markup and
//! hydrated markup agree.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use biolink_core::positions::{create_deterministic_positions, ParticlePosition};
use biolink_services::settings::ParticleSettings;
use serde::Deserialize;

pub const MAX_PARTICLES: u32 = 500;

#[derive(Debug, Deserialize)]
struct ParticleQuery {
    count: Option<u32>,
    seed: Option<u32>,
}

pub fn router(defaults: ParticleSettings) -> Router {
    Router::new()
        .route("/api/particles", get(particles))
        .with_state(Arc::new(defaults))
}

async fn particles(
    State(defaults): State<Arc<ParticleSettings>>,
    Query(query): Query<ParticleQuery>,
) -> Json<Vec<ParticlePosition>> {
    let count = query.count.unwrap_or(defaults.count).min(MAX_PARTICLES);
    let seed = query.seed.unwrap_or(defaults.base_seed);
    tracing::trace!(count, seed, "particle positions requested");
    Json(create_deterministic_positions(count, seed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    async fn fetch(uri: &str) -> (StatusCode, Vec<ParticlePosition>) {
        let response = router(ParticleSettings::default())
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let positions = serde_json::from_slice(&bytes).unwrap_or_default();
        (status, positions)
    }

    #[tokio::test]
    async fn defaults_come_from_settings() {
        let (status, positions) = fetch("/api/particles").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(positions, create_deterministic_positions(20, 12345));
    }

    #[tokio::test]
    async fn query_overrides_count_and_seed() {
        let (_, positions) = fetch("/api/particles?count=4&seed=99").await;
        assert_eq!(positions, create_deterministic_positions(4, 99));
    }

    #[tokio::test]
    async fn count_is_capped() {
        let (_, positions) = fetch("/api/particles?count=100000").await;
        assert_eq!(positions.len(), MAX_PARTICLES as usize);
    }

    #[tokio::test]
    async fn bad_query_is_rejected() {
        let (status, _) = fetch("/api/particles?count=lots").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
