use axum::{extract::State, Json};
use serde::Serialize;
use tracing::info;

use crate::{
    adapters::state::AppState,
    domain::{
        config::upload::Provider,
        models::format::{OutputFormat, Quality},
    },
};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub provider: Provider,
    pub container: String,
    pub format: OutputFormat,
    pub quality: Quality,
    #[serde(rename = "maxBodyBytes")]
    pub max_body_bytes: usize,
}

pub struct HealthController;

impl HealthController {
    /// GET /api/v1/health
    pub async fn health_check(State(app_state): State<AppState>) -> Json<HealthResponse> {
        info!("Health check requested");

        Json(HealthResponse {
            status: "healthy".to_string(),
            provider: app_state.config.provider,
            container: app_state.pipeline.container().to_string(),
            format: app_state.pipeline.format(),
            quality: app_state.pipeline.quality(),
            max_body_bytes: app_state.config.max_body_bytes,
        })
    }
}
