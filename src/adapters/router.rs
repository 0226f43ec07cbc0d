use axum::{
    routing::{get, post},
    Router,
};

use crate::adapters::{
    controllers::{health_controller::HealthController, upload_controller::UploadController},
    state::AppState,
};

async fn hello_world() -> &'static str {
    "Hello, world!"
}

pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(hello_world))
        .route("/api/v1/health", get(HealthController::health_check))
        .route("/api/v1/images", post(UploadController::upload_image))
        .with_state(app_state)
}
