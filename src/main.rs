mod adapters;
mod application;
mod domain;
mod services;

use adapters::{router::build_router, state::AppState};
use application::pipeline::TransformPipeline;
use domain::config::upload::UploadConfig;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Initialize AWS SDK crypto provider (required for aws-sdk-s3)
    // This must be called before any AWS SDK operations
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let config = UploadConfig::from_env()
        .unwrap_or_else(|e| panic!("ERROR: invalid upload configuration: {}", e));

    tracing::info!(
        "Starting image-upload-service: provider={:?} container={} format={} quality={}",
        config.provider,
        config.container_name,
        config.format,
        config.quality.value()
    );

    let port = std::env::var("PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse::<u16>()
        .expect("PORT must be a valid u16");

    // Configure CORS
    let cors = if let Ok(allowed_origins) = std::env::var("CORS_ALLOWED_ORIGINS") {
        // Parse comma-separated origins
        let origins: Vec<_> = allowed_origins
            .split(',')
            .map(|s| s.trim().parse().expect("Invalid CORS origin"))
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        // Allow all origins if not specified (only for development)
        CorsLayer::permissive()
    };

    let storage_service = services::create_storage_service(
        config.provider,
        &config.connection_string,
        &config.container_name,
    )
    .expect("Failed to create storage service");

    let pipeline = TransformPipeline::new(storage_service, config.format, config.quality);
    let app_state = AppState::new(config, pipeline);

    let router = build_router(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start the server
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .expect("Failed to bind to port");

    tracing::info!("Server listening on 0.0.0.0:{}", port);

    axum::serve(listener, router)
        .await
        .expect("Failed to start server");
}
