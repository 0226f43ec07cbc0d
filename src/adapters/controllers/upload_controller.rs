use std::convert::Infallible;

use axum::{
    body::{self, Body, Bytes},
    extract::State,
    http::{header, HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use futures::stream;
use tracing::info;

use crate::{
    adapters::{dto::upload_dto::UploadImageResponse, error::ErrorResponse, state::AppState},
    application::{
        decoder::{decode_upload, ensure_multipart},
        error::ApplicationError,
    },
    domain::models::file::UploadResult,
};

/// Size of the slices the buffered body is re-streamed to the decoder in.
const DECODE_CHUNK_SIZE: usize = 64 * 1024;

pub struct UploadController;

impl UploadController {
    /// Accepts a multipart upload with one image file, recompresses it and stores it.
    /// POST /api/v1/images
    pub async fn upload_image(
        State(app_state): State<AppState>,
        uri: Uri,
        headers: HeaderMap,
        body: Body,
    ) -> Response {
        info!("Received upload request at {}", uri);

        match Self::process(&app_state, &headers, body).await {
            Ok(result) => {
                (StatusCode::OK, Json(UploadImageResponse::from(result))).into_response()
            }
            Err(e) => ErrorResponse::new(e, app_state.status_mapping()).into_response(),
        }
    }

    async fn process(
        app_state: &AppState,
        headers: &HeaderMap,
        body: Body,
    ) -> Result<UploadResult, ApplicationError> {
        // VALIDATE CONTENT TYPE BEFORE READING THE BODY (fail-fast)
        let content_type = headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok());
        let content_type = ensure_multipart(content_type)?;

        let body = body::to_bytes(body, app_state.config.max_body_bytes)
            .await
            .map_err(|e| ApplicationError::Transport(e.to_string()))?;

        let file = decode_upload(content_type, stream::iter(rechunk(body))).await?;
        info!("Image parsed from request. Size: {}", file.size());

        app_state.pipeline.run(file).await
    }
}

fn rechunk(body: Bytes) -> Vec<Result<Bytes, Infallible>> {
    let mut chunks = Vec::with_capacity(body.len() / DECODE_CHUNK_SIZE + 1);
    let mut offset = 0;
    while offset < body.len() {
        let end = (offset + DECODE_CHUNK_SIZE).min(body.len());
        chunks.push(Ok(body.slice(offset..end)));
        offset = end;
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        adapters::router::build_router,
        application::{
            decoder::test_support::{content_type, FormBody},
            pipeline::TransformPipeline,
            services::StorageService,
        },
        domain::{
            config::{
                connection::LocalSettings,
                upload::{Provider, UploadConfig},
            },
            models::{
                file::StoredObjectReference,
                format::{OutputFormat, Quality},
            },
        },
        services::{test_support::sample_png, LocalStorageService, StorageError},
    };
    use async_trait::async_trait;
    use axum::{http::Request, Router};
    use http_body_util::BodyExt;
    use serde_json::Value;
    use std::sync::Arc;
    use tempfile::TempDir;
    use tower::ServiceExt;

    const URI: &str = "/api/v1/images";

    fn config(strict: bool, max_body_bytes: usize) -> UploadConfig {
        UploadConfig {
            quality: Quality::DEFAULT,
            format: OutputFormat::WebP,
            provider: Provider::Local,
            connection_string: String::new(),
            container_name: "images".to_string(),
            max_body_bytes,
            strict_status_codes: strict,
        }
    }

    fn app_with_store(store: Arc<dyn StorageService>, config: UploadConfig) -> Router {
        let pipeline = TransformPipeline::new(store, config.format, config.quality);
        build_router(AppState::new(config, pipeline))
    }

    fn local_app(strict: bool) -> (Router, TempDir) {
        let temp = tempfile::tempdir().unwrap();
        let store = LocalStorageService::new(
            LocalSettings {
                path: temp.path().to_string_lossy().into_owned(),
                public_url: Some("https://cdn.example.com".to_string()),
            },
            "images".to_string(),
        );
        (
            app_with_store(Arc::new(store), config(strict, 10 * 1024 * 1024)),
            temp,
        )
    }

    struct FailingStore;

    #[async_trait]
    impl StorageService for FailingStore {
        fn container(&self) -> &str {
            "images"
        }

        async fn create_object(
            &self,
            _name: &str,
            _bytes: Bytes,
            _content_type: &str,
        ) -> Result<StoredObjectReference, StorageError> {
            Err(StorageError::NetworkError("Connection failed: store unreachable".to_string()))
        }
    }

    fn multipart_request(body: Vec<u8>) -> Request<Body> {
        Request::post(URI)
            .header(header::CONTENT_TYPE, content_type())
            .body(Body::from(body))
            .unwrap()
    }

    async fn read_body(response: Response) -> Bytes {
        response.into_body().collect().await.unwrap().to_bytes()
    }

    async fn read_json(response: Response) -> Value {
        serde_json::from_slice(&read_body(response).await).unwrap()
    }

    #[tokio::test]
    async fn uploads_png_and_returns_sizes_and_url() {
        let (app, temp) = local_app(false);
        let png = sample_png(96, 64);
        let body = FormBody::new()
            .field("description", "a test image")
            .file("image", "photo.png", &png)
            .build();

        let response = app.oneshot(multipart_request(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = read_json(response).await;
        assert_eq!(json["originalSize"], png.len() as u64);
        assert!(json["compressedSize"].as_u64().unwrap() > 0);
        assert!(json["message"].as_str().is_some());

        let url = json["blobUrl"].as_str().unwrap();
        let name = url
            .strip_prefix("https://cdn.example.com/images/")
            .unwrap();
        assert!(name.ends_with(".webp"));

        let stored = std::fs::read(temp.path().join("images").join(name)).unwrap();
        assert_eq!(stored.len() as u64, json["compressedSize"].as_u64().unwrap());
        assert_eq!(&stored[8..12], b"WEBP");
    }

    #[tokio::test]
    async fn same_image_twice_gets_two_urls() {
        let (app, _temp) = local_app(false);
        let png = sample_png(32, 32);

        let mut urls = Vec::new();
        for _ in 0..2 {
            let body = FormBody::new().file("image", "same.png", &png).build();
            let response = app.clone().oneshot(multipart_request(body)).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            urls.push(read_json(response).await["blobUrl"].as_str().unwrap().to_string());
        }

        assert_ne!(urls[0], urls[1]);
    }

    #[tokio::test]
    async fn non_multipart_content_types_are_rejected() {
        for content_type in [Some("text/plain"), Some("application/json"), Some(""), None] {
            let (app, temp) = local_app(false);
            let mut request = Request::post(URI);
            if let Some(ct) = content_type {
                request = request.header(header::CONTENT_TYPE, ct);
            }
            let request = request.body(Body::from("hello")).unwrap();

            let response = app.oneshot(request).await.unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert_eq!(
                read_body(response).await,
                "Please send multipart/form-data with an image file."
            );
            assert!(!temp.path().join("images").exists());
        }
    }

    #[tokio::test]
    async fn non_image_file_is_a_codec_failure() {
        let (app, temp) = local_app(false);
        let garbage: Vec<u8> = (0..2048u32).map(|i| (i * 7919 % 251) as u8).collect();
        let body = FormBody::new().file("image", "random.bin", &garbage).build();

        let response = app.oneshot(multipart_request(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = read_json(response).await;
        assert!(json["error"]
            .as_str()
            .unwrap()
            .contains("Unable to decode image"));
        assert!(!temp.path().join("images").exists());
    }

    #[tokio::test]
    async fn form_without_file_reports_missing_file() {
        let (app, _temp) = local_app(false);
        let body = FormBody::new().field("name", "no file here").build();

        let response = app.oneshot(multipart_request(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = read_json(response).await;
        assert_eq!(
            json["error"],
            "Internal server error: No file found in request"
        );
    }

    #[tokio::test]
    async fn strict_mapping_reports_client_defects_as_bad_request() {
        let (app, _temp) = local_app(true);

        let body = FormBody::new().field("name", "no file here").build();
        let response = app.clone().oneshot(multipart_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(read_json(response).await["error"]
            .as_str()
            .unwrap()
            .contains("No file found in request"));

        let body = FormBody::new().file("image", "x.bin", b"not an image").build();
        let response = app.oneshot(multipart_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn truncated_multipart_is_a_server_error() {
        let (app, _temp) = local_app(true);
        let mut body = FormBody::new().file("image", "a.png", &sample_png(8, 8)).build();
        body.truncate(body.len() - 12);

        let response = app.oneshot(multipart_request(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(read_json(response).await["error"]
            .as_str()
            .unwrap()
            .contains("Unexpected end of form"));
    }

    #[tokio::test]
    async fn storage_failure_is_a_server_error() {
        let app = app_with_store(Arc::new(FailingStore), config(true, 1024 * 1024));
        let body = FormBody::new().file("image", "a.png", &sample_png(16, 16)).build();

        let response = app.oneshot(multipart_request(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(read_json(response).await["error"]
            .as_str()
            .unwrap()
            .contains("store unreachable"));
    }

    #[tokio::test]
    async fn oversized_body_is_a_transport_failure() {
        let temp = tempfile::tempdir().unwrap();
        let store = LocalStorageService::new(
            LocalSettings {
                path: temp.path().to_string_lossy().into_owned(),
                public_url: None,
            },
            "images".to_string(),
        );
        let app = app_with_store(Arc::new(store), config(false, 256));
        let body = FormBody::new().file("image", "a.png", &sample_png(64, 64)).build();

        let response = app.oneshot(multipart_request(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(read_json(response).await["error"]
            .as_str()
            .unwrap()
            .contains("Failed to read request body"));
    }

    #[tokio::test]
    async fn health_reports_pipeline_settings() {
        let (app, _temp) = local_app(false);

        let response = app
            .oneshot(Request::get("/api/v1/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = read_json(response).await;
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["provider"], "local");
        assert_eq!(json["container"], "images");
        assert_eq!(json["format"], "webp");
        assert_eq!(json["quality"], 80);
    }

    #[test]
    fn rechunk_preserves_bytes() {
        let data: Vec<u8> = (0..(DECODE_CHUNK_SIZE * 2 + 17)).map(|i| i as u8).collect();
        let chunks = rechunk(Bytes::from(data.clone()));

        assert_eq!(chunks.len(), 3);
        let joined: Vec<u8> = chunks
            .into_iter()
            .flat_map(|c| c.unwrap().to_vec())
            .collect();
        assert_eq!(joined, data);
        assert!(rechunk(Bytes::new()).is_empty());
    }
}
