use std::{sync::Arc, time::Instant};

use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    application::{error::ApplicationError, services::StorageService},
    domain::models::{
        file::{ExtractedFile, UploadResult},
        format::{OutputFormat, Quality},
    },
    services::recompress,
};

/// Decode, recompress and store one uploaded image.
///
/// Stages run strictly in sequence. Nothing is written to the store unless the
/// codec stage succeeded, and the store write is a single object creation.
#[derive(Clone)]
pub struct TransformPipeline {
    store: Arc<dyn StorageService>,
    format: OutputFormat,
    quality: Quality,
}

impl TransformPipeline {
    pub fn new(store: Arc<dyn StorageService>, format: OutputFormat, quality: Quality) -> Self {
        Self {
            store,
            format,
            quality,
        }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn quality(&self) -> Quality {
        self.quality
    }

    pub fn container(&self) -> &str {
        self.store.container()
    }

    pub async fn run(&self, file: ExtractedFile) -> Result<UploadResult, ApplicationError> {
        let original_size = file.size();
        let (format, quality) = (self.format, self.quality);
        let start = Instant::now();

        // The codec is CPU bound; keep it off the async workers.
        let input = file.into_bytes();
        let artifact = tokio::task::spawn_blocking(move || recompress(&input, format, quality))
            .await
            .map_err(|e| ApplicationError::Internal(format!("codec task failed: {}", e)))?
            .map_err(|e| {
                warn!("Rejected upload of {} bytes: {}", original_size, e);
                e
            })?;

        info!(
            original_size,
            compressed_size = artifact.size(),
            format = %format,
            quality = quality.value(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Image recompressed"
        );

        let name = object_name(format);
        let compressed_size = artifact.size();

        let reference = self
            .store
            .create_object(&name, artifact.bytes, format.mime_type())
            .await
            .map_err(|e| {
                error!(
                    "Failed to store {} in {}: {}",
                    name,
                    self.store.container(),
                    e
                );
                e
            })?;

        info!("Stored {} ({} bytes) at {}", reference.name, compressed_size, reference.url);

        Ok(UploadResult {
            original_size,
            compressed_size,
            blob_url: reference.url,
        })
    }
}

fn object_name(format: OutputFormat) -> String {
    format!("{}.{}", Uuid::new_v4(), format.extension())
}
