use serde::Serialize;

use crate::domain::models::file::UploadResult;

#[derive(Debug, Serialize)]
pub struct UploadImageResponse {
    pub message: String,
    #[serde(rename = "blobUrl")]
    pub blob_url: String,
    #[serde(rename = "originalSize")]
    pub original_size: u64,
    #[serde(rename = "compressedSize")]
    pub compressed_size: u64,
}

impl From<UploadResult> for UploadImageResponse {
    fn from(result: UploadResult) -> Self {
        Self {
            message: "Image uploaded and compressed successfully.".to_string(),
            blob_url: result.blob_url,
            original_size: result.original_size,
            compressed_size: result.compressed_size,
        }
    }
}
