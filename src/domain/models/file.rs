use bytes::Bytes;

use crate::domain::models::format::{OutputFormat, Quality};

/// The contents of the single file part pulled out of a multipart upload.
///
/// Never empty: a request without usable file bytes fails in the decoder instead
/// of producing an empty value.
#[derive(Debug, Clone)]
pub struct ExtractedFile {
    bytes: Bytes,
}

impl ExtractedFile {
    pub fn new(bytes: Bytes) -> Option<Self> {
        if bytes.is_empty() {
            None
        } else {
            Some(Self { bytes })
        }
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

#[derive(Debug, Clone)]
pub struct CompressedArtifact {
    pub bytes: Bytes,
    pub format: OutputFormat,
    pub quality: Quality,
}

impl CompressedArtifact {
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObjectReference {
    pub name: String,
    pub container: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadResult {
    pub original_size: u64,
    pub compressed_size: u64,
    pub blob_url: String,
}
