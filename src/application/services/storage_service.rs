use async_trait::async_trait;
use bytes::Bytes;

use crate::{domain::models::file::StoredObjectReference, services::StorageError};

/// Write side of an object store: one atomic object creation per call.
#[async_trait]
pub trait StorageService: Send + Sync {
    /// Bucket or container the objects land in.
    fn container(&self) -> &str;

    async fn create_object(
        &self,
        name: &str,
        bytes: Bytes,
        content_type: &str,
    ) -> Result<StoredObjectReference, StorageError>;
}
