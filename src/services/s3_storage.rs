use std::time::Instant;

use async_trait::async_trait;
use aws_sdk_s3::{
    config::{BehaviorVersion, Credentials, Region},
    primitives::ByteStream,
    Client,
};
use bytes::Bytes;
use tracing::{error, info};

use crate::{
    application::services::StorageService,
    domain::{config::connection::S3Secrets, models::file::StoredObjectReference},
    services::error::StorageError,
};

pub struct S3StorageService {
    client: Client,
    bucket: String,
    region: String,
    endpoint: Option<String>,
    public_url: Option<String>,
}

impl S3StorageService {
    pub fn new(secrets: S3Secrets, bucket: String) -> Self {
        let credentials = Credentials::new(
            secrets.access_key_id,
            secrets.secret_access_key,
            None,
            None,
            "connection-string",
        );

        let mut builder = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(secrets.region.clone()))
            .credentials_provider(credentials);

        // S3-compatible hosts (MinIO, R2, Spaces) need path-style addressing.
        if let Some(ref endpoint) = secrets.endpoint {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        Self {
            client: Client::from_conf(builder.build()),
            bucket,
            region: secrets.region,
            endpoint: secrets.endpoint,
            public_url: secrets.public_url,
        }
    }

    fn object_url(&self, key: &str) -> String {
        object_url(
            self.public_url.as_deref(),
            self.endpoint.as_deref(),
            &self.bucket,
            &self.region,
            key,
        )
    }
}

fn object_url(
    public_url: Option<&str>,
    endpoint: Option<&str>,
    bucket: &str,
    region: &str,
    key: &str,
) -> String {
    match (public_url, endpoint) {
        (Some(base), _) => format!("{}/{}", base, key),
        (None, Some(endpoint)) => format!("{}/{}/{}", endpoint, bucket, key),
        (None, None) => format!("https://{}.s3.{}.amazonaws.com/{}", bucket, region, key),
    }
}

#[async_trait]
impl StorageService for S3StorageService {
    fn container(&self) -> &str {
        &self.bucket
    }

    async fn create_object(
        &self,
        name: &str,
        bytes: Bytes,
        content_type: &str,
    ) -> Result<StoredObjectReference, StorageError> {
        let size = bytes.len();
        let start = Instant::now();

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(name)
            .body(ByteStream::from(bytes))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| {
                let err = StorageError::from(e);
                error!(
                    error = %err,
                    bucket = %self.bucket,
                    key = %name,
                    size_bytes = size,
                    duration_ms = start.elapsed().as_millis() as u64,
                    "S3 upload failed"
                );
                err
            })?;

        info!(
            bucket = %self.bucket,
            key = %name,
            size_bytes = size,
            duration_ms = start.elapsed().as_millis() as u64,
            "S3 upload successful"
        );

        Ok(StoredObjectReference {
            name: name.to_string(),
            container: self.bucket.clone(),
            url: self.object_url(name),
        })
    }
}
