mod error;
mod image_codec;
mod local_storage;
mod s3_storage;

pub use error::StorageError;
pub use image_codec::{recompress, CodecError};
pub use local_storage::LocalStorageService;
pub use s3_storage::S3StorageService;

#[cfg(test)]
pub use image_codec::test_support;

use std::sync::Arc;

use crate::{
    application::services::StorageService,
    domain::config::{
        connection::{ConnectionString, LocalSettings, S3Secrets},
        upload::Provider,
    },
};

pub fn create_storage_service(
    provider: Provider,
    connection_string: &str,
    container: &str,
) -> Result<Arc<dyn StorageService>, StorageError> {
    let connection = ConnectionString::parse(connection_string)
        .map_err(|e| StorageError::InvalidCredentials(e.to_string()))?;

    match provider {
        Provider::S3 => {
            let secrets = S3Secrets::from_connection(&connection)
                .map_err(|e| StorageError::InvalidCredentials(e.to_string()))?;

            let service = S3StorageService::new(secrets, container.to_string());
            Ok(Arc::new(service))
        }
        Provider::Local => {
            let settings = LocalSettings::from_connection(&connection)
                .map_err(|e| StorageError::InvalidCredentials(e.to_string()))?;

            let service = LocalStorageService::new(settings, container.to_string());
            Ok(Arc::new(service))
        }
    }
}
