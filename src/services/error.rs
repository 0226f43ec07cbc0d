use aws_sdk_s3::error::{DisplayErrorContext, SdkError};
use aws_sdk_s3::operation::put_object::PutObjectError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("Object already exists: {0}")]
    AlreadyExists(String),

    #[error("Storage provider error: {0}")]
    ProviderError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<SdkError<PutObjectError>> for StorageError {
    fn from(error: SdkError<PutObjectError>) -> Self {
        let message = DisplayErrorContext(&error).to_string();
        match &error {
            SdkError::TimeoutError(_) => StorageError::NetworkError("Request timeout".to_string()),
            SdkError::DispatchFailure(_) => {
                StorageError::NetworkError(format!("Connection failed: {}", message))
            }
            SdkError::ServiceError(service_error) => match service_error.raw().status().as_u16() {
                401 | 403 => StorageError::Unauthorized(message),
                _ => StorageError::ProviderError(message),
            },
            _ => StorageError::InternalError(message),
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(error: std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::AlreadyExists => StorageError::AlreadyExists(error.to_string()),
            std::io::ErrorKind::PermissionDenied => StorageError::Unauthorized(error.to_string()),
            _ => StorageError::InternalError(error.to_string()),
        }
    }
}
