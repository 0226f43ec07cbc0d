use thiserror::Error;

use crate::{
    application::decoder::MultipartError, services::CodecError, services::StorageError,
};

#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Missing or non-multipart content type; rejected before the body is read.
    #[error("Please send multipart/form-data with an image file.")]
    MalformedRequest,

    #[error("No file found in request")]
    NoFile,

    #[error(transparent)]
    Parse(#[from] MultipartError),

    #[error("Failed to read request body: {0}")]
    Transport(String),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Whether the failure was caused by what the client sent rather than by
    /// this service or its store.
    pub fn is_client_input(&self) -> bool {
        matches!(
            self,
            ApplicationError::MalformedRequest
                | ApplicationError::NoFile
                | ApplicationError::Parse(_)
                | ApplicationError::Codec(_)
        )
    }
}
