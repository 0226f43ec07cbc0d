//! Multipart decoding: turns a `multipart/form-data` request body into the single
//! uploaded file it carries.

mod content_type;
mod form;

pub use content_type::{ensure_multipart, extract_boundary};
pub use form::FormDecoder;

use bytes::Bytes;
use futures::Stream;
use thiserror::Error;
use tracing::debug;

use crate::{application::error::ApplicationError, domain::models::file::ExtractedFile};

#[derive(Debug, Error)]
pub enum MultipartError {
    #[error("Multipart: Boundary not found")]
    MissingBoundary,

    #[error("Unexpected end of form")]
    UnexpectedEnd,

    #[error(transparent)]
    Malformed(multer::Error),
}

/// Runs `body` through a [`FormDecoder`] and returns the extracted file once the
/// closing boundary has been consumed.
///
/// Errors yielded by the stream itself surface as [`ApplicationError::Transport`].
pub async fn decode_upload<S, O, E>(content_type: &str, body: S) -> Result<ExtractedFile, ApplicationError>
where
    S: Stream<Item = Result<O, E>> + Send + 'static,
    O: Into<Bytes> + 'static,
    E: Into<Box<dyn std::error::Error + Send + Sync>> + 'static,
{
    let boundary = extract_boundary(content_type)?;
    let mut decoder = FormDecoder::new(body, boundary);

    let result = decoder.decode().await;
    debug!(parts = decoder.parts(), state = ?decoder.state(), "Multipart stream consumed");
    result
}
