use crate::application::{decoder::MultipartError, error::ApplicationError};

const MULTIPART_FORM_DATA: &str = "multipart/form-data";

/// Fast-reject check run before any body bytes are read.
pub fn ensure_multipart(content_type: Option<&str>) -> Result<&str, ApplicationError> {
    match content_type {
        Some(value) if value.to_ascii_lowercase().contains(MULTIPART_FORM_DATA) => Ok(value),
        _ => Err(ApplicationError::MalformedRequest),
    }
}

/// Pulls the `boundary` parameter out of a multipart content-type header.
pub fn extract_boundary(content_type: &str) -> Result<String, MultipartError> {
    multer::parse_boundary(content_type).map_err(|e| match e {
        multer::Error::NoBoundary => MultipartError::MissingBoundary,
        other => MultipartError::Malformed(other),
    })
}
