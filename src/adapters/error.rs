use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{error, warn};

use crate::application::error::ApplicationError;

/// How decode and codec failures are reported to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusMapping {
    /// Only a bad content type is a 400; every other failure is a 500.
    #[default]
    Reference,
    /// Missing files and undecodable images are reported as 400 as well.
    Strict,
}

impl StatusMapping {
    pub fn from_strict(strict: bool) -> Self {
        if strict {
            StatusMapping::Strict
        } else {
            StatusMapping::Reference
        }
    }
}

impl ApplicationError {
    pub fn status_code(&self, mapping: StatusMapping) -> StatusCode {
        match (self, mapping) {
            (ApplicationError::MalformedRequest, _) => StatusCode::BAD_REQUEST,
            (ApplicationError::NoFile | ApplicationError::Codec(_), StatusMapping::Strict) => {
                StatusCode::BAD_REQUEST
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub struct ErrorResponse {
    error: ApplicationError,
    mapping: StatusMapping,
}

impl ErrorResponse {
    pub fn new(error: ApplicationError, mapping: StatusMapping) -> Self {
        Self { error, mapping }
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        let status = self.error.status_code(self.mapping);

        if self.error.is_client_input() {
            warn!("Upload rejected: {}", self.error);
        } else {
            error!("Upload error: {}", self.error);
        }

        if let ApplicationError::MalformedRequest = self.error {
            return (status, self.error.to_string()).into_response();
        }

        let error_message = if status == StatusCode::BAD_REQUEST {
            format!("Bad request: {}", self.error)
        } else {
            format!("Internal server error: {}", self.error)
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
