use serde::Serialize;
use thiserror::Error;

use crate::domain::models::format::{OutputFormat, Quality};

const DEFAULT_MAX_BODY_BYTES: usize = 25 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} environment variable must be set")]
    MissingVariable(&'static str),

    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },

    #[error("Invalid storage connection string: {0}")]
    InvalidConnectionString(String),

    #[error("Storage connection string is missing '{0}'")]
    MissingConnectionKey(String),
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum Provider {
    #[default]
    #[serde(rename = "s3")]
    S3,
    #[serde(rename = "local")]
    Local,
}

impl Provider {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "s3" => Some(Provider::S3),
            "local" => Some(Provider::Local),
            _ => None,
        }
    }
}

/// Everything the upload pipeline needs, collected once at startup.
#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub quality: Quality,
    pub format: OutputFormat,
    pub provider: Provider,
    pub connection_string: String,
    pub container_name: String,
    pub max_body_bytes: usize,
    /// Report missing-file and undecodable-image failures as 400 instead of 500.
    pub strict_status_codes: bool,
}

impl UploadConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let quality = Quality::parse_or_default(lookup("IMAGE_QUALITY").as_deref());

        let format = match lookup("OUTPUT_FORMAT") {
            Some(value) => OutputFormat::parse(&value).ok_or(ConfigError::InvalidValue {
                key: "OUTPUT_FORMAT",
                value,
            })?,
            None => OutputFormat::default(),
        };

        let provider = match lookup("STORAGE_PROVIDER") {
            Some(value) => Provider::parse(&value).ok_or(ConfigError::InvalidValue {
                key: "STORAGE_PROVIDER",
                value,
            })?,
            None => Provider::default(),
        };

        let connection_string = lookup("STORAGE_CONNECTION_STRING")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::MissingVariable("STORAGE_CONNECTION_STRING"))?;

        let container_name = lookup("STORAGE_CONTAINER_NAME")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::MissingVariable("STORAGE_CONTAINER_NAME"))?;

        let max_body_bytes = match lookup("MAX_BODY_BYTES") {
            Some(value) => value
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or(ConfigError::InvalidValue {
                    key: "MAX_BODY_BYTES",
                    value,
                })?,
            None => DEFAULT_MAX_BODY_BYTES,
        };

        let strict_status_codes = lookup("STRICT_STATUS_CODES")
            .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            quality,
            format,
            provider,
            connection_string,
            container_name,
            max_body_bytes,
            strict_status_codes,
        })
    }
}
