use std::collections::HashMap;

use crate::domain::config::upload::ConfigError;

const DEFAULT_REGION: &str = "us-east-1";

/// Parsed `Key=Value;Key=Value` storage connection string.
///
/// Keys are matched case-insensitively. Values keep everything after the first `=`,
/// so secrets containing `=` survive.
#[derive(Debug, Clone, Default)]
pub struct ConnectionString {
    values: HashMap<String, String>,
}

impl ConnectionString {
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let mut values = HashMap::new();

        for segment in raw.split(';') {
            let segment = segment.trim();
            if segment.is_empty() {
                continue;
            }

            let (key, value) = segment.split_once('=').ok_or_else(|| {
                ConfigError::InvalidConnectionString(format!(
                    "segment '{}' is not a Key=Value pair",
                    key_hint(segment)
                ))
            })?;

            let key = key.trim().to_lowercase();
            if key.is_empty() {
                return Err(ConfigError::InvalidConnectionString(
                    "empty key".to_string(),
                ));
            }
            values.insert(key, value.trim().to_string());
        }

        Ok(Self { values })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(&key.to_lowercase())
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    fn require(&self, key: &str) -> Result<&str, ConfigError> {
        self.get(key)
            .ok_or_else(|| ConfigError::MissingConnectionKey(key.to_string()))
    }
}

// Never echo a whole segment back: it may be a secret missing its key.
fn key_hint(segment: &str) -> String {
    segment.chars().take(4).chain("...".chars()).collect()
}

#[derive(Debug, Clone)]
pub struct S3Secrets {
    pub endpoint: Option<String>,
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub public_url: Option<String>,
}

impl S3Secrets {
    pub fn from_connection(conn: &ConnectionString) -> Result<Self, ConfigError> {
        Ok(Self {
            endpoint: conn.get("Endpoint").map(|s| s.trim_end_matches('/').to_string()),
            region: conn.get("Region").unwrap_or(DEFAULT_REGION).to_string(),
            access_key_id: conn.require("AccessKeyId")?.to_string(),
            secret_access_key: conn.require("SecretAccessKey")?.to_string(),
            public_url: conn.get("PublicUrl").map(|s| s.trim_end_matches('/').to_string()),
        })
    }
}

#[derive(Debug, Clone)]
pub struct LocalSettings {
    pub path: String,
    pub public_url: Option<String>,
}

impl LocalSettings {
    pub fn from_connection(conn: &ConnectionString) -> Result<Self, ConfigError> {
        Ok(Self {
            path: conn.require("Path")?.to_string(),
            public_url: conn.get("PublicUrl").map(|s| s.trim_end_matches('/').to_string()),
        })
    }
}
