use std::fmt;

use serde::Serialize;

/// Target encoding for stored images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    WebP,
    Jpeg,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "webp" => Some(OutputFormat::WebP),
            "jpeg" | "jpg" => Some(OutputFormat::Jpeg),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::WebP => "webp",
            OutputFormat::Jpeg => "jpg",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::WebP => "image/webp",
            OutputFormat::Jpeg => "image/jpeg",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Lossy compression quality, always within 1..=100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Quality(u8);

impl Quality {
    pub const DEFAULT: Quality = Quality(80);

    pub fn new(value: u8) -> Option<Self> {
        (1..=100).contains(&value).then_some(Quality(value))
    }

    /// Absent, non-numeric and out-of-range values all fall back to the default.
    pub fn parse_or_default(raw: Option<&str>) -> Self {
        raw.and_then(|s| s.trim().parse::<u8>().ok())
            .and_then(Quality::new)
            .unwrap_or(Quality::DEFAULT)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Quality::DEFAULT
    }
}
