use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::path::Path;

use crate::error::{Error, Result};
use crate::http::HttpVersion;
use crate::http::encoding::ContentCoding;
use crate::http::headers::FieldCase;

static CONFIG: OnceCell<HttpConfig> = OnceCell::new();

/// Process-wide defaults for the message layer.
///
/// Nothing in the negotiation or cookie code requires a config to be set:
/// [`config`] hands out [`HttpConfig::default`] until [`set_config`] is called.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Aggregate every `Accept`-family header instance instead of only the
    /// authoritative (last set) one.
    pub use_all_header_instances: bool,

    /// Re-validate cookie names before emitting `Set-Cookie` values.
    pub strict_cookies: bool,

    pub field_case: FieldCase,
    pub use_original_field_names: bool,

    #[serde(deserialize_with = "deserialize_version")]
    pub http_version: HttpVersion,

    pub compression_level: u32,
    pub supported_encodings: Vec<ContentCoding>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            use_all_header_instances: false,
            strict_cookies: false,

            field_case: FieldCase::Title,
            use_original_field_names: true,

            http_version: HttpVersion::V1_1,

            compression_level: 6,
            supported_encodings: vec![ContentCoding::Gzip, ContentCoding::Deflate],
        }
    }
}

impl HttpConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str::<HttpConfig>(content)?)
    }

    /// Loads a TOML config file, falling back to the defaults when the file
    /// cannot be read or deserialized.
    pub fn from_file(path: impl AsRef<Path>) -> Self {
        match Self::try_from_file(path.as_ref()) {
            Ok(cfg) => cfg,
            Err(err) => {
                log::warn!("{err}");
                log::warn!("Fall back to default config");
                HttpConfig::default()
            }
        }
    }

    pub fn try_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml_str(&content)
    }
}

pub fn set_config(cfg: HttpConfig) -> Result<()> {
    CONFIG.set(cfg).map_err(|_| Error::ConfigAlreadySet)
}

pub fn config() -> &'static HttpConfig {
    CONFIG.get_or_init(HttpConfig::default)
}

fn deserialize_version<'de, D>(deserializer: D) -> std::result::Result<HttpVersion, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    HttpVersion::parse(&raw, true).map_err(serde::de::Error::custom)
}
