use std::path::PathBuf;

/// Errors surfaced by the fallible boundaries of the crate.
///
/// Negotiation itself never fails: malformed `Accept`-family values are
/// defaulted or dropped. Only cookie parsing, strict cookie serialization,
/// version/method parsing, compression and configuration loading return errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to parse cookie name from cookie: {0}")]
    MalformedCookie(String),

    #[error("Invalid cookie name: {0}")]
    InvalidCookieName(String),

    #[error("Failed to parse an HTTP version from: {0}")]
    InvalidHttpVersion(String),

    #[error("Unknown HTTP method: {0}")]
    UnknownMethod(String),

    #[error("Unsupported content coding: {0}")]
    UnsupportedEncoding(String),

    #[error("Compression error: {0}")]
    Compression(#[source] std::io::Error),

    #[error("Failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to deserialize config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config already set")]
    ConfigAlreadySet,
}

pub type Result<T> = std::result::Result<T, Error>;
