//! `Accept-Encoding` negotiation and body compression.

use flate2::Compression;
use flate2::write::{DeflateEncoder, GzEncoder};
use serde::Deserialize;
use std::fmt;
use std::io::Write;

use crate::error::{Error, Result};
use crate::http::headers::HeaderStore;
use crate::http::quality::QualityWeightedHeader;

pub const ACCEPT_ENCODING: &str = "Accept-Encoding";

// Content codings as listed in MDN
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentCoding {
    Gzip,
    Compress,
    Deflate,
    Br,
    Zstd,
    Dcb,
    Dcz,
    Identity,
}

impl ContentCoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentCoding::Gzip => "gzip",
            ContentCoding::Compress => "compress",
            ContentCoding::Deflate => "deflate",
            ContentCoding::Br => "br",
            ContentCoding::Zstd => "zstd",
            ContentCoding::Dcb => "dcb",
            ContentCoding::Dcz => "dcz",
            ContentCoding::Identity => "identity",
        }
    }

    /// Case-insensitive. `x-gzip` is accepted as an alias of `gzip`.
    pub fn from_token(token: &str) -> Option<Self> {
        let coding = match token.trim().to_ascii_lowercase().as_str() {
            "gzip" | "x-gzip" => ContentCoding::Gzip,
            "compress" => ContentCoding::Compress,
            "deflate" => ContentCoding::Deflate,
            "br" => ContentCoding::Br,
            "zstd" => ContentCoding::Zstd,
            "dcb" => ContentCoding::Dcb,
            "dcz" => ContentCoding::Dcz,
            "identity" => ContentCoding::Identity,
            _ => return None,
        };
        Some(coding)
    }

    /// Whether [`compress`] can produce this coding.
    pub fn is_implemented(&self) -> bool {
        matches!(
            self,
            ContentCoding::Gzip | ContentCoding::Deflate | ContentCoding::Identity
        )
    }
}

impl fmt::Display for ContentCoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Picks the coding to answer with.
///
/// Walks `Accept-Encoding` by descending quality and returns the first entry
/// found in `supported` with a non-zero quality. A `*` entry stands for the
/// first supported coding not listed elsewhere in the header, so
/// `gzip;q=0, *` never yields gzip. Falls back to [`ContentCoding::Identity`].
pub fn negotiate_encoding<S: HeaderStore>(store: &S, supported: &[ContentCoding]) -> ContentCoding {
    negotiate_with(
        &QualityWeightedHeader::new(ACCEPT_ENCODING, store, false),
        supported,
    )
}

pub(crate) fn negotiate_with<S: HeaderStore>(
    header: &QualityWeightedHeader<'_, S>,
    supported: &[ContentCoding],
) -> ContentCoding {
    let values = header.values();
    let listed: Vec<ContentCoding> = values
        .iter()
        .filter_map(|entry| ContentCoding::from_token(&entry.value))
        .collect();

    for entry in &values {
        if entry.quality <= 0.0 {
            continue;
        }

        let token = entry.value.trim();
        let chosen = if token == "*" {
            supported
                .iter()
                .copied()
                .find(|coding| !listed.contains(coding))
        } else {
            ContentCoding::from_token(token).filter(|coding| supported.contains(coding))
        };

        if let Some(coding) = chosen {
            log::trace!("negotiated content coding {coding}");
            return coding;
        }
    }

    ContentCoding::Identity
}

/// Encodes `body` with `coding` at flate2 compression `level` (0-9).
pub fn compress(body: &[u8], coding: ContentCoding, level: u32) -> Result<Vec<u8>> {
    let level = Compression::new(level.min(9));
    match coding {
        ContentCoding::Gzip => {
            let mut e = GzEncoder::new(Vec::new(), level);
            e.write_all(body).map_err(Error::Compression)?;
            e.finish().map_err(Error::Compression)
        }
        ContentCoding::Deflate => {
            let mut e = DeflateEncoder::new(Vec::new(), level);
            e.write_all(body).map_err(Error::Compression)?;
            e.finish().map_err(Error::Compression)
        }
        ContentCoding::Identity => Ok(body.to_vec()),
        other => Err(Error::UnsupportedEncoding(other.as_str().to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::headers::{HeaderStoreMut, HttpHeaders};
    use flate2::read::{DeflateDecoder, GzDecoder};
    use std::io::Read;

    const SUPPORTED: [ContentCoding; 2] = [ContentCoding::Gzip, ContentCoding::Deflate];

    fn with_accept_encoding(value: &str) -> HttpHeaders {
        let mut headers = HttpHeaders::new();
        headers.set_header(ACCEPT_ENCODING, [value]);
        headers
    }

    #[test]
    fn tokens() {
        assert_eq!(ContentCoding::from_token("GZIP"), Some(ContentCoding::Gzip));
        assert_eq!(ContentCoding::from_token("x-gzip"), Some(ContentCoding::Gzip));
        assert_eq!(ContentCoding::from_token(" br "), Some(ContentCoding::Br));
        assert_eq!(ContentCoding::from_token("lzma"), None);
        assert_eq!(ContentCoding::Zstd.to_string(), "zstd");
    }

    #[test]
    fn absent_header_means_identity() {
        assert_eq!(
            negotiate_encoding(&HttpHeaders::new(), &SUPPORTED),
            ContentCoding::Identity
        );
    }

    #[test]
    fn highest_quality_supported_wins() {
        let headers = with_accept_encoding("br;q=1.0, deflate;q=0.8, gzip;q=0.5");
        assert_eq!(negotiate_encoding(&headers, &SUPPORTED), ContentCoding::Deflate);

        let headers = with_accept_encoding("gzip, deflate");
        assert_eq!(negotiate_encoding(&headers, &SUPPORTED), ContentCoding::Gzip);
    }

    #[test]
    fn zero_quality_is_refused() {
        let headers = with_accept_encoding("gzip;q=0, deflate;q=0");
        assert_eq!(negotiate_encoding(&headers, &SUPPORTED), ContentCoding::Identity);
    }

    #[test]
    fn wildcard_picks_first_supported() {
        let headers = with_accept_encoding("br;q=0.9, *;q=0.1");
        assert_eq!(negotiate_encoding(&headers, &SUPPORTED), ContentCoding::Gzip);
        assert_eq!(negotiate_encoding(&headers, &[]), ContentCoding::Identity);
    }

    #[test]
    fn wildcard_skips_refused_codings() {
        let headers = with_accept_encoding("gzip;q=0, *");
        assert_eq!(negotiate_encoding(&headers, &SUPPORTED), ContentCoding::Deflate);

        let headers = with_accept_encoding("*, deflate;q=0, gzip;q=0");
        assert_eq!(negotiate_encoding(&headers, &SUPPORTED), ContentCoding::Identity);

        let headers = with_accept_encoding("deflate;q=0.2, *;q=0.5");
        assert_eq!(negotiate_encoding(&headers, &SUPPORTED), ContentCoding::Gzip);
    }

    #[test]
    fn gzip_round_trip() {
        let body = b"hello hello hello hello hello".repeat(20);
        let packed = compress(&body, ContentCoding::Gzip, 6).unwrap();
        assert!(packed.len() < body.len());

        let mut unpacked = Vec::new();
        GzDecoder::new(packed.as_slice())
            .read_to_end(&mut unpacked)
            .unwrap();
        assert_eq!(unpacked, body);
    }

    #[test]
    fn deflate_round_trip() {
        let body = b"abcabcabcabcabcabc".to_vec();
        let packed = compress(&body, ContentCoding::Deflate, 9).unwrap();

        let mut unpacked = Vec::new();
        DeflateDecoder::new(packed.as_slice())
            .read_to_end(&mut unpacked)
            .unwrap();
        assert_eq!(unpacked, body);
    }

    #[test]
    fn identity_and_unsupported() {
        assert_eq!(compress(b"raw", ContentCoding::Identity, 6).unwrap(), b"raw");
        assert!(matches!(
            compress(b"raw", ContentCoding::Br, 6),
            Err(Error::UnsupportedEncoding(name)) if name == "br"
        ));
        assert!(!ContentCoding::Br.is_implemented());
    }
}
