use crate::config::config;
use crate::http::accept::AcceptNegotiator;
use crate::http::cookie::RequestCookies;
use crate::http::encoding::{self, ACCEPT_ENCODING, ContentCoding};
use crate::http::headers::{HeaderStoreMut, HttpHeaders};
use crate::http::quality::QualityWeightedHeader;
use crate::http::{HttpMethod, HttpVersion};

/// Common HTTP request headers
/// This enum defines the set of headers that can be explicitly set on an
/// [`HttpRequest`] through its typed wrapper API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestHeader {
    Accept,
    AcceptCharset,
    AcceptEncoding,
    AcceptLanguage,
    Authorization,
    ContentLength,
    ContentType,
    Cookie,
    Host,
    Referer,
    UserAgent,
}

impl RequestHeader {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestHeader::Accept => "Accept",
            RequestHeader::AcceptCharset => "Accept-Charset",
            RequestHeader::AcceptEncoding => "Accept-Encoding",
            RequestHeader::AcceptLanguage => "Accept-Language",
            RequestHeader::Authorization => "Authorization",
            RequestHeader::ContentLength => "Content-Length",
            RequestHeader::ContentType => "Content-Type",
            RequestHeader::Cookie => "Cookie",
            RequestHeader::Host => "Host",
            RequestHeader::Referer => "Referer",
            RequestHeader::UserAgent => "User-Agent",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub uri: String,
    pub version: HttpVersion,

    // headers
    pub headers: HttpHeaders,
    pub body: Vec<u8>,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, uri: impl Into<String>) -> Self {
        Self {
            method,
            uri: uri.into(),
            version: config().http_version,
            headers: HttpHeaders::new(),
            body: Vec::new(),
        }
    }

    /// Sets a request header constrained to the allowed [`RequestHeader`] variants,
    /// replacing any previous instances.
    ///
    /// No validation is performed on the header value itself.
    pub fn set_header(&mut self, h: RequestHeader, value: &str) {
        self.headers.set_header(h.as_str(), [value]);
    }

    /// Media type negotiation over this request's `Accept` header.
    pub fn accept(&self) -> AcceptNegotiator<'_, HttpHeaders> {
        AcceptNegotiator::from_config(&self.headers)
    }

    pub fn cookies(&self) -> RequestCookies<'_, HttpHeaders> {
        RequestCookies::new(&self.headers)
    }

    pub fn accept_encoding(&self) -> QualityWeightedHeader<'_, HttpHeaders> {
        QualityWeightedHeader::new(
            ACCEPT_ENCODING,
            &self.headers,
            config().use_all_header_instances,
        )
    }

    /// The coding a response to this request should use, out of `supported`.
    pub fn preferred_encoding(&self, supported: &[ContentCoding]) -> ContentCoding {
        encoding::negotiate_with(&self.accept_encoding(), supported)
    }
}
