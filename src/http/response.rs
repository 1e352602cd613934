use crate::config::config;
use crate::error::Result;
use crate::http::HttpVersion;
use crate::http::cookie::{self, Cookie};
use crate::http::encoding::{self, ContentCoding};
use crate::http::headers::{HeaderStore, HeaderStoreMut, HttpHeaders};
use crate::http::request::HttpRequest;
use crate::http::status::HttpStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseHeader {
    CacheControl,
    Connection,
    ContentEncoding,
    ContentLength,
    ContentType,
    Link,
    Location,
    Server,
    Vary,
}

impl ResponseHeader {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseHeader::CacheControl => "Cache-Control",
            ResponseHeader::Connection => "Connection",
            ResponseHeader::ContentEncoding => "Content-Encoding",
            ResponseHeader::ContentLength => "Content-Length",
            ResponseHeader::ContentType => "Content-Type",
            ResponseHeader::Link => "Link",
            ResponseHeader::Location => "Location",
            ResponseHeader::Server => "Server",
            ResponseHeader::Vary => "Vary",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: HttpStatus,
    pub version: HttpVersion,
    pub headers: HttpHeaders,
    pub body: Vec<u8>,
}

impl Default for HttpResponse {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpResponse {
    pub fn new() -> Self {
        Self::with_status(HttpStatus::Ok)
    }

    pub fn with_status(status: HttpStatus) -> Self {
        Self {
            status,
            version: config().http_version,
            headers: HttpHeaders::new(),
            body: Vec::new(),
        }
    }

    pub fn set_header(&mut self, h: ResponseHeader, value: &str) {
        self.headers.set_header(h.as_str(), [value]);
    }

    /// Replaces the body and updates `Content-Type` and `Content-Length`.
    pub fn set_body(&mut self, body: impl Into<Vec<u8>>, content_type: &str) {
        self.body = body.into();
        self.set_header(ResponseHeader::ContentType, content_type);
        self.set_header(ResponseHeader::ContentLength, &self.body.len().to_string());
    }

    /// Adds a `Set-Cookie` header. Fails only when strict cookies are
    /// configured and the cookie name is invalid.
    pub fn set_cookie(&mut self, cookie: &Cookie) -> Result<()> {
        cookie::set_cookie(&mut self.headers, cookie, config().strict_cookies)
    }

    /// Asks the client to drop the cookie called `name`.
    pub fn unset_cookie(&mut self, name: &str) {
        self.headers
            .append_header(cookie::SET_COOKIE, [cookie::unset_cookie(name)]);
    }

    /// Every cookie this response sets.
    pub fn cookies(&self) -> Vec<Cookie> {
        cookie::response_cookies(&self.headers)
    }

    /// Compresses the body with the best coding `req` accepts among the
    /// configured ones, returning the coding applied.
    ///
    /// Bodies that are empty, not allowed by the status, or already encoded
    /// are left alone.
    pub fn compress_for(&mut self, req: &HttpRequest) -> Result<ContentCoding> {
        let cfg = config();
        let supported: Vec<ContentCoding> = cfg
            .supported_encodings
            .iter()
            .copied()
            .filter(ContentCoding::is_implemented)
            .collect();

        if !supported.is_empty() {
            self.add_vary(encoding::ACCEPT_ENCODING);
        }
        if self.body.is_empty()
            || !self.status.allows_body()
            || self
                .headers
                .has_header(ResponseHeader::ContentEncoding.as_str())
        {
            return Ok(ContentCoding::Identity);
        }

        let coding = req.preferred_encoding(&supported);
        if coding == ContentCoding::Identity {
            return Ok(coding);
        }

        let original_len = self.body.len();
        self.body = encoding::compress(&self.body, coding, cfg.compression_level)?;
        log::debug!(
            "compressed response body with {coding}: {original_len} -> {} bytes",
            self.body.len()
        );

        self.set_header(ResponseHeader::ContentEncoding, coding.as_str());
        self.set_header(ResponseHeader::ContentLength, &self.body.len().to_string());
        Ok(coding)
    }

    // Vary is a list; keep it a single instance without duplicates
    fn add_vary(&mut self, field: &str) {
        let vary = ResponseHeader::Vary.as_str();
        let current = self.headers.get_authoritative_header(vary).unwrap_or_default();
        if current
            .split(',')
            .any(|v| v.trim().eq_ignore_ascii_case(field) || v.trim() == "*")
        {
            return;
        }

        let value = if current.trim().is_empty() {
            field.to_string()
        } else {
            format!("{current}, {field}")
        };
        self.headers.set_header(vary, [value]);
    }

    /// Status line and header block, terminated by the empty line.
    ///
    /// HTTP/<major>.<minor> <status> <reason>\r\n
    /// <header_name>: <header_value>\r\n
    /// ...
    /// \r\n
    pub fn build_head(&self) -> String {
        let cfg = config();
        format!(
            "{} {}\r\n{}\r\n",
            self.version,
            self.status,
            self.headers
                .stringify(cfg.field_case, cfg.use_original_field_names),
        )
    }

    /// Head followed by the body.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = self.build_head().into_bytes();
        bytes.extend_from_slice(&self.body);
        bytes
    }
}
