use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

pub mod accept;
pub mod cookie;
pub mod encoding;
pub mod headers;
pub mod mime;
pub mod quality;
pub mod request;
pub mod response;
pub mod status;

/// An HTTP protocol version.
///
/// The minor version is optional because `HTTP/2` and `HTTP/3` are written
/// without one.
#[derive(PartialEq, Eq, PartialOrd, Ord, Debug, Clone, Copy, Hash)]
pub struct HttpVersion {
    pub major: u16,
    pub minor: Option<u16>,
}

impl HttpVersion {
    pub const V0_9: HttpVersion = HttpVersion::new(0, Some(9));
    pub const V1_0: HttpVersion = HttpVersion::new(1, Some(0));
    pub const V1_1: HttpVersion = HttpVersion::new(1, Some(1));
    pub const V2: HttpVersion = HttpVersion::new(2, None);
    pub const V3: HttpVersion = HttpVersion::new(3, None);

    pub const fn new(major: u16, minor: Option<u16>) -> Self {
        Self { major, minor }
    }

    /// Parses an HTTP version such as `HTTP/1.1`, `http/2` or `1.0`.
    ///
    /// With `full_width` the whole (trimmed) input must be the version string.
    /// Otherwise the first version-looking run inside a longer string is used,
    /// e.g. `"served over HTTP/1.0 today"`.
    pub fn parse(text: &str, full_width: bool) -> Result<Self> {
        let trimmed = text.trim();
        let start = if full_width {
            0
        } else {
            trimmed
                .find(|c: char| c.is_ascii_digit())
                .ok_or_else(|| Error::InvalidHttpVersion(text.to_string()))?
        };

        let mut rest = &trimmed[start..];
        if full_width && rest.get(..5).is_some_and(|p| p.eq_ignore_ascii_case("HTTP/")) {
            rest = &rest[5..];
        }

        let (major, after_major) = split_digits(rest);
        let major = major
            .parse::<u16>()
            .map_err(|_| Error::InvalidHttpVersion(text.to_string()))?;

        let (minor, remainder) = match after_major.strip_prefix('.') {
            Some(after_dot) => {
                let (minor, remainder) = split_digits(after_dot);
                match minor.parse::<u16>() {
                    Ok(minor) => (Some(minor), remainder),
                    Err(_) => (None, after_major),
                }
            }
            None => (None, after_major),
        };

        if full_width && !remainder.is_empty() {
            return Err(Error::InvalidHttpVersion(text.to_string()));
        }

        Ok(HttpVersion::new(major, minor))
    }

    /// Finds the first `major.minor` pair in `text`, or `HTTP/1.1` if there
    /// is none. A leading `v` or any surrounding prose is ignored.
    pub fn normalize(text: &str) -> Self {
        let bytes = text.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            if bytes[i].is_ascii_digit() && (i == 0 || !bytes[i - 1].is_ascii_digit()) {
                let (major, rest) = split_digits(&text[i..]);
                if let Some(after_dot) = rest.strip_prefix('.') {
                    let (minor, _) = split_digits(after_dot);
                    if let (Ok(major), Ok(minor)) = (major.parse::<u16>(), minor.parse::<u16>()) {
                        return HttpVersion::new(major, Some(minor));
                    }
                }
                i += major.len();
                continue;
            }
            i += 1;
        }

        HttpVersion::V1_1
    }

    /// Formats the version without the `HTTP/` prefix.
    pub fn to_bare_string(&self) -> String {
        match self.minor {
            Some(minor) => format!("{}.{}", self.major, minor),
            None => self.major.to_string(),
        }
    }
}

impl Default for HttpVersion {
    fn default() -> Self {
        HttpVersion::V1_1
    }
}

impl fmt::Display for HttpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP/{}", self.to_bare_string())
    }
}

fn split_digits(s: &str) -> (&str, &str) {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    s.split_at(end)
}

/// Registered HTTP methods, WebDAV and UPnP extensions included.
#[derive(PartialEq, Eq, Debug, Clone, Copy, Hash)]
pub enum HttpMethod {
    Acl,
    Bind,
    Checkout,
    Connect,
    Copy,
    Delete,
    Get,
    Head,
    Link,
    Lock,
    MSearch,
    Merge,
    MkActivity,
    MkCalendar,
    MkCol,
    Move,
    Notify,
    Options,
    Patch,
    Post,
    PropFind,
    PropPatch,
    Purge,
    Put,
    Rebind,
    Report,
    Search,
    Subscribe,
    Trace,
    Unbind,
    Unlink,
    Unlock,
    Unsubscribe,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Acl => "ACL",
            HttpMethod::Bind => "BIND",
            HttpMethod::Checkout => "CHECKOUT",
            HttpMethod::Connect => "CONNECT",
            HttpMethod::Copy => "COPY",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Get => "GET",
            HttpMethod::Head => "HEAD",
            HttpMethod::Link => "LINK",
            HttpMethod::Lock => "LOCK",
            HttpMethod::MSearch => "M-SEARCH",
            HttpMethod::Merge => "MERGE",
            HttpMethod::MkActivity => "MKACTIVITY",
            HttpMethod::MkCalendar => "MKCALENDAR",
            HttpMethod::MkCol => "MKCOL",
            HttpMethod::Move => "MOVE",
            HttpMethod::Notify => "NOTIFY",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Post => "POST",
            HttpMethod::PropFind => "PROPFIND",
            HttpMethod::PropPatch => "PROPPATCH",
            HttpMethod::Purge => "PURGE",
            HttpMethod::Put => "PUT",
            HttpMethod::Rebind => "REBIND",
            HttpMethod::Report => "REPORT",
            HttpMethod::Search => "SEARCH",
            HttpMethod::Subscribe => "SUBSCRIBE",
            HttpMethod::Trace => "TRACE",
            HttpMethod::Unbind => "UNBIND",
            HttpMethod::Unlink => "UNLINK",
            HttpMethod::Unlock => "UNLOCK",
            HttpMethod::Unsubscribe => "UNSUBSCRIBE",
        }
    }

    /// Methods whose requests are not expected to carry a body.
    pub fn is_bodyless(&self) -> bool {
        matches!(
            self,
            HttpMethod::Get | HttpMethod::Head | HttpMethod::Options | HttpMethod::Trace
        )
    }
}

impl FromStr for HttpMethod {
    type Err = Error;

    /// Method names are case-sensitive on the wire.
    fn from_str(method: &str) -> Result<Self> {
        let m = match method {
            "ACL" => HttpMethod::Acl,
            "BIND" => HttpMethod::Bind,
            "CHECKOUT" => HttpMethod::Checkout,
            "CONNECT" => HttpMethod::Connect,
            "COPY" => HttpMethod::Copy,
            "DELETE" => HttpMethod::Delete,
            "GET" => HttpMethod::Get,
            "HEAD" => HttpMethod::Head,
            "LINK" => HttpMethod::Link,
            "LOCK" => HttpMethod::Lock,
            "M-SEARCH" => HttpMethod::MSearch,
            "MERGE" => HttpMethod::Merge,
            "MKACTIVITY" => HttpMethod::MkActivity,
            "MKCALENDAR" => HttpMethod::MkCalendar,
            "MKCOL" => HttpMethod::MkCol,
            "MOVE" => HttpMethod::Move,
            "NOTIFY" => HttpMethod::Notify,
            "OPTIONS" => HttpMethod::Options,
            "PATCH" => HttpMethod::Patch,
            "POST" => HttpMethod::Post,
            "PROPFIND" => HttpMethod::PropFind,
            "PROPPATCH" => HttpMethod::PropPatch,
            "PURGE" => HttpMethod::Purge,
            "PUT" => HttpMethod::Put,
            "REBIND" => HttpMethod::Rebind,
            "REPORT" => HttpMethod::Report,
            "SEARCH" => HttpMethod::Search,
            "SUBSCRIBE" => HttpMethod::Subscribe,
            "TRACE" => HttpMethod::Trace,
            "UNBIND" => HttpMethod::Unbind,
            "UNLINK" => HttpMethod::Unlink,
            "UNLOCK" => HttpMethod::Unlock,
            "UNSUBSCRIBE" => HttpMethod::Unsubscribe,
            _ => return Err(Error::UnknownMethod(method.to_string())),
        };
        Ok(m)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_width_versions() {
        assert_eq!(HttpVersion::parse("HTTP/1.1", true).unwrap(), HttpVersion::V1_1);
        assert_eq!(HttpVersion::parse(" http/1.0 ", true).unwrap(), HttpVersion::V1_0);
        assert_eq!(HttpVersion::parse("2", true).unwrap(), HttpVersion::V2);
        assert!(HttpVersion::parse("HTTP/1.1 extra", true).is_err());
        assert!(HttpVersion::parse("foobar", true).is_err());
    }

    #[test]
    fn parse_embedded_version() {
        let v = HttpVersion::parse("served over HTTP/3 today", false).unwrap();
        assert_eq!(v, HttpVersion::V3);
        assert!(HttpVersion::parse("no digits here", false).is_err());
    }

    #[test]
    fn normalize_finds_major_minor() {
        assert_eq!(HttpVersion::normalize("4.2"), HttpVersion::new(4, Some(2)));
        assert_eq!(HttpVersion::normalize("v975.864"), HttpVersion::new(975, Some(864)));
        assert_eq!(
            HttpVersion::normalize("version: 8.12.18 of HTTP"),
            HttpVersion::new(8, Some(12))
        );
        assert_eq!(
            HttpVersion::normalize("but v4.5.9 doesn't work"),
            HttpVersion::new(4, Some(5))
        );
        assert_eq!(HttpVersion::normalize(""), HttpVersion::V1_1);
        assert_eq!(HttpVersion::normalize("foobar"), HttpVersion::V1_1);
    }

    #[test]
    fn version_display() {
        assert_eq!(HttpVersion::V1_1.to_string(), "HTTP/1.1");
        assert_eq!(HttpVersion::V2.to_string(), "HTTP/2");
        assert_eq!(HttpVersion::V1_0.to_bare_string(), "1.0");
        assert!(HttpVersion::V1_0 < HttpVersion::V1_1);
    }

    #[test]
    fn method_round_trip() {
        for name in ["GET", "M-SEARCH", "PROPPATCH", "UNSUBSCRIBE"] {
            let method: HttpMethod = name.parse().unwrap();
            assert_eq!(method.as_str(), name);
        }
        assert!(matches!("get".parse::<HttpMethod>(), Err(Error::UnknownMethod(_))));
    }

    #[test]
    fn bodyless_methods() {
        let bodyless = [
            HttpMethod::Get,
            HttpMethod::Head,
            HttpMethod::Options,
            HttpMethod::Trace,
        ];
        for method in bodyless {
            assert!(method.is_bodyless(), "{method}");
        }
        let with_body = [
            HttpMethod::Post,
            HttpMethod::Put,
            HttpMethod::Patch,
            HttpMethod::PropFind,
        ];
        for method in with_body {
            assert!(!method.is_bodyless(), "{method}");
        }
    }
}
