//! Cookie parsing and serialization (RFC 6265).
//!
//! This module provides:
//! - [`parse_cookie`]: a `Set-Cookie`-style string into a [`Cookie`];
//! - [`stringify_cookie`] / [`Cookie`]'s `Display`: a [`Cookie`] back into a
//!   `Set-Cookie` value, attributes in a fixed conventional order;
//! - [`RequestCookies`]: name/value lookups in a request's `Cookie` header;
//! - [`set_cookie`] / [`response_cookies`]: `Set-Cookie` headers of a response.
//!
//! Request-side cookies carry only name/value pairs, so parsing a serialized
//! cookie as a request cookie recovers its name and value but no attributes.

use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::error::{Error, Result};
use crate::http::headers::{HeaderStore, HeaderStoreMut};

pub const COOKIE: &str = "Cookie";
pub const SET_COOKIE: &str = "Set-Cookie";

const NAME_DELIMITERS: &str = "()<>@,;:\\\"/[]?={}";

// 10000-01-01T00:00:00Z; IMF-fixdate has a four digit year
const HTTP_DATE_LIMIT: Duration = Duration::from_secs(253_402_300_800);

/// SameSite attribute for cookies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    /// Cookie is sent only with same-site requests.
    Strict,
    /// Cookie is sent with same-site requests and top-level navigations.
    Lax,
    /// Cookie is sent with all requests (requires Secure).
    None,
}

impl SameSite {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Strict => "Strict",
            Self::Lax => "Lax",
            Self::None => "None",
        }
    }

    /// Case-insensitive; any other value is `None` (the Option, not the variant).
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("strict") {
            Some(Self::Strict)
        } else if value.eq_ignore_ascii_case("lax") {
            Some(Self::Lax)
        } else if value.eq_ignore_ascii_case("none") {
            Some(Self::None)
        } else {
            Option::None
        }
    }
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP cookie.
///
/// Built either by [`parse_cookie`] or by [`Cookie::new`] and the `with_*`
/// methods, which consume and return the cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub expires: Option<SystemTime>,
    /// Seconds. Wins over `expires` when serializing.
    pub max_age: Option<i64>,
    pub domain: Option<String>,
    pub path: Option<String>,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: Option<SameSite>,
}

impl Cookie {
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            expires: None,
            max_age: None,
            domain: None,
            path: None,
            secure: false,
            http_only: false,
            same_site: None,
        }
    }

    /// A cookie that makes the client drop `name` immediately: empty value,
    /// expiring at the Unix epoch.
    #[must_use]
    pub fn removal(name: impl Into<String>) -> Self {
        Self::new(name, "").with_expires(UNIX_EPOCH)
    }

    #[must_use]
    pub fn with_expires(mut self, expires: SystemTime) -> Self {
        self.expires = Some(expires);
        self
    }

    #[must_use]
    pub fn with_max_age(mut self, seconds: i64) -> Self {
        self.max_age = Some(seconds);
        self
    }

    #[must_use]
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    #[must_use]
    pub fn with_http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    #[must_use]
    pub fn with_same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = Some(same_site);
        self
    }

    /// Whether the name matches the cookie-name grammar.
    pub fn has_valid_name(&self) -> bool {
        !self.name.is_empty() && self.name.chars().all(is_name_char)
    }
}

impl fmt::Display for Cookie {
    /// `Set-Cookie` form: `name=value` then `Max-Age` (else `Expires`),
    /// `Domain`, `Path`, `Secure`, `HttpOnly`, `SameSite`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)?;

        if let Some(max_age) = self.max_age {
            write!(f, "; Max-Age={max_age}")?;
        } else if let Some(expires) = self.expires.and_then(http_date) {
            write!(f, "; Expires={expires}")?;
        }
        if let Some(domain) = &self.domain {
            write!(f, "; Domain={domain}")?;
        }
        if let Some(path) = &self.path {
            write!(f, "; Path={path}")?;
        }
        if self.secure {
            f.write_str("; Secure")?;
        }
        if self.http_only {
            f.write_str("; HttpOnly")?;
        }
        if let Some(same_site) = self.same_site {
            write!(f, "; SameSite={same_site}")?;
        }
        Ok(())
    }
}

/// IMF-fixdate for `Expires`. Times before the epoch are written as the
/// epoch; times from year 10000 on cannot be written and are dropped.
fn http_date(expires: SystemTime) -> Option<String> {
    match expires.duration_since(UNIX_EPOCH) {
        Err(_) => Some(httpdate::fmt_http_date(UNIX_EPOCH)),
        Ok(since_epoch) if since_epoch >= HTTP_DATE_LIMIT => {
            log::debug!("cookie Expires beyond year 9999, leaving it out");
            None
        }
        Ok(_) => Some(httpdate::fmt_http_date(expires)),
    }
}

fn is_name_char(c: char) -> bool {
    c > '\x20' && !NAME_DELIMITERS.contains(c)
}

/// Parses a cookie string such as `id=a3fWa; Expires=Wed, 21 Oct 2015 07:28:00 GMT`.
///
/// Fails only when no `name=` prefix can be found. Unknown attributes,
/// unparsable dates or ages and unknown `SameSite` values are skipped.
pub fn parse_cookie(raw: &str) -> Result<Cookie> {
    let malformed = || Error::MalformedCookie(raw.to_string());

    let s = raw.trim_start();
    let name_end = s.find(|c: char| !is_name_char(c)).unwrap_or(s.len());
    if name_end == 0 {
        return Err(malformed());
    }
    let name = &s[..name_end];

    let rest = s[name_end..]
        .trim_start()
        .strip_prefix('=')
        .ok_or_else(malformed)?
        .trim_start();

    let mut value = None;
    let mut rest = rest;

    if let Some(quoted) = rest.strip_prefix('"') {
        if let Some(closing) = quoted.find('"') {
            value = Some(&quoted[..closing]);
            rest = &quoted[closing + 1..];
        }
    }

    let value = match value {
        Some(value) => value,
        None => match rest.find(';') {
            Some(semicolon) => {
                let value = &rest[..semicolon];
                rest = &rest[semicolon..];
                value
            }
            None => std::mem::take(&mut rest),
        },
    };

    let mut cookie = Cookie::new(name, value);

    for phrase in rest.split(';').map(str::trim) {
        if phrase.is_empty() {
            continue;
        }
        if phrase.eq_ignore_ascii_case("secure") {
            cookie.secure = true;
            continue;
        }
        if phrase.eq_ignore_ascii_case("httponly") {
            cookie.http_only = true;
            continue;
        }

        let mut parts = phrase.split('=');
        let (Some(key), Some(attr), None) = (parts.next(), parts.next(), parts.next()) else {
            log::debug!("skipping cookie attribute {phrase:?}");
            continue;
        };
        let attr = attr.trim();

        match key.trim().to_ascii_lowercase().as_str() {
            "expires" => match httpdate::parse_http_date(attr) {
                Ok(expires) => cookie.expires = Some(expires),
                Err(_) => log::debug!("unparsable cookie Expires {attr:?}"),
            },
            "max-age" => match attr.parse::<i64>() {
                Ok(max_age) => cookie.max_age = Some(max_age),
                Err(_) => log::debug!("unparsable cookie Max-Age {attr:?}"),
            },
            "domain" => cookie.domain = Some(attr.to_string()),
            "path" => cookie.path = Some(attr.to_string()),
            "samesite" => {
                cookie.same_site = SameSite::parse(attr);
                if cookie.same_site.is_none() {
                    log::debug!("unknown cookie SameSite {attr:?}");
                }
            }
            _ => log::debug!("skipping cookie attribute {phrase:?}"),
        }
    }

    Ok(cookie)
}

/// Serializes `cookie` as a `Set-Cookie` value.
///
/// With `strict`, the name is checked against the cookie-name grammar and the
/// value must not contain line breaks.
pub fn stringify_cookie(cookie: &Cookie, strict: bool) -> Result<String> {
    if strict && (!cookie.has_valid_name() || cookie.value.contains(['\r', '\n'])) {
        return Err(Error::InvalidCookieName(format!(
            "{}={}",
            cookie.name, cookie.value
        )));
    }
    Ok(cookie.to_string())
}

/// `Set-Cookie` value that expires `name` on the client right away.
pub fn unset_cookie(name: &str) -> String {
    Cookie::removal(name).to_string()
}

/// Appends a `Set-Cookie` header for `cookie`.
pub fn set_cookie<S: HeaderStoreMut>(store: &mut S, cookie: &Cookie, strict: bool) -> Result<()> {
    let value = stringify_cookie(cookie, strict)?;
    store.append_header(SET_COOKIE, [value]);
    Ok(())
}

/// Every parsable `Set-Cookie` header of a response, in header order.
pub fn response_cookies<S: HeaderStore>(store: &S) -> Vec<Cookie> {
    store
        .get_header(SET_COOKIE)
        .unwrap_or_default()
        .iter()
        .filter_map(|raw| match parse_cookie(raw) {
            Ok(cookie) => Some(cookie),
            Err(err) => {
                log::debug!("{err}");
                None
            }
        })
        .collect()
}

/// Name/value lookups in the `Cookie` header of a request.
///
/// The header is expected to be a single merged instance
/// (`a=1; b=2`); only the authoritative value is read.
#[derive(Debug)]
pub struct RequestCookies<'a, S: HeaderStore> {
    store: &'a S,
}

impl<'a, S: HeaderStore> RequestCookies<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// `(name, value)` pairs in header order. Segments without `=` are skipped.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        self.store
            .get_authoritative_header(COOKIE)
            .unwrap_or_default()
            .split(';')
            .filter_map(|pair| pair.trim().split_once('='))
    }

    pub fn has_cookie(&self, name: &str) -> bool {
        self.iter().any(|(n, _)| n == name)
    }

    /// Value of the first cookie called `name`. Names are case-sensitive.
    pub fn get_cookie(&self, name: &str) -> Option<&'a str> {
        self.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }

    pub fn to_cookies(&self) -> Vec<Cookie> {
        self.iter().map(|(n, v)| Cookie::new(n, v)).collect()
    }
}
