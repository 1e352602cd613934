//! HTTP headers abstraction for [`HttpRequest`](crate::http::request::HttpRequest) and
//! [`HttpResponse`](crate::http::response::HttpResponse)
//!
//! Headers are stored in an ordered map keyed by the standardized (lower-case)
//! field name, so every lookup is case-insensitive. Each field keeps all of its
//! raw values in the order they were added, together with the spelling of the
//! field name each value was received or set with.
//!
//! Values are raw strings: nothing here splits comma-separated lists or
//! validates grammar. Higher-level readers such as
//! [`AcceptNegotiator`](crate::http::accept::AcceptNegotiator) and
//! [`RequestCookies`](crate::http::cookie::RequestCookies) interpret them, and
//! only through the [`HeaderStore`] / [`HeaderStoreMut`] traits.
//!
//! When the same field appears several times, the *authoritative* value is
//! the last one set.

use indexmap::IndexMap;
use serde::Deserialize;

/// Read access to a header collection.
pub trait HeaderStore {
    /// True if at least one value is present for `field`.
    fn has_header(&self, field: &str) -> bool;

    /// All raw values for `field` in append order, or `None` when absent.
    fn get_header(&self, field: &str) -> Option<&[String]>;

    /// The most recently set value for `field`.
    fn get_authoritative_header(&self, field: &str) -> Option<&str> {
        self.get_header(field)
            .and_then(|values| values.last())
            .map(String::as_str)
    }
}

/// Write access to a header collection.
pub trait HeaderStoreMut: HeaderStore {
    /// Replaces every prior instance of `field` with `values`, one header
    /// instance per value.
    fn set_header(&mut self, field: &str, values: impl IntoIterator<Item = impl Into<String>>);

    /// Adds `values` as new instances of `field`, keeping existing ones.
    fn append_header(&mut self, field: &str, values: impl IntoIterator<Item = impl Into<String>>);

    /// Drops every instance of `field`, returning the removed values.
    fn remove_header(&mut self, field: &str) -> Option<Vec<String>>;
}

/// Case transformation applied to field names when serializing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldCase {
    /// Emit the name untouched.
    Preserve,
    Lower,
    Upper,
    /// `content-security-policy` -> `Content-Security-Policy`
    #[default]
    Title,
}

impl FieldCase {
    pub fn apply(&self, field: &str) -> String {
        match self {
            FieldCase::Preserve => field.to_string(),
            FieldCase::Lower => field.to_ascii_lowercase(),
            FieldCase::Upper => field.to_ascii_uppercase(),
            FieldCase::Title => field
                .split('-')
                .map(|component| {
                    let mut chars = component.chars();
                    match chars.next() {
                        Some(first) => {
                            first.to_ascii_uppercase().to_string()
                                + &chars.as_str().to_ascii_lowercase()
                        }
                        None => String::new(),
                    }
                })
                .collect::<Vec<_>>()
                .join("-"),
        }
    }
}

/// Lookup form of a header field name.
pub fn standardize_field(field: &str) -> String {
    field.to_ascii_lowercase()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct HeaderEntry {
    // original_fields[i] is the spelling `values[i]` was set with
    original_fields: Vec<String>,
    values: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpHeaders {
    headers: IndexMap<String, HeaderEntry>,
}

impl HttpHeaders {
    pub fn new() -> Self {
        Self {
            headers: IndexMap::new(),
        }
    }

    pub fn empty() -> Self {
        Self::new()
    }

    /// Structural deep copy of `other`; later changes to either side are not
    /// observed by the other.
    pub fn from_existing(other: &HttpHeaders) -> Self {
        other.clone()
    }

    /// Builds a store from `(name, value)` pairs as they appeared on the wire.
    /// Repeated names become repeated instances of the same field.
    pub fn from_raw_headers<N, V>(raw: impl IntoIterator<Item = (N, V)>) -> Self
    where
        N: AsRef<str>,
        V: Into<String>,
    {
        let mut headers = Self::new();
        for (name, value) in raw {
            headers.append_header(name.as_ref(), [value]);
        }
        headers
    }

    /// Standardized field names in insertion order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.headers.keys().map(String::as_str)
    }

    pub fn original_fields(&self, field: &str) -> Option<&[String]> {
        self.headers
            .get(&standardize_field(field))
            .filter(|entry| !entry.values.is_empty())
            .map(|entry| entry.original_fields.as_slice())
    }

    /// Number of distinct fields.
    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Every header instance as `(original name, value)`.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers.values().flat_map(|entry| {
            entry
                .original_fields
                .iter()
                .zip(entry.values.iter())
                .map(|(name, value)| (name.as_str(), value.as_str()))
        })
    }

    /// Serializes every header instance as `Name: value\r\n`.
    ///
    /// With `use_original_names` the spelling each value was set with is used,
    /// otherwise the standardized name. `case` is applied afterwards.
    pub fn stringify(&self, case: FieldCase, use_original_names: bool) -> String {
        let mut result = String::new();
        for (standardized, entry) in &self.headers {
            for (index, value) in entry.values.iter().enumerate() {
                let name = match entry.original_fields.get(index) {
                    Some(original) if use_original_names => original.as_str(),
                    _ => standardized.as_str(),
                };
                result.push_str(&format!("{}: {}\r\n", case.apply(name), value));
            }
        }
        result
    }

    fn entry(&self, field: &str) -> Option<&HeaderEntry> {
        self.headers
            .get(&standardize_field(field))
            .filter(|entry| !entry.values.is_empty())
    }
}

impl HeaderStore for HttpHeaders {
    fn has_header(&self, field: &str) -> bool {
        self.entry(field).is_some()
    }

    fn get_header(&self, field: &str) -> Option<&[String]> {
        self.entry(field).map(|entry| entry.values.as_slice())
    }
}

impl HeaderStoreMut for HttpHeaders {
    fn set_header(&mut self, field: &str, values: impl IntoIterator<Item = impl Into<String>>) {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            self.headers.shift_remove(&standardize_field(field));
            return;
        }

        let entry = HeaderEntry {
            original_fields: vec![field.to_string(); values.len()],
            values,
        };
        self.headers.insert(standardize_field(field), entry);
    }

    fn append_header(&mut self, field: &str, values: impl IntoIterator<Item = impl Into<String>>) {
        let mut values = values.into_iter().map(Into::into).peekable();
        if values.peek().is_none() {
            return;
        }

        let entry = self.headers.entry(standardize_field(field)).or_default();
        for value in values {
            entry.original_fields.push(field.to_string());
            entry.values.push(value);
        }
    }

    fn remove_header(&mut self, field: &str) -> Option<Vec<String>> {
        self.headers
            .shift_remove(&standardize_field(field))
            .map(|entry| entry.values)
            .filter(|values| !values.is_empty())
    }
}
