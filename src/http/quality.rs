//! Quality-weighted header values (`token;q=0.8`).
//!
//! Shared by `Accept`, `Accept-Encoding`, `Accept-Language`, `Accept-Charset`
//! and friends. Parsing is lenient: a value whose `q` parameter cannot be read
//! keeps its full text and a quality of `1`.

use crate::http::headers::HeaderStore;

#[derive(Debug, Clone, PartialEq)]
pub struct QualityValue {
    /// Everything before the final `;` parameter, or the whole raw value.
    pub value: String,
    /// Relative quality factor. Conceptually in `[0, 1]` but not range-checked.
    pub quality: f32,
}

impl QualityValue {
    pub fn new(value: impl Into<String>, quality: f32) -> Self {
        Self {
            value: value.into(),
            quality,
        }
    }
}

/// Parses a single `value[;q=factor]` item.
///
/// Only the parameter after the *last* `;` is inspected, and the first number
/// found in it is taken as the quality. If there is no number the `;...`
/// suffix is kept as part of the value.
pub fn parse_one(raw: &str) -> QualityValue {
    let Some(semicolon) = raw.rfind(';') else {
        return QualityValue::new(raw, 1.0);
    };

    match find_number(&raw[semicolon + 1..]) {
        Some(quality) => QualityValue::new(&raw[..semicolon], quality),
        None => {
            log::debug!("unreadable quality parameter in {raw:?}, defaulting to 1");
            QualityValue::new(raw, 1.0)
        }
    }
}

/// Parses a comma separated list of quality-weighted values, keeping the
/// order of the input. Nothing is discarded here.
pub fn parse_list(raw: &str) -> Vec<QualityValue> {
    raw.trim()
        .split(',')
        .map(|piece| parse_one(piece.trim_start()))
        .collect()
}

/// Stable sort by descending quality. Equal qualities keep their order.
pub fn sort_by_quality(values: &mut [QualityValue]) {
    values.sort_by(|a, b| b.quality.total_cmp(&a.quality));
}

// First run of `\d+(\.\d*)?` in `s`.
fn find_number(s: &str) -> Option<f32> {
    let start = s.find(|c: char| c.is_ascii_digit())?;
    let tail = &s[start..];

    let int_end = tail
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(tail.len());
    let mut end = int_end;
    if tail[int_end..].starts_with('.') {
        let fraction = &tail[int_end + 1..];
        let fraction_len = fraction
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(fraction.len());
        if fraction_len > 0 {
            end = int_end + 1 + fraction_len;
        }
    }

    tail[..end].parse::<f32>().ok()
}

/// Reads one quality-weighted header field from a [`HeaderStore`].
///
/// Every call to [`values`](QualityWeightedHeader::values) re-reads the store,
/// so changes to the headers are always visible.
#[derive(Debug)]
pub struct QualityWeightedHeader<'a, S: HeaderStore> {
    field: &'a str,
    store: &'a S,
    use_all_instances: bool,
}

impl<'a, S: HeaderStore> QualityWeightedHeader<'a, S> {
    /// With `use_all_instances` every instance of `field` is parsed and
    /// flattened, otherwise only the authoritative one.
    pub fn new(field: &'a str, store: &'a S, use_all_instances: bool) -> Self {
        Self {
            field,
            store,
            use_all_instances,
        }
    }

    pub fn field(&self) -> &str {
        self.field
    }

    pub fn is_present(&self) -> bool {
        self.store.has_header(self.field)
    }

    /// Parsed values sorted by descending quality, empty when the header is
    /// absent.
    pub fn values(&self) -> Vec<QualityValue> {
        let mut values = if self.use_all_instances {
            self.store
                .get_header(self.field)
                .map(|raw| raw.iter().flat_map(|v| parse_list(v)).collect())
                .unwrap_or_default()
        } else {
            self.store
                .get_authoritative_header(self.field)
                .map(parse_list)
                .unwrap_or_default()
        };

        sort_by_quality(&mut values);
        values
    }

    /// Quality of the first value equal to `token` (ASCII case-insensitive),
    /// falling back to a `*` entry.
    pub fn quality_of(&self, token: &str) -> Option<f32> {
        let values = self.values();
        values
            .iter()
            .find(|v| v.value.trim().eq_ignore_ascii_case(token))
            .or_else(|| values.iter().find(|v| v.value.trim() == "*"))
            .map(|v| v.quality)
    }
}
