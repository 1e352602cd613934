//! `Accept` header negotiation.
//!
//! [`AcceptNegotiator`] turns the `Accept` header(s) of a message into a
//! priority-ordered list of [`MediaRange`]s and answers questions such as
//! "is `image/webp` acceptable?" or "which of the formats I can produce does
//! the client take?".
//!
//! Ordering rules:
//! - higher quality first;
//! - at equal quality, more specific ranges first:
//!   `type/subtype` > `type/*` > `*/subtype` > `*/*`;
//! - otherwise header order is kept.
//!
//! A missing `Accept` header means `*/*`. Values without a `/` are dropped.

use std::fmt;

use crate::config::config;
use crate::http::headers::HeaderStore;
use crate::http::quality::{QualityValue, QualityWeightedHeader};

pub const ACCEPT: &str = "Accept";

const WILDCARD: &str = "*";

/// One entry of an `Accept` header, e.g. `audio/*;q=0.8`.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaRange {
    pub primary: String,
    pub secondary: String,
    pub quality: f32,
}

impl MediaRange {
    pub fn new(primary: impl Into<String>, secondary: impl Into<String>, quality: f32) -> Self {
        Self {
            primary: primary.into(),
            secondary: secondary.into(),
            quality,
        }
    }

    /// The implicit range used when no `Accept` header is present.
    pub fn any() -> Self {
        Self::new(WILDCARD, WILDCARD, 1.0)
    }

    /// Splits a parsed value on its first `/`. Returns `None` when there is no
    /// `/` or either side is empty.
    pub fn from_quality_value(value: &QualityValue) -> Option<Self> {
        let (primary, secondary) = value.value.trim().split_once('/')?;
        if primary.is_empty() || secondary.is_empty() {
            return None;
        }
        Some(Self::new(primary, secondary, value.quality))
    }

    /// 2 points for a concrete primary type, 1 for a concrete subtype.
    pub fn specificity(&self) -> u8 {
        let mut score = 0;
        if self.primary != WILDCARD {
            score += 2;
        }
        if self.secondary != WILDCARD {
            score += 1;
        }
        score
    }

    /// Anchored match of `mime` against `primary/secondary`, where a segment
    /// that is exactly `*` stands for one or more characters. Anything else is
    /// compared literally.
    pub fn matches(&self, mime: &str) -> bool {
        let primary = self.primary.as_str();
        let secondary = self.secondary.as_str();

        match (primary == WILDCARD, secondary == WILDCARD) {
            (false, false) => mime
                .strip_prefix(primary)
                .and_then(|rest| rest.strip_prefix('/'))
                .is_some_and(|rest| rest == secondary),
            (false, true) => mime
                .strip_prefix(primary)
                .and_then(|rest| rest.strip_prefix('/'))
                .is_some_and(|rest| !rest.is_empty()),
            (true, false) => mime
                .strip_suffix(secondary)
                .and_then(|rest| rest.strip_suffix('/'))
                .is_some_and(|rest| !rest.is_empty()),
            (true, true) => mime
                .char_indices()
                .any(|(i, c)| c == '/' && i > 0 && i + 1 < mime.len()),
        }
    }
}

impl fmt::Display for MediaRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.primary, self.secondary)
    }
}

/// Content negotiation over the `Accept` header of a [`HeaderStore`].
///
/// The store is read on every call; nothing is cached.
#[derive(Debug)]
pub struct AcceptNegotiator<'a, S: HeaderStore> {
    store: &'a S,
    use_all_instances: bool,
}

impl<'a, S: HeaderStore> AcceptNegotiator<'a, S> {
    /// With `use_all_instances` every `Accept` header is aggregated, otherwise
    /// only the authoritative one is read.
    pub fn new(store: &'a S, use_all_instances: bool) -> Self {
        Self {
            store,
            use_all_instances,
        }
    }

    /// Like [`new`](Self::new), taking `use_all_instances` from the crate
    /// configuration.
    pub fn from_config(store: &'a S) -> Self {
        Self::new(store, config().use_all_header_instances)
    }

    /// Acceptable media ranges, highest priority first.
    pub fn accepted_values(&self) -> Vec<MediaRange> {
        if !self.store.has_header(ACCEPT) {
            return vec![MediaRange::any()];
        }

        let mut ranges: Vec<MediaRange> =
            QualityWeightedHeader::new(ACCEPT, self.store, self.use_all_instances)
                .values()
                .iter()
                .filter_map(|value| {
                    let range = MediaRange::from_quality_value(value);
                    if range.is_none() {
                        log::debug!("ignoring malformed Accept value {:?}", value.value);
                    }
                    range
                })
                .collect();

        ranges.sort_by(|a, b| {
            b.quality
                .total_cmp(&a.quality)
                .then_with(|| b.specificity().cmp(&a.specificity()))
        });
        ranges
    }

    pub fn accepts(&self, mime: &str) -> bool {
        self.accepted_values().iter().any(|range| range.matches(mime))
    }

    /// Quality the client gives `mime`; `0` means not acceptable.
    pub fn mime_type_quality(&self, mime: &str) -> f32 {
        self.accepted_values()
            .iter()
            .find(|range| range.matches(mime))
            .map_or(0.0, |range| range.quality)
    }

    /// Keeps the `candidates` the client accepts.
    ///
    /// The result follows the order of `candidates`, not the order of the
    /// `Accept` header, so a caller's own preference order survives.
    pub fn filter_to_supported<'c, T: AsRef<str>>(&self, candidates: &'c [T]) -> Vec<&'c str> {
        let ranges = self.accepted_values();
        candidates
            .iter()
            .map(|candidate| candidate.as_ref())
            .filter(|mime| ranges.iter().any(|range| range.matches(mime)))
            .collect()
    }

    /// The `candidates` the client accepts, ordered by the range they first
    /// match: ranges in priority order, and within one range, caller order.
    /// Each candidate appears once. Ranges with `q=0` contribute nothing.
    pub fn preferred_supported_formats<'c, T: AsRef<str>>(
        &self,
        candidates: &'c [T],
    ) -> Vec<&'c str> {
        let mut preferred: Vec<&'c str> = Vec::new();

        for range in self.accepted_values().iter().filter(|range| range.quality > 0.0) {
            for mime in candidates.iter().map(|candidate| candidate.as_ref()) {
                if range.matches(mime) && !preferred.contains(&mime) {
                    preferred.push(mime);
                }
            }
        }

        log::trace!("negotiated {preferred:?} from {} candidates", candidates.len());
        preferred
    }

    /// First entry of [`preferred_supported_formats`](Self::preferred_supported_formats).
    pub fn preferred_supported<'c, T: AsRef<str>>(&self, candidates: &'c [T]) -> Option<&'c str> {
        self.preferred_supported_formats(candidates).first().copied()
    }

    /// `primary/secondary` of the top-priority range, or `*/*`.
    pub fn highest_quality(&self) -> String {
        self.accepted_values()
            .first()
            .map_or_else(|| "*/*".to_string(), MediaRange::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::headers::{HeaderStoreMut, HttpHeaders};

    fn with_accept(value: &str) -> HttpHeaders {
        let mut headers = HttpHeaders::new();
        headers.set_header(ACCEPT, [value]);
        headers
    }

    fn rendered(ranges: &[MediaRange]) -> Vec<String> {
        ranges.iter().map(|r| format!("{r};q={}", r.quality)).collect()
    }

    #[test]
    fn missing_header_accepts_anything() {
        let headers = HttpHeaders::new();
        let accept = AcceptNegotiator::new(&headers, false);

        assert_eq!(accept.accepted_values(), vec![MediaRange::any()]);
        assert!(accept.accepts("anything/thing"));
        assert_eq!(accept.highest_quality(), "*/*");
        assert_eq!(accept.mime_type_quality("text/html"), 1.0);
    }

    #[test]
    fn equal_quality_prefers_specific_ranges() {
        let headers = with_accept("text/*;q=0.5, text/html;q=0.5");
        let accept = AcceptNegotiator::new(&headers, false);

        assert_eq!(
            rendered(&accept.accepted_values()),
            vec!["text/html;q=0.5", "text/*;q=0.5"]
        );
    }

    #[test]
    fn specificity_order() {
        let headers = with_accept("*/*, */json, application/*, application/json");
        let accept = AcceptNegotiator::new(&headers, false);

        assert_eq!(
            accept
                .accepted_values()
                .iter()
                .map(MediaRange::to_string)
                .collect::<Vec<_>>(),
            vec!["application/json", "application/*", "*/json", "*/*"]
        );
    }

    #[test]
    fn quality_beats_specificity() {
        let headers =
            with_accept("text/csv;q=0.4, text/html;q=0.73, application/json;q=0.01, */*;q=0.8");
        let accept = AcceptNegotiator::new(&headers, false);

        assert_eq!(accept.highest_quality(), "*/*");
        assert_eq!(accept.mime_type_quality("text/html"), 0.8);
        assert_eq!(accept.mime_type_quality("application/json"), 0.8);
    }

    #[test]
    fn malformed_values_are_dropped() {
        let headers = with_accept("garbage, text/html;q=0.9, /nothing, alsogarbage;q=1");
        let accept = AcceptNegotiator::new(&headers, false);

        assert_eq!(rendered(&accept.accepted_values()), vec!["text/html;q=0.9"]);
    }

    #[test]
    fn everything_malformed_yields_default_highest_quality() {
        let headers = with_accept("nonsense");
        let accept = AcceptNegotiator::new(&headers, false);

        assert!(accept.accepted_values().is_empty());
        assert_eq!(accept.highest_quality(), "*/*");
        assert!(!accept.accepts("text/html"));
    }

    #[test]
    fn wildcards_only_cover_whole_segments() {
        let headers = with_accept("image/*, */xml, application/x-vnd.foo*");
        let accept = AcceptNegotiator::new(&headers, false);

        assert!(accept.accepts("image/png"));
        assert!(!accept.accepts("image/"));
        assert!(accept.accepts("text/xml"));
        assert!(!accept.accepts("text/xhtml+xml"));
        assert!(accept.accepts("application/x-vnd.foo*"));
        assert!(!accept.accepts("application/x-vnd.foobar"));
    }

    #[test]
    fn matching_is_anchored() {
        let headers = with_accept("text/html");
        let accept = AcceptNegotiator::new(&headers, false);

        assert!(accept.accepts("text/html"));
        assert!(!accept.accepts("text/html5"));
        assert!(!accept.accepts("xtext/html"));
    }

    #[test]
    fn unacceptable_quality_is_zero() {
        let headers = with_accept("text/html");
        let accept = AcceptNegotiator::new(&headers, false);
        assert_eq!(accept.mime_type_quality("image/png"), 0.0);
    }

    #[test]
    fn filter_keeps_caller_order() {
        let headers = with_accept("video/*, audio/*");
        let accept = AcceptNegotiator::new(&headers, false);

        assert_eq!(
            accept.filter_to_supported(&["audio/x", "video/x", "audio/y"]),
            vec!["audio/x", "video/x", "audio/y"]
        );
        assert_eq!(
            accept.filter_to_supported(&["text/plain".to_string(), "video/mp4".to_string()]),
            vec!["video/mp4"]
        );
    }

    #[test]
    fn authoritative_versus_all_instances() {
        let mut headers = HttpHeaders::new();
        headers.append_header(ACCEPT, ["application/json"]);
        headers.append_header(ACCEPT, ["text/xml;q=0.5"]);

        let last = AcceptNegotiator::new(&headers, false);
        assert!(!last.accepts("application/json"));
        assert_eq!(last.highest_quality(), "text/xml");

        let all = AcceptNegotiator::new(&headers, true);
        assert!(all.accepts("application/json"));
        assert_eq!(all.highest_quality(), "application/json");
    }

    #[test]
    fn preferred_supported_follows_range_priority() {
        let headers = with_accept("text/html;q=0.5, application/json;q=0.9, image/*;q=0.5");
        let accept = AcceptNegotiator::new(&headers, false);

        assert_eq!(
            accept.preferred_supported(&["text/html", "application/json"]),
            Some("application/json")
        );
        assert_eq!(
            accept.preferred_supported(&["image/png", "text/html"]),
            Some("text/html")
        );
        assert_eq!(accept.preferred_supported(&["font/woff"]), None);
    }

    #[test]
    fn specific_range_picks_before_wildcard() {
        let headers = with_accept("image/*, image/png");
        let accept = AcceptNegotiator::new(&headers, false);

        assert_eq!(
            accept.preferred_supported_formats(&["image/jpeg", "image/png"]),
            vec!["image/png", "image/jpeg"]
        );
        assert_eq!(
            accept.preferred_supported(&["image/jpeg", "image/png"]),
            Some("image/png")
        );
    }

    #[test]
    fn preferred_formats_are_deduplicated() {
        let headers = with_accept("text/*;q=0.8, */*;q=0.1, text/html");
        let accept = AcceptNegotiator::new(&headers, false);

        assert_eq!(
            accept.preferred_supported_formats(&[
                "application/pdf",
                "text/plain",
                "text/html",
                "text/plain"
            ]),
            vec!["text/html", "text/plain", "application/pdf"]
        );
    }

    #[test]
    fn zero_quality_is_never_preferred() {
        let headers = with_accept("text/html;q=0, */*;q=0");
        let accept = AcceptNegotiator::new(&headers, false);
        assert_eq!(accept.preferred_supported(&["text/html", "image/png"]), None);
    }
}
