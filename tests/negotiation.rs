use httpkit::http::HttpMethod;
use httpkit::http::accept::AcceptNegotiator;
use httpkit::http::encoding::{ContentCoding, negotiate_encoding};
use httpkit::http::headers::{HeaderStoreMut, HttpHeaders};
use httpkit::http::quality::{QualityValue, QualityWeightedHeader, parse_list, parse_one};
use httpkit::http::request::{HttpRequest, RequestHeader};

fn headers_with(field: &str, value: &str) -> HttpHeaders {
    let mut headers = HttpHeaders::new();
    headers.set_header(field, [value]);
    headers
}

#[test]
fn quality_defaults_to_one_without_parameter() {
    for raw in ["text/html", "gzip", "en-US", "image/*"] {
        assert_eq!(parse_one(raw), QualityValue::new(raw, 1.0));
    }
}

#[test]
fn quality_list_keeps_segments() {
    let values = parse_list("a/b;q=0.2, c/d");
    assert_eq!(values.len(), 2);
    assert_eq!(
        values.iter().map(|v| v.quality).collect::<Vec<_>>(),
        vec![0.2f32, 1.0]
    );
}

#[test]
fn specific_range_wins_tie() {
    let headers = headers_with("Accept", "text/*;q=0.5, text/html;q=0.5");
    let ranges = AcceptNegotiator::new(&headers, false).accepted_values();

    assert_eq!(ranges[0].to_string(), "text/html");
    assert_eq!(ranges[1].to_string(), "text/*");
}

#[test]
fn missing_accept_allows_everything() {
    let headers = HttpHeaders::empty();
    let negotiator = AcceptNegotiator::new(&headers, false);

    assert!(negotiator.accepts("anything/thing"));
    assert_eq!(negotiator.highest_quality(), "*/*");
}

#[test]
fn filtering_follows_candidate_order() {
    let headers = headers_with("Accept", "video/*, audio/*");
    let negotiator = AcceptNegotiator::new(&headers, false);

    assert_eq!(
        negotiator.filter_to_supported(&["audio/x", "video/x", "audio/y"]),
        vec!["audio/x", "video/x", "audio/y"]
    );
}

#[test]
fn negotiator_sees_header_changes() {
    let mut headers = headers_with("Accept", "application/json");
    assert!(!AcceptNegotiator::new(&headers, false).accepts("text/html"));

    headers.append_header("accept", ["text/html"]);
    assert!(AcceptNegotiator::new(&headers, false).accepts("text/html"));
    assert!(!AcceptNegotiator::new(&headers, false).accepts("application/json"));
    assert!(AcceptNegotiator::new(&headers, true).accepts("application/json"));
}

#[test]
fn request_level_negotiation() {
    let mut req = HttpRequest::new(HttpMethod::Get, "/report");
    req.set_header(
        RequestHeader::Accept,
        "application/json;q=0.9, text/csv, */*;q=0.1",
    );
    req.set_header(RequestHeader::AcceptLanguage, "de;q=0.4, en-GB, en;q=0.8");

    let formats = ["application/json", "text/csv", "application/pdf"];
    assert_eq!(req.accept().preferred_supported(&formats), Some("text/csv"));
    assert_eq!(req.accept().mime_type_quality("application/pdf"), 0.1);

    let languages = QualityWeightedHeader::new("Accept-Language", &req.headers, false);
    assert_eq!(
        languages.values().iter().map(|v| v.value.as_str()).collect::<Vec<_>>(),
        vec!["en-GB", "en", "de"]
    );
}

#[test]
fn encoding_negotiation_from_store() {
    let headers = headers_with(
        "accept-encoding",
        "deflate;q=0.5, gzip;q=0.9, identity;q=0.1",
    );
    assert_eq!(
        negotiate_encoding(&headers, &[ContentCoding::Gzip, ContentCoding::Deflate]),
        ContentCoding::Gzip
    );
    assert_eq!(
        negotiate_encoding(&headers, &[ContentCoding::Deflate]),
        ContentCoding::Deflate
    );
}
