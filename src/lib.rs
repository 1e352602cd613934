//! Typed HTTP message layer: case-insensitive header storage, quality-weighted
//! content negotiation (`Accept`, `Accept-Encoding`, ...) and cookie codecs.
//!
//! ```
//! use httpkit::http::HttpMethod;
//! use httpkit::http::request::{HttpRequest, RequestHeader};
//!
//! let mut req = HttpRequest::new(HttpMethod::Get, "/");
//! req.set_header(RequestHeader::Accept, "text/html, application/json;q=0.5");
//!
//! let supported = ["application/json", "text/html"];
//! assert_eq!(req.accept().preferred_supported(&supported), Some("text/html"));
//! ```

pub mod config;
pub mod error;
pub mod http;

pub use error::{Error, Result};
