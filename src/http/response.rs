//! HTTP response as seen by the outbound pipeline.
//!
//! Provides a fluent builder API for constructing responses, which is also how
//! tests describe origin behaviour.

use std::sync::Arc;
use std::time::SystemTime;

use super::{Body, Headers, Request, StatusCode};
use crate::cache::CacheStatus;

/// The header carrying the cache layer's verdict for a response.
pub const CACHE_STATUS_HEADER: &str = "X-Cache-Status";

/// An HTTP response returned by the origin or synthesized by the cache.
///
/// # Examples
///
/// ```
/// use rttp_cache::http::{Response, StatusCode};
///
/// let response = Response::new(StatusCode::Ok)
///     .header("Content-Type", "application/json")
///     .max_age(60)
///     .body(r#"{"status":"ok"}"#);
///
/// assert_eq!(response.status(), StatusCode::Ok);
/// assert_eq!(response.headers().get("cache-control"), Some("max-age=60"));
/// assert_eq!(response.content().map(|b| b.len()), Some(15));
/// ```
#[derive(Debug)]
pub struct Response {
    status: StatusCode,
    headers: Headers,
    body: Option<Body>,
    request: Option<Arc<Request>>,
}

impl Response {
    /// Creates a new response with the given status and no body.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Headers::new(),
            body: None,
            request: None,
        }
    }

    /// Appends a response header. Multiple calls with the same name are additive.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Appends a header in-place. Intended for middleware pipelines that receive
    /// a `Response` from downstream and need to decorate it without consuming it.
    pub fn add_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.insert(name, value);
    }

    /// Sets the response body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Body>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Sets the `Date` header.
    #[must_use]
    pub fn date(mut self, date: SystemTime) -> Self {
        self.headers.set_date("Date", date);
        self
    }

    /// Sets the `Expires` header.
    #[must_use]
    pub fn expires(mut self, at: SystemTime) -> Self {
        self.headers.set_date("Expires", at);
        self
    }

    /// Sets the `Last-Modified` header.
    #[must_use]
    pub fn last_modified(mut self, at: SystemTime) -> Self {
        self.headers.set_date("Last-Modified", at);
        self
    }

    /// Sets the `ETag` header. The tag is quoted unless it already is.
    #[must_use]
    pub fn etag(mut self, tag: &str) -> Self {
        let value = if tag.starts_with('"') || tag.starts_with("W/") {
            tag.to_owned()
        } else {
            format!("\"{tag}\"")
        };
        self.headers.set("ETag", value);
        self
    }

    /// Adds `max-age=<seconds>` to `Cache-Control`.
    #[must_use]
    pub fn max_age(self, seconds: u64) -> Self {
        self.cache_directive(&format!("max-age={seconds}"))
    }

    /// Adds `s-maxage=<seconds>` to `Cache-Control`.
    #[must_use]
    pub fn shared_max_age(self, seconds: u64) -> Self {
        self.cache_directive(&format!("s-maxage={seconds}"))
    }

    /// Appends one directive to the `Cache-Control` header, creating it if needed.
    #[must_use]
    pub fn cache_directive(mut self, directive: &str) -> Self {
        let value = match self.headers.get("cache-control") {
            Some(existing) if !existing.trim().is_empty() => format!("{existing}, {directive}"),
            _ => directive.to_owned(),
        };
        self.headers.set("Cache-Control", value);
        self
    }

    /// Records the request this response answers.
    #[must_use]
    pub fn with_request(mut self, request: Arc<Request>) -> Self {
        self.request = Some(request);
        self
    }

    /// Returns the status code of this response.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the response headers.
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Returns the response headers for in-place decoration.
    pub fn headers_mut(&mut self) -> &mut Headers {
        &mut self.headers
    }

    /// Returns the body, if the response carries one.
    pub fn content(&self) -> Option<&Body> {
        self.body.as_ref()
    }

    /// Returns `true` if the response carries a body (possibly empty).
    pub fn has_body(&self) -> bool {
        self.body.is_some()
    }

    /// Returns the request this response answers, when known.
    pub fn request(&self) -> Option<&Request> {
        self.request.as_deref()
    }

    /// Writes the cache verdict, replacing any earlier one.
    pub fn set_cache_status(&mut self, status: CacheStatus) {
        self.headers.set(CACHE_STATUS_HEADER, status.as_str());
    }

    /// Reads back the cache verdict written by [`set_cache_status`](Self::set_cache_status).
    pub fn cache_status(&self) -> Option<CacheStatus> {
        self.headers.get(CACHE_STATUS_HEADER)?.parse().ok()
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::new(StatusCode::Ok)
    }
}
