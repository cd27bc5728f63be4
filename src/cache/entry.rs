//! Stored response snapshots.

use std::time::SystemTime;

use bytes::Bytes;

use super::directives::ResponseDirectives;
use crate::http::response::CACHE_STATUS_HEADER;
use crate::http::{Headers, Response, StatusCode};

/// A response as held by the store.
///
/// Entries are immutable until replaced: the cache never edits one in place
/// inside the store, it builds a new entry and `put`s it. Cloning is cheap;
/// the body is a shared [`Bytes`] buffer.
///
/// Every entry has a `Date`. When the origin omitted one, the time of storage
/// is recorded instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    key: String,
    status: StatusCode,
    headers: Headers,
    body: Option<Bytes>,
    directives: Option<ResponseDirectives>,
    date: SystemTime,
    expires: Option<SystemTime>,
}

impl CacheEntry {
    /// Snapshots `response` for storage under `key`.
    ///
    /// The body bytes are shared with the response, not copied. Any cache
    /// status header is dropped; the status belongs to a single delivery.
    pub fn from_response(key: impl Into<String>, response: &Response, now: SystemTime) -> Self {
        let mut headers = response.headers().clone();
        headers.remove(CACHE_STATUS_HEADER);

        let date = match headers.get_date("date") {
            Some(date) => date,
            None => {
                headers.set_date("Date", now);
                now
            }
        };

        Self {
            key: key.into(),
            status: response.status(),
            directives: ResponseDirectives::from_headers(&headers),
            expires: headers.get_date("expires"),
            body: response.content().map(|body| body.bytes().clone()),
            headers,
            date,
        }
    }

    /// Builds a fresh response carrying this entry's status, headers and body.
    pub fn to_response(&self) -> Response {
        let mut response = Response::new(self.status);
        *response.headers_mut() = self.headers.clone();
        match &self.body {
            Some(body) => response.body(body.clone()),
            None => response,
        }
    }

    /// Returns a copy carrying `origin`'s `Cache-Control` lines verbatim and
    /// the given `Date`.
    ///
    /// When `origin` has no `Cache-Control`, the entry's is removed.
    pub fn refreshed(&self, origin: &Headers, date: SystemTime) -> Self {
        let mut headers = self.headers.clone();
        headers.remove("cache-control");
        for value in origin.get_all("cache-control") {
            headers.insert("Cache-Control", value);
        }
        headers.set_date("Date", date);

        Self {
            directives: ResponseDirectives::from_headers(&headers),
            headers,
            date,
            ..self.clone()
        }
    }

    /// Returns the key this entry was stored under.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the stored status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the stored headers.
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Returns the stored body.
    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Returns the parsed `Cache-Control`, or `None` when the response had none.
    pub fn directives(&self) -> Option<&ResponseDirectives> {
        self.directives.as_ref()
    }

    /// Returns the response's origin timestamp.
    pub fn date(&self) -> SystemTime {
        self.date
    }

    /// Returns the `Expires` time, if present and well-formed.
    pub fn expires(&self) -> Option<SystemTime> {
        self.expires
    }

    /// Returns the `ETag` validator.
    pub fn etag(&self) -> Option<&str> {
        self.headers.get("etag")
    }

    /// Returns the raw `Last-Modified` validator.
    pub fn last_modified(&self) -> Option<&str> {
        self.headers.get("last-modified")
    }
}
