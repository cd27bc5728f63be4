//! Conditional requests and reconciliation of the origin's answer.
//!
//! Before forwarding, the stored entry's validators are attached to the
//! request. Once the origin has answered, [`Reconciliation::decide`] picks the
//! single terminal step that determines both the store mutation and the
//! status written on the returned response.

use std::time::SystemTime;

use super::entry::CacheEntry;
use super::status::CacheStatus;
use crate::http::{Request, Response, StatusCode};

/// Copies `ETag` / `Last-Modified` into `If-None-Match` / `If-Modified-Since`.
pub fn attach_validators(request: &mut Request, entry: &CacheEntry) {
    if let Some(etag) = entry.etag() {
        request.headers_mut().set("If-None-Match", etag);
    }
    if let Some(last_modified) = entry.last_modified() {
        request.headers_mut().set("If-Modified-Since", last_modified);
    }
}

/// What to do with the origin's response.
#[derive(Debug)]
pub enum Reconciliation {
    /// The origin confirmed the stored entry. Serve its body with refreshed
    /// metadata and write it back under the original key.
    Refresh(CacheEntry),
    /// A revalidation produced a new cacheable response that supersedes the entry.
    Replace,
    /// A revalidation produced a response that cannot be stored.
    Bypass,
    /// No entry existed and the response can be stored.
    Store,
    /// No entry existed and the response cannot be stored.
    Skip,
}

impl Reconciliation {
    /// Decides the terminal step from the revalidated entry (if any), the
    /// origin's status and the response's cacheability.
    pub fn decide(revalidated: Option<CacheEntry>, origin: StatusCode, cacheable: bool) -> Self {
        match (revalidated, cacheable) {
            (Some(entry), _) if origin == StatusCode::NotModified => Self::Refresh(entry),
            (Some(_), true) => Self::Replace,
            (Some(_), false) => Self::Bypass,
            (None, true) => Self::Store,
            (None, false) => Self::Skip,
        }
    }

    /// The status written on the response this step returns.
    pub fn status(&self) -> CacheStatus {
        match self {
            Self::Refresh(_) | Self::Replace | Self::Bypass => CacheStatus::Revalidated,
            Self::Store | Self::Skip => CacheStatus::Miss,
        }
    }
}

/// Merges a `304 Not Modified` into the stored entry.
///
/// The stored body is kept; the origin's `Cache-Control` lines replace the
/// stored ones as sent, and `Date` is set to `now`, the time the
/// confirmation arrived.
pub fn merge_not_modified(entry: &CacheEntry, not_modified: &Response, now: SystemTime) -> CacheEntry {
    entry.refreshed(not_modified.headers(), now)
}
