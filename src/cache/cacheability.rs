//! Whether requests and responses may take part in caching at all.

use std::collections::HashSet;

use super::directives::{RequestDirectives, ResponseDirectives};
use crate::http::{Method, Request, Response, StatusCode};

/// Status codes stored by default.
pub const DEFAULT_CACHEABLE_STATUSES: [StatusCode; 11] = [
    StatusCode::Ok,
    StatusCode::NonAuthoritativeInformation,
    StatusCode::NoContent,
    StatusCode::PartialContent,
    StatusCode::MultipleChoices,
    StatusCode::MovedPermanently,
    StatusCode::NotFound,
    StatusCode::MethodNotAllowed,
    StatusCode::Gone,
    StatusCode::UriTooLong,
    StatusCode::NotImplemented,
];

/// Returns the default allow-list as a set.
pub fn default_cacheable_statuses() -> HashSet<StatusCode> {
    DEFAULT_CACHEABLE_STATUSES.into_iter().collect()
}

/// Only `GET` requests without `no-store` are looked up or stored.
pub fn is_request_cacheable(request: &Request, directives: &RequestDirectives) -> bool {
    *request.method() == Method::Get && !directives.no_store
}

/// Returns `true` if `response` may be written to the store.
///
/// Requires an allow-listed status, a `Cache-Control` header without
/// `no-store`, a body, and an explicit lifetime (`s-maxage`, `max-age` or
/// `Expires`). Without a lifetime the response is never stored, whatever its
/// status.
pub fn is_response_cacheable(response: &Response, statuses: &HashSet<StatusCode>) -> bool {
    if !statuses.contains(&response.status()) {
        return false;
    }
    let Some(directives) = ResponseDirectives::from_headers(response.headers()) else {
        return false;
    };
    if directives.no_store || !response.has_body() {
        return false;
    }
    directives.has_lifetime() || response.headers().get_date("expires").is_some()
}
