//! Whether a stored entry may be served without contacting the origin.

use super::directives::{MaxStale, RequestDirectives};
use super::entry::CacheEntry;
use super::freshness::Freshness;

/// Returns `true` if the entry is fresh enough for this request.
///
/// With `min-fresh`, the entry must stay fresh for at least that much longer.
/// An entry whose `Expires` precedes its `Date` is never fresh.
pub fn is_fresh(request: &RequestDirectives, freshness: Freshness) -> bool {
    let (Some(age), Some(lifetime)) = (freshness.current_age, freshness.lifetime) else {
        return false;
    };
    if !freshness.overdue.is_zero() {
        return false;
    }
    match request.min_fresh {
        Some(min_fresh) => age + min_fresh <= lifetime,
        None => lifetime > age,
    }
}

/// Returns `true` if a non-fresh entry may still be served as-is.
///
/// Precedence: a `no-cache` on either side or a `must-revalidate` response
/// vetoes; bare `max-stale` then accepts any age; `max-stale=N` bounds the
/// staleness; request `max-age` bounds the age.
pub fn is_stale_acceptable(
    request: &RequestDirectives,
    entry: &CacheEntry,
    freshness: Freshness,
) -> bool {
    let Some(response) = entry.directives() else {
        return false;
    };
    if request.no_cache || response.no_cache || response.must_revalidate {
        return false;
    }
    if request.max_stale == Some(MaxStale::Any) {
        return true;
    }

    let (Some(age), Some(staleness)) = (freshness.current_age, freshness.staleness()) else {
        return false;
    };
    if let Some(MaxStale::Limit(limit)) = request.max_stale {
        return staleness <= limit;
    }
    if let Some(max_age) = request.max_age {
        return max_age > age;
    }
    false
}
