//! Age and freshness lifetime of stored entries.

use std::time::{Duration, SystemTime};

use super::entry::CacheEntry;

/// The age and lifetime of a stored entry at one instant.
///
/// Either value is `None` when the entry lacks the data to compute it. An
/// entry without any `Cache-Control` has neither.
///
/// A lifetime taken from an `Expires` earlier than `Date` is negative. It is
/// carried as a zero `lifetime` plus the shortfall in `overdue`, which counts
/// toward staleness and keeps the entry from ever being fresh.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Freshness {
    pub current_age: Option<Duration>,
    pub lifetime: Option<Duration>,
    pub overdue: Duration,
}

impl Freshness {
    /// Evaluates `entry` at `now`.
    pub fn of(entry: &CacheEntry, now: SystemTime) -> Self {
        if entry.directives().is_none() {
            return Self::default();
        }
        Self {
            current_age: Some(current_age(entry, now)),
            lifetime: freshness_lifetime(entry),
            overdue: overdue(entry),
        }
    }

    /// `current_age - lifetime`, counting `overdue`. Zero while fresh.
    pub fn staleness(&self) -> Option<Duration> {
        let (age, lifetime) = (self.current_age?, self.lifetime?);
        Some((age + self.overdue).saturating_sub(lifetime))
    }
}

/// `now - Date`, clamped at zero. Clock skew is not corrected.
pub fn current_age(entry: &CacheEntry, now: SystemTime) -> Duration {
    now.duration_since(entry.date()).unwrap_or(Duration::ZERO)
}

/// `s-maxage`, else `max-age`, else `Expires - Date`.
///
/// An `Expires` before `Date` yields zero here; see [`overdue`].
pub fn freshness_lifetime(entry: &CacheEntry) -> Option<Duration> {
    let directives = entry.directives()?;
    directives
        .shared_max_age
        .or(directives.max_age)
        .or_else(|| {
            entry
                .expires()
                .map(|expires| expires.duration_since(entry.date()).unwrap_or(Duration::ZERO))
        })
}

/// `Date - Expires` when the lifetime comes from an `Expires` earlier than
/// `Date`, otherwise zero.
pub fn overdue(entry: &CacheEntry) -> Duration {
    let Some(directives) = entry.directives() else {
        return Duration::ZERO;
    };
    if directives.has_lifetime() {
        return Duration::ZERO;
    }
    entry
        .expires()
        .and_then(|expires| entry.date().duration_since(expires).ok())
        .unwrap_or(Duration::ZERO)
}
