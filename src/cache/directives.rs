//! Typed `Cache-Control` directives for requests and responses.
//!
//! Parsing is lenient: unknown directives are ignored and a directive whose
//! argument does not parse is treated as absent, so malformed input degrades
//! to the conservative "not fresh / not cacheable" outcome instead of an error.

use std::time::Duration;

use crate::http::Headers;

/// The request's tolerance for stale responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaxStale {
    /// Bare `max-stale`: any amount of staleness is acceptable.
    Any,
    /// `max-stale=N`: at most `N` past the freshness lifetime.
    Limit(Duration),
}

/// `Cache-Control` directives sent by the client.
///
/// A request without a `Cache-Control` header yields the default value, in
/// which every directive is absent.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use rttp_cache::cache::{MaxStale, RequestDirectives};
///
/// let d = RequestDirectives::parse("max-stale=30, min-fresh=5");
/// assert_eq!(d.max_stale, Some(MaxStale::Limit(Duration::from_secs(30))));
/// assert_eq!(d.min_fresh, Some(Duration::from_secs(5)));
/// assert!(!d.no_cache);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestDirectives {
    pub no_store: bool,
    pub no_cache: bool,
    pub only_if_cached: bool,
    pub min_fresh: Option<Duration>,
    pub max_stale: Option<MaxStale>,
    pub max_age: Option<Duration>,
}

impl RequestDirectives {
    /// Parses a single `Cache-Control` field value.
    pub fn parse(value: &str) -> Self {
        let mut directives = Self::default();
        for (name, arg) in tokens(value) {
            match name.as_str() {
                "no-store" => directives.no_store = true,
                "no-cache" => directives.no_cache = true,
                "only-if-cached" => directives.only_if_cached = true,
                "min-fresh" => directives.min_fresh = arg.and_then(seconds),
                "max-age" => directives.max_age = arg.and_then(seconds),
                "max-stale" => {
                    directives.max_stale = match arg {
                        None => Some(MaxStale::Any),
                        Some(arg) => seconds(arg).map(MaxStale::Limit),
                    }
                }
                _ => {}
            }
        }
        directives
    }

    /// Reads every `Cache-Control` line of a request.
    pub fn from_headers(headers: &Headers) -> Self {
        Self::parse(&joined(headers))
    }
}

/// `Cache-Control` directives sent by the origin.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use rttp_cache::cache::ResponseDirectives;
///
/// let d = ResponseDirectives::parse("public, s-maxage=60, max-age=30");
/// assert_eq!(d.shared_max_age, Some(Duration::from_secs(60)));
/// assert_eq!(d.max_age, Some(Duration::from_secs(30)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseDirectives {
    pub no_store: bool,
    pub no_cache: bool,
    pub must_revalidate: bool,
    pub proxy_revalidate: bool,
    pub max_age: Option<Duration>,
    pub shared_max_age: Option<Duration>,
}

impl ResponseDirectives {
    /// Parses a single `Cache-Control` field value.
    pub fn parse(value: &str) -> Self {
        let mut directives = Self::default();
        for (name, arg) in tokens(value) {
            match name.as_str() {
                "no-store" => directives.no_store = true,
                // `no-cache="Set-Cookie"` still forbids serving without revalidation.
                "no-cache" => directives.no_cache = true,
                "must-revalidate" => directives.must_revalidate = true,
                "proxy-revalidate" => directives.proxy_revalidate = true,
                "max-age" => directives.max_age = arg.and_then(seconds),
                "s-maxage" => directives.shared_max_age = arg.and_then(seconds),
                _ => {}
            }
        }
        directives
    }

    /// Reads a response's `Cache-Control`, or `None` when the header is absent.
    pub fn from_headers(headers: &Headers) -> Option<Self> {
        headers
            .contains("cache-control")
            .then(|| Self::parse(&joined(headers)))
    }

    /// Returns `true` if the origin supplied an explicit lifetime.
    pub fn has_lifetime(&self) -> bool {
        self.max_age.is_some() || self.shared_max_age.is_some()
    }
}

fn joined(headers: &Headers) -> String {
    headers.get_all("cache-control").collect::<Vec<_>>().join(",")
}

/// Splits a field value into lowercase directive names and raw arguments.
fn tokens(value: &str) -> impl Iterator<Item = (String, Option<&str>)> {
    split_list(value)
        .into_iter()
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| match token.split_once('=') {
            Some((name, arg)) => (
                name.trim().to_ascii_lowercase(),
                Some(arg.trim().trim_matches('"')),
            ),
            None => (token.to_ascii_lowercase(), None),
        })
}

/// Splits on commas outside quoted strings (RFC 9110 §5.6.4).
fn split_list(value: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut quoted = false;
    let mut escaped = false;
    for (i, c) in value.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' if quoted => escaped = true,
            '"' => quoted = !quoted,
            ',' if !quoted => {
                parts.push(&value[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&value[start..]);
    parts
}

/// Parses delta-seconds (RFC 9111 §1.2.2).
fn seconds(arg: &str) -> Option<Duration> {
    arg.parse::<u64>().ok().map(Duration::from_secs)
}
