//! The `X-Cache-Status` verdict.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Returned when a header value is not one of the four verdicts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized cache status: {0:?}")]
pub struct CacheStatusError(pub String);

/// The cache layer's verdict for one response.
///
/// Exactly one value is written per response, in the
/// [`X-Cache-Status`](crate::http::response::CACHE_STATUS_HEADER) header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheStatus {
    /// No usable entry; the response came from the origin.
    Miss,
    /// Served from the store while fresh.
    Hit,
    /// Served from the store past its lifetime, as the request allowed.
    Stale,
    /// A stored entry was checked against the origin.
    Revalidated,
}

impl CacheStatus {
    /// Returns the header value for this status.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Miss => "MISS",
            Self::Hit => "HIT",
            Self::Stale => "STALE",
            Self::Revalidated => "REVALIDATED",
        }
    }
}

impl fmt::Display for CacheStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CacheStatus {
    type Err = CacheStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MISS" => Ok(Self::Miss),
            "HIT" => Ok(Self::Hit),
            "STALE" => Ok(Self::Stale),
            "REVALIDATED" => Ok(Self::Revalidated),
            _ => Err(CacheStatusError(s.to_owned())),
        }
    }
}
