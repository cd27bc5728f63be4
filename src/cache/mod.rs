//! HTTP caching for the outbound pipeline.
//!
//! [`HttpCache`] is a [`Middleware`](crate::middleware::Middleware) that sits
//! in front of the transport and decides, per request, whether to answer from
//! the store, revalidate a stored entry, or forward to the origin and store
//! the result. The decision is split into small pure steps:
//!
//! - [`directives`] parses `Cache-Control` on both sides.
//! - [`freshness`] computes an entry's age and freshness lifetime.
//! - [`cacheability`] filters requests and responses before storage.
//! - [`staleness`] decides whether an entry is fresh or acceptably stale.
//! - [`revalidation`] builds conditional requests and reconciles the answer.
//!
//! Storage, key derivation and time are collaborators behind the
//! [`CacheStore`], [`KeyStrategy`] and [`Clock`] traits.

pub mod cacheability;
pub mod clock;
pub mod config;
pub mod directives;
pub mod entry;
pub mod freshness;
pub mod key;
pub mod layer;
pub mod revalidation;
pub mod staleness;
pub mod status;
pub mod store;

#[cfg(test)]
mod support;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{CacheConfig, ConfigError};
pub use directives::{MaxStale, RequestDirectives, ResponseDirectives};
pub use entry::CacheEntry;
pub use freshness::Freshness;
pub use key::{DefaultKeyStrategy, KeyError, KeyStrategy};
pub use layer::HttpCache;
pub use revalidation::Reconciliation;
pub use status::{CacheStatus, CacheStatusError};
pub use store::{CacheStore, MemoryStore, StoreError};
