//! # rttp-cache
//!
//! An HTTP-semantics caching layer for an async outbound request pipeline.
//!
//! Requests flow through a [`Pipeline`](middleware::Pipeline) of middleware
//! to a transport. Adding [`HttpCache`] to the pipeline answers `GET`s from a
//! store when `Cache-Control`, `Expires` and the entry's age allow it, and
//! revalidates stale entries with conditional requests otherwise. Each
//! response it returns is tagged `X-Cache-Status: MISS | HIT | STALE | REVALIDATED`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use rttp_cache::{CacheStatus, Error, HttpCache, Request, Response, StatusCode};
//! use rttp_cache::cache::{DefaultKeyStrategy, MemoryStore};
//! use rttp_cache::middleware::{LoggerMiddleware, Pipeline};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Error> {
//!     let cache = HttpCache::new(Arc::new(MemoryStore::new()), Arc::new(DefaultKeyStrategy));
//!     let pipeline = Pipeline::new(|_req: Request| async {
//!         Ok::<_, Error>(Response::new(StatusCode::Ok).max_age(60).body("Hello, World!"))
//!     })
//!     .with(LoggerMiddleware)
//!     .with(cache.clone());
//!
//!     let res = pipeline.send(Request::get("https://example.com/")).await?;
//!     assert_eq!(res.cache_status(), Some(CacheStatus::Miss));
//!     let res = pipeline.send(Request::get("https://example.com/")).await?;
//!     assert_eq!(res.cache_status(), Some(CacheStatus::Hit));
//!
//!     cache.close().await
//! }
//! ```

pub mod cache;
pub mod error;
pub mod http;
pub mod middleware;

// ── Convenience re-exports ────────────────────────────────────────────────────
pub use cache::{CacheStatus, HttpCache};
pub use error::{BoxError, Error};
pub use http::{Body, Headers, Method, Request, Response, StatusCode};
