//! The caching middleware: composes the decision functions against the store.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, trace};

use super::cacheability::{self, default_cacheable_statuses};
use super::clock::{Clock, SystemClock};
use super::config::{CacheConfig, ConfigError};
use super::directives::RequestDirectives;
use super::entry::CacheEntry;
use super::freshness::Freshness;
use super::key::KeyStrategy;
use super::revalidation::{self, Reconciliation};
use super::staleness;
use super::status::CacheStatus;
use super::store::CacheStore;
use crate::middleware::{Middleware, Next, ResponseFuture};
use crate::{Error, Request, Response, StatusCode};

/// HTTP caching middleware for the outbound pipeline.
///
/// For each `GET` it looks the request up in the store and either answers
/// locally (`HIT`, `STALE`), revalidates the stored entry with a conditional
/// request (`REVALIDATED`), or forwards and maybe stores the origin's answer
/// (`MISS`). Every response it returns carries exactly one
/// [`CacheStatus`] in `X-Cache-Status`; pass-through requests carry none.
///
/// `HttpCache` keeps no per-request state. Clones share the store, key
/// strategy and clock.
///
/// # Examples
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use rttp_cache::{Error, Request, Response, StatusCode};
/// use rttp_cache::cache::{DefaultKeyStrategy, HttpCache, MemoryStore};
/// use rttp_cache::middleware::Pipeline;
///
/// # async fn demo() -> Result<(), Error> {
/// let cache = HttpCache::new(Arc::new(MemoryStore::new()), Arc::new(DefaultKeyStrategy));
/// let pipeline = Pipeline::new(|_req: Request| async {
///     Ok::<_, Error>(Response::new(StatusCode::Ok).max_age(60).body("hello"))
/// })
/// .with(cache);
///
/// let first = pipeline.send(Request::get("https://example.com/")).await?;
/// let second = pipeline.send(Request::get("https://example.com/")).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct HttpCache {
    store: Arc<dyn CacheStore>,
    keys: Arc<dyn KeyStrategy>,
    clock: Arc<dyn Clock>,
    cacheable_statuses: Arc<HashSet<StatusCode>>,
}

impl HttpCache {
    /// Creates a cache over `store` with the wall clock and default allow-list.
    pub fn new(store: Arc<dyn CacheStore>, keys: Arc<dyn KeyStrategy>) -> Self {
        Self {
            store,
            keys,
            clock: Arc::new(SystemClock),
            cacheable_statuses: Arc::new(default_cacheable_statuses()),
        }
    }

    /// Replaces the time source.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Applies `config`, replacing the allow-list.
    pub fn with_config(mut self, config: &CacheConfig) -> Result<Self, ConfigError> {
        self.cacheable_statuses = Arc::new(config.statuses()?);
        Ok(self)
    }

    /// Returns the status codes eligible for storage.
    pub fn cacheable_statuses(&self) -> &HashSet<StatusCode> {
        &self.cacheable_statuses
    }

    /// Returns the allow-list for editing. Clones made earlier keep their copy.
    pub fn cacheable_statuses_mut(&mut self) -> &mut HashSet<StatusCode> {
        Arc::make_mut(&mut self.cacheable_statuses)
    }

    /// Tears down the underlying store.
    pub async fn close(&self) -> Result<(), Error> {
        self.store.close().await?;
        Ok(())
    }

    /// Answers `request` from the store, the origin behind `next`, or both.
    ///
    /// # Errors
    ///
    /// Store, key strategy and transport failures are returned unchanged. A
    /// failed or cancelled origin call leaves the store untouched.
    pub async fn send(&self, mut request: Request, next: Next) -> Result<Response, Error> {
        let directives = RequestDirectives::from_headers(request.headers());
        if !cacheability::is_request_cacheable(&request, &directives) {
            trace!(method = %request.method(), uri = request.uri(), "not cacheable, passing through");
            return next.run(request).await;
        }

        let key = self.keys.key(&request)?;
        let revalidating = match self.store.get(&key).await? {
            Some(entry) => {
                let freshness = Freshness::of(&entry, self.clock.now());
                let no_cache =
                    directives.no_cache || entry.directives().is_some_and(|d| d.no_cache);

                if staleness::is_fresh(&directives, freshness) && !no_cache {
                    debug!(key = %key, "cache hit");
                    return Ok(serve(&entry, CacheStatus::Hit));
                }
                if staleness::is_stale_acceptable(&directives, &entry, freshness) {
                    debug!(key = %key, age = ?freshness.current_age, "serving stale entry");
                    return Ok(serve(&entry, CacheStatus::Stale));
                }

                debug!(key = %key, "revalidating stored entry");
                revalidation::attach_validators(&mut request, &entry);
                Some(entry)
            }
            None if directives.only_if_cached => {
                debug!(key = %key, "only-if-cached miss");
                let mut response =
                    Response::new(StatusCode::GatewayTimeout).with_request(Arc::new(request));
                response.set_cache_status(CacheStatus::Miss);
                return Ok(response);
            }
            None => None,
        };

        let sent = Arc::new(request.clone());
        let origin = next.run(request).await?;
        self.reconcile(sent, &key, revalidating, origin).await
    }

    /// Applies the origin's answer to the store and tags the returned response.
    async fn reconcile(
        &self,
        request: Arc<Request>,
        key: &str,
        revalidating: Option<CacheEntry>,
        mut origin: Response,
    ) -> Result<Response, Error> {
        let updated_key = self.keys.key_for_response(&request, &origin)?;
        let cacheable = cacheability::is_response_cacheable(&origin, &self.cacheable_statuses);
        let now = self.clock.now();

        let step = Reconciliation::decide(revalidating, origin.status(), cacheable);
        let status = step.status();
        match step {
            Reconciliation::Refresh(entry) => {
                let merged = revalidation::merge_not_modified(&entry, &origin, now);
                self.store.put(key, merged.clone()).await?;
                debug!(key = %key, "origin confirmed stored entry");
                // The 304 carries nothing worth keeping; release it now.
                drop(origin);
                return Ok(serve(&merged, status).with_request(request));
            }
            Reconciliation::Replace => {
                self.store.remove(key).await?;
                self.store
                    .put(&updated_key, CacheEntry::from_response(updated_key.as_str(), &origin, now))
                    .await?;
                debug!(key = %key, updated_key = %updated_key, "replaced stored entry");
            }
            Reconciliation::Store => {
                self.store
                    .put(&updated_key, CacheEntry::from_response(updated_key.as_str(), &origin, now))
                    .await?;
                debug!(key = %updated_key, "stored origin response");
            }
            Reconciliation::Bypass | Reconciliation::Skip => {
                trace!(key = %key, status = %origin.status(), "origin response not cacheable");
            }
        }

        origin.set_cache_status(status);
        Ok(origin)
    }
}

fn serve(entry: &CacheEntry, status: CacheStatus) -> Response {
    let mut response = entry.to_response();
    response.set_cache_status(status);
    response
}

impl Middleware for HttpCache {
    fn handle(&self, request: Request, next: Next) -> ResponseFuture {
        let cache = self.clone();
        Box::pin(async move { cache.send(request, next).await })
    }
}

impl std::fmt::Debug for HttpCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpCache")
            .field("cacheable_statuses", &self.cacheable_statuses)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, SystemTime};

    use super::*;
    use crate::cache::support::{CountingStore, ReleaseCounter, ScriptedOrigin};
    use crate::cache::{CacheStore, DefaultKeyStrategy, KeyError, ManualClock, StoreError};
    use crate::middleware::{LoggerMiddleware, Pipeline};
    use crate::Method;

    const URL: &str = "https://example.com/resource";
    const KEY: &str = "GET https://example.com/resource";
    const T0: u64 = 1_700_000_000;

    fn at(offset: u64) -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(T0 + offset)
    }

    struct Fixture {
        cache: HttpCache,
        store: Arc<CountingStore>,
        origin: ScriptedOrigin,
        clock: Arc<ManualClock>,
    }

    impl Fixture {
        fn new() -> Self {
            Self::with_keys(Arc::new(DefaultKeyStrategy))
        }

        fn with_keys(keys: Arc<dyn KeyStrategy>) -> Self {
            let store = Arc::new(CountingStore::default());
            let clock = Arc::new(ManualClock::new(at(0)));
            let cache = HttpCache::new(store.clone(), keys).with_clock(clock.clone());
            Self {
                cache,
                store,
                origin: ScriptedOrigin::default(),
                clock,
            }
        }

        async fn send(&self, request: Request) -> Result<Response, Error> {
            let next = Next::new(Vec::new(), Arc::new(self.origin.clone()));
            self.cache.send(request, next).await
        }

        /// Stores a 200 with `s-maxage=60`, `Date=t0` and an `ETag` via a miss.
        async fn prime(&self) {
            self.origin.reply(
                Response::new(StatusCode::Ok)
                    .date(at(0))
                    .shared_max_age(60)
                    .etag("v1")
                    .body("original"),
            );
            let res = self.send(Request::get(URL)).await.unwrap();
            assert_eq!(res.cache_status(), Some(CacheStatus::Miss));
        }

        fn set_time(&self, offset: u64) {
            self.clock.set(at(offset));
        }
    }

    fn body(response: &Response) -> &[u8] {
        response.content().map_or(&[][..], |b| &b.bytes()[..])
    }

    #[tokio::test]
    async fn fresh_entry_is_a_hit() {
        let f = Fixture::new();
        f.prime().await;
        f.set_time(30);

        let res = f.send(Request::get(URL)).await.unwrap();
        assert_eq!(res.cache_status(), Some(CacheStatus::Hit));
        assert_eq!(body(&res), b"original");
        assert_eq!(f.origin.calls(), 1);
    }

    #[tokio::test]
    async fn bare_max_stale_serves_stale_entry() {
        let f = Fixture::new();
        f.prime().await;
        f.set_time(90);

        let req = Request::get(URL).header("Cache-Control", "max-stale");
        let res = f.send(req).await.unwrap();
        assert_eq!(res.cache_status(), Some(CacheStatus::Stale));
        assert_eq!(body(&res), b"original");
        assert_eq!(f.origin.calls(), 1);

        // Bare max-stale ignores age entirely.
        f.set_time(100_000);
        let req = Request::get(URL).header("Cache-Control", "max-stale");
        let res = f.send(req).await.unwrap();
        assert_eq!(res.cache_status(), Some(CacheStatus::Stale));
    }

    #[tokio::test]
    async fn not_modified_merges_into_stored_entry() {
        let f = Fixture::new();
        let releases = ReleaseCounter::default();
        f.prime().await;
        f.set_time(90);
        f.origin.reply(
            Response::new(StatusCode::NotModified)
                .date(at(90))
                .max_age(120)
                .body(releases.body("")),
        );

        let res = f.send(Request::get(URL)).await.unwrap();

        let sent = f.origin.last_request().unwrap();
        assert_eq!(sent.headers().get("if-none-match"), Some("\"v1\""));

        assert_eq!(res.status(), StatusCode::Ok);
        assert_eq!(res.cache_status(), Some(CacheStatus::Revalidated));
        assert_eq!(body(&res), b"original");
        assert_eq!(res.headers().get_date("date"), Some(at(90)));
        assert_eq!(res.headers().get("cache-control"), Some("max-age=120"));
        assert_eq!(res.request().map(Request::uri), Some(URL));

        // The unused 304 is released; the served copy is not.
        assert_eq!(releases.released(), 1);

        let stored = f.store.peek(KEY).await.unwrap();
        assert_eq!(stored.date(), at(90));
        assert_eq!(stored.directives().and_then(|d| d.max_age), Some(Duration::from_secs(120)));
        assert_eq!(&stored.body().unwrap()[..], b"original");

        // The merged entry is fresh again.
        f.set_time(150);
        let res = f.send(Request::get(URL)).await.unwrap();
        assert_eq!(res.cache_status(), Some(CacheStatus::Hit));
        assert_eq!(f.origin.calls(), 2);
    }

    #[tokio::test]
    async fn not_modified_cache_control_is_kept_verbatim() {
        let f = Fixture::new();
        f.prime().await;
        f.set_time(90);
        let value = "private, max-age=120, stale-while-revalidate=30";
        f.origin
            .reply(Response::new(StatusCode::NotModified).header("Cache-Control", value));

        let res = f.send(Request::get(URL)).await.unwrap();
        assert_eq!(res.cache_status(), Some(CacheStatus::Revalidated));
        assert_eq!(res.headers().get("cache-control"), Some(value));

        let stored = f.store.peek(KEY).await.unwrap();
        assert_eq!(stored.headers().get("cache-control"), Some(value));
    }

    #[tokio::test]
    async fn expires_before_date_counts_as_staleness() {
        let f = Fixture::new();
        let already_expired = Response::new(StatusCode::Ok)
            .date(at(0))
            .expires(SystemTime::UNIX_EPOCH + Duration::from_secs(T0 - 3_600))
            .cache_directive("public")
            .body("expired");
        f.store
            .put(KEY, CacheEntry::from_response(KEY, &already_expired, at(0)))
            .await
            .unwrap();
        f.set_time(10);
        f.origin
            .reply(Response::new(StatusCode::NotModified).cache_directive("public"));

        // Stale by 3610s, well past the 60s the request tolerates.
        let req = Request::get(URL).header("Cache-Control", "max-stale=60");
        let res = f.send(req).await.unwrap();
        assert_eq!(res.cache_status(), Some(CacheStatus::Revalidated));
        assert_eq!(f.origin.calls(), 1);

        let req = Request::get(URL).header("Cache-Control", "min-fresh=0");
        f.origin
            .reply(Response::new(StatusCode::NotModified).cache_directive("public"));
        let res = f.send(req).await.unwrap();
        assert_eq!(res.cache_status(), Some(CacheStatus::Revalidated));
        assert_eq!(f.origin.calls(), 2);
    }

    #[tokio::test]
    async fn unlisted_status_is_never_stored() {
        let f = Fixture::new();
        for _ in 0..2 {
            f.origin.reply(
                Response::new(StatusCode::InternalServerError)
                    .max_age(60)
                    .body("boom"),
            );
            let res = f.send(Request::get(URL)).await.unwrap();
            assert_eq!(res.cache_status(), Some(CacheStatus::Miss));
            assert_eq!(res.status(), StatusCode::InternalServerError);
        }
        assert_eq!(f.store.puts.load(std::sync::atomic::Ordering::SeqCst), 0);
        assert_eq!(f.origin.calls(), 2);
    }

    #[tokio::test]
    async fn only_if_cached_without_entry_times_out_locally() {
        let f = Fixture::new();
        let req = Request::get(URL).header("Cache-Control", "only-if-cached");

        let res = f.send(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::GatewayTimeout);
        assert_eq!(res.cache_status(), Some(CacheStatus::Miss));
        assert!(res.request().is_some());
        assert_eq!(f.origin.calls(), 0);
    }

    #[tokio::test]
    async fn response_without_lifetime_is_not_stored() {
        let f = Fixture::new();
        f.origin
            .reply(Response::new(StatusCode::Ok).cache_directive("public").body("a"))
            .reply(Response::new(StatusCode::Ok).cache_directive("public").body("b"));

        let first = f.send(Request::get(URL)).await.unwrap();
        let second = f.send(Request::get(URL)).await.unwrap();
        assert_eq!(first.cache_status(), Some(CacheStatus::Miss));
        assert_eq!(second.cache_status(), Some(CacheStatus::Miss));
        assert_eq!(body(&second), b"b");
        assert!(f.store.peek(KEY).await.is_none());
    }

    #[tokio::test]
    async fn unsafe_methods_pass_through_without_store_access() {
        let f = Fixture::new();
        f.origin
            .reply(Response::new(StatusCode::Ok).max_age(60).body("created"))
            .reply(Response::new(StatusCode::Ok).max_age(60).body("again"));

        let res = f.send(Request::new(Method::Post, URL).body("payload")).await.unwrap();
        assert_eq!(res.cache_status(), None);
        let forwarded = f.origin.last_request().unwrap();
        assert_eq!(forwarded.method(), &Method::Post);
        assert_eq!(&forwarded.body_bytes()[..], b"payload");

        let res = f
            .send(Request::get(URL).header("Cache-Control", "no-store"))
            .await
            .unwrap();
        assert_eq!(res.cache_status(), None);
        assert_eq!(f.store.calls(), 0);
        assert_eq!(f.origin.calls(), 2);
    }

    #[tokio::test]
    async fn repeated_hits_are_identical() {
        let f = Fixture::new();
        f.prime().await;
        f.set_time(10);

        for _ in 0..5 {
            let res = f.send(Request::get(URL)).await.unwrap();
            assert_eq!(res.cache_status(), Some(CacheStatus::Hit));
            assert_eq!(body(&res), b"original");
            assert_eq!(res.headers().get_all(crate::http::response::CACHE_STATUS_HEADER).count(), 1);
        }
        assert_eq!(f.origin.calls(), 1);
    }

    #[tokio::test]
    async fn max_age_expiry_triggers_revalidation() {
        let f = Fixture::new();
        f.origin
            .reply(Response::new(StatusCode::Ok).date(at(0)).max_age(60).body("v1"))
            .reply(Response::new(StatusCode::Ok).max_age(60).body("v2"));
        f.send(Request::get(URL)).await.unwrap();

        f.set_time(59);
        let res = f.send(Request::get(URL)).await.unwrap();
        assert_eq!(res.cache_status(), Some(CacheStatus::Hit));

        f.set_time(60);
        let res = f.send(Request::get(URL)).await.unwrap();
        assert_eq!(res.cache_status(), Some(CacheStatus::Revalidated));
        assert_eq!(body(&res), b"v2");
        assert_eq!(f.origin.calls(), 2);

        let stored = f.store.peek(KEY).await.unwrap();
        assert_eq!(&stored.body().unwrap()[..], b"v2");
        assert_eq!(stored.date(), at(60));
    }

    #[tokio::test]
    async fn no_cache_forces_revalidation_of_fresh_entry() {
        let f = Fixture::new();
        f.prime().await;
        f.set_time(10);
        f.origin.reply(Response::new(StatusCode::NotModified).shared_max_age(60));

        let req = Request::get(URL).header("Cache-Control", "no-cache");
        let res = f.send(req).await.unwrap();
        assert_eq!(res.cache_status(), Some(CacheStatus::Revalidated));
        assert_eq!(body(&res), b"original");
        assert_eq!(f.origin.calls(), 2);
    }

    #[tokio::test]
    async fn response_no_cache_forces_revalidation() {
        let f = Fixture::new();
        f.origin
            .reply(
                Response::new(StatusCode::Ok)
                    .date(at(0))
                    .cache_directive("no-cache")
                    .max_age(60)
                    .etag("v1")
                    .body("original"),
            )
            .reply(Response::new(StatusCode::NotModified).max_age(60));
        f.send(Request::get(URL)).await.unwrap();
        f.set_time(5);

        // max-stale cannot override the origin's no-cache either.
        let req = Request::get(URL).header("Cache-Control", "max-stale");
        let res = f.send(req).await.unwrap();
        assert_eq!(res.cache_status(), Some(CacheStatus::Revalidated));
        assert_eq!(f.origin.calls(), 2);
    }

    #[tokio::test]
    async fn only_if_cached_with_stale_entry_still_revalidates() {
        let f = Fixture::new();
        f.prime().await;
        f.set_time(90);
        f.origin.reply(Response::new(StatusCode::NotModified).shared_max_age(60));

        let req = Request::get(URL).header("Cache-Control", "only-if-cached");
        let res = f.send(req).await.unwrap();
        assert_eq!(res.cache_status(), Some(CacheStatus::Revalidated));
        assert_eq!(f.origin.calls(), 2);
    }

    /// Keys stored responses by their `ETag`, the way a `Vary`-aware strategy would.
    struct EtagKeys;

    impl KeyStrategy for EtagKeys {
        fn key(&self, request: &Request) -> Result<String, KeyError> {
            DefaultKeyStrategy.key(request)
        }

        fn key_for_response(&self, request: &Request, response: &Response) -> Result<String, KeyError> {
            let key = self.key(request)?;
            Ok(match response.headers().get("etag") {
                Some(etag) => format!("{key} {etag}"),
                None => key,
            })
        }
    }

    #[tokio::test]
    async fn replacement_moves_entry_to_post_response_key() {
        let f = Fixture::with_keys(Arc::new(EtagKeys));
        let original = Response::new(StatusCode::Ok).date(at(0)).max_age(60).body("old");
        f.store
            .put(KEY, CacheEntry::from_response(KEY, &original, at(0)))
            .await
            .unwrap();
        f.set_time(90);
        f.origin
            .reply(Response::new(StatusCode::Ok).max_age(60).etag("v2").body("new"));

        let res = f.send(Request::get(URL)).await.unwrap();
        assert_eq!(res.cache_status(), Some(CacheStatus::Revalidated));
        assert_eq!(body(&res), b"new");
        assert!(f.store.peek(KEY).await.is_none());

        let moved = f.store.peek(&format!("{KEY} \"v2\"")).await.unwrap();
        assert_eq!(&moved.body().unwrap()[..], b"new");
    }

    #[tokio::test]
    async fn uncacheable_revalidation_leaves_entry_alone() {
        let f = Fixture::new();
        f.prime().await;
        f.set_time(90);
        f.origin
            .reply(Response::new(StatusCode::Ok).cache_directive("no-store").body("secret"));

        let res = f.send(Request::get(URL)).await.unwrap();
        assert_eq!(res.cache_status(), Some(CacheStatus::Revalidated));
        assert_eq!(body(&res), b"secret");

        let stored = f.store.peek(KEY).await.unwrap();
        assert_eq!(&stored.body().unwrap()[..], b"original");
        assert_eq!(f.store.removes.load(std::sync::atomic::Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn returned_origin_body_is_released_by_the_caller() {
        let f = Fixture::new();
        let releases = ReleaseCounter::default();
        f.origin
            .reply(Response::new(StatusCode::Ok).max_age(60).body(releases.body("payload")));

        let res = f.send(Request::get(URL)).await.unwrap();
        assert_eq!(releases.released(), 0);
        drop(res);
        assert_eq!(releases.released(), 1);

        // Hits are built from stored bytes and carry no hook.
        let hit = f.send(Request::get(URL)).await.unwrap();
        assert_eq!(hit.cache_status(), Some(CacheStatus::Hit));
        drop(hit);
        assert_eq!(releases.released(), 1);
    }

    #[tokio::test]
    async fn transport_failure_propagates_without_store_update() {
        let f = Fixture::new();
        f.prime().await;
        f.set_time(90);
        f.origin.fail("connection reset");

        let err = f.send(Request::get(URL)).await.unwrap_err();
        assert!(matches!(err, Error::Transport(_)));

        let stored = f.store.peek(KEY).await.unwrap();
        assert_eq!(stored.date(), at(0));
        assert_eq!(f.store.puts.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn cancelled_origin_call_leaves_store_untouched() {
        let f = Fixture::new();
        f.origin.slow(Duration::from_millis(200));
        f.origin.reply(Response::new(StatusCode::Ok).max_age(60).body("late"));

        let attempt = tokio::time::timeout(Duration::from_millis(10), f.send(Request::get(URL))).await;
        assert!(attempt.is_err());
        assert_eq!(f.origin.calls(), 1);
        assert!(f.store.peek(KEY).await.is_none());
        assert_eq!(f.store.puts.load(std::sync::atomic::Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn store_failure_propagates() {
        let f = Fixture::new();
        f.store.fail();

        let err = f.send(Request::get(URL)).await.unwrap_err();
        assert!(matches!(err, Error::Store(StoreError::Backend(_))));
        assert_eq!(f.origin.calls(), 0);
    }

    #[tokio::test]
    async fn close_shuts_down_the_store() {
        let f = Fixture::new();
        f.cache.close().await.unwrap();

        let err = f.send(Request::get(URL)).await.unwrap_err();
        assert!(matches!(err, Error::Store(StoreError::Closed)));
    }

    #[tokio::test]
    async fn allow_list_is_configurable() {
        let config = CacheConfig::from_json(r#"{"cacheable_statuses":[500]}"#).unwrap();
        let mut f = Fixture::new();
        f.cache = f.cache.clone().with_config(&config).unwrap();
        assert_eq!(f.cache.cacheable_statuses().len(), 1);

        f.origin
            .reply(Response::new(StatusCode::InternalServerError).max_age(60).body("oops"))
            .reply(Response::new(StatusCode::Ok).max_age(60).body("fine"));
        f.send(Request::get(URL)).await.unwrap();
        assert!(f.store.peek(KEY).await.is_some());

        f.cache.cacheable_statuses_mut().remove(&StatusCode::InternalServerError);
        f.cache.cacheable_statuses_mut().insert(StatusCode::Ok);
        f.store.remove(KEY).await.unwrap();
        f.send(Request::get(URL)).await.unwrap();
        let stored = f.store.peek(KEY).await.unwrap();
        assert_eq!(stored.status(), StatusCode::Ok);
    }

    #[tokio::test]
    async fn works_as_pipeline_middleware() {
        let f = Fixture::new();
        f.origin
            .reply(Response::new(StatusCode::Ok).max_age(60).body("hello"));
        let pipeline = Pipeline::new(f.origin.clone())
            .with(LoggerMiddleware)
            .with(f.cache.clone());

        let first = pipeline.send(Request::get(URL)).await.unwrap();
        let second = pipeline.send(Request::get(URL)).await.unwrap();
        assert_eq!(first.cache_status(), Some(CacheStatus::Miss));
        assert_eq!(second.cache_status(), Some(CacheStatus::Hit));
        assert_eq!(body(&second), b"hello");
        assert_eq!(f.origin.calls(), 1);
    }
}
