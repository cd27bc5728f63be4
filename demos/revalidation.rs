//! Walks one resource through MISS, HIT, STALE and REVALIDATED.
//!
//! ```text
//! RUST_LOG=rttp_cache=debug cargo run --example revalidation
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, SystemTime};

use rttp_cache::cache::{Clock, DefaultKeyStrategy, ManualClock, MemoryStore};
use rttp_cache::middleware::{LoggerMiddleware, Pipeline};
use rttp_cache::{Error, HttpCache, Request, Response, StatusCode};
use tracing_subscriber::EnvFilter;

const URL: &str = "https://example.com/articles/42";

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let clock = Arc::new(ManualClock::new(SystemTime::now()));
    let cache = HttpCache::new(Arc::new(MemoryStore::new()), Arc::new(DefaultKeyStrategy))
        .with_clock(clock.clone());

    // The origin answers the first call in full and every later one with a 304.
    let calls = Arc::new(AtomicUsize::new(0));
    let origin_clock = clock.clone();
    let origin_calls = calls.clone();
    let origin = move |request: Request| {
        let now = origin_clock.now();
        let call = origin_calls.fetch_add(1, Ordering::SeqCst);
        async move {
            let conditional = request.headers().contains("if-none-match");
            let response = if call > 0 && conditional {
                Response::new(StatusCode::NotModified).date(now).shared_max_age(60)
            } else {
                Response::new(StatusCode::Ok)
                    .date(now)
                    .shared_max_age(60)
                    .etag("article-42-v1")
                    .body("The answer is 42.")
            };
            Ok::<_, Error>(response)
        }
    };

    let pipeline = Pipeline::new(origin)
        .with(LoggerMiddleware)
        .with(cache.clone());

    let steps: [(u64, Option<&str>); 4] = [
        (0, None),
        (30, None),
        (60, Some("max-stale")),
        (0, None),
    ];
    for (advance, cache_control) in steps {
        clock.advance(Duration::from_secs(advance));
        let mut request = Request::get(URL);
        if let Some(value) = cache_control {
            request = request.header("Cache-Control", value);
        }
        let response = pipeline.send(request).await?;
        println!(
            "{:>11}  {}  origin calls: {}",
            response.cache_status().map_or("-", |s| s.as_str()),
            response.status(),
            calls.load(Ordering::SeqCst),
        );
    }

    cache.close().await
}
