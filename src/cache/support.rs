//! Fakes shared by the cache tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use super::entry::CacheEntry;
use super::store::{CacheStore, MemoryStore, StoreError};
use crate::http::Body;
use crate::middleware::{ResponseFuture, Transport};
use crate::{Error, Request, Response};

/// A [`MemoryStore`] that counts every call and can be told to fail.
#[derive(Default)]
pub struct CountingStore {
    inner: MemoryStore,
    pub gets: AtomicUsize,
    pub puts: AtomicUsize,
    pub removes: AtomicUsize,
    failing: AtomicBool,
}

impl CountingStore {
    pub fn calls(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
            + self.puts.load(Ordering::SeqCst)
            + self.removes.load(Ordering::SeqCst)
    }

    pub fn fail(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    pub async fn peek(&self, key: &str) -> Option<CacheEntry> {
        self.inner.get(key).await.unwrap()
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("disk full".to_owned()));
        }
        Ok(())
    }
}

#[async_trait]
impl CacheStore for CountingStore {
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>, StoreError> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        self.inner.get(key).await
    }

    async fn put(&self, key: &str, entry: CacheEntry) -> Result<(), StoreError> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        self.inner.put(key, entry).await
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.removes.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        self.inner.remove(key).await
    }

    async fn close(&self) -> Result<(), StoreError> {
        self.inner.close().await
    }
}

/// A transport that replays queued responses and records what it was sent.
#[derive(Clone, Default)]
pub struct ScriptedOrigin {
    state: Arc<OriginState>,
}

#[derive(Default)]
struct OriginState {
    replies: Mutex<VecDeque<Result<Response, Error>>>,
    seen: Mutex<Vec<Request>>,
    delay: Mutex<Option<Duration>>,
}

impl ScriptedOrigin {
    pub fn reply(&self, response: Response) -> &Self {
        self.state.replies.lock().unwrap().push_back(Ok(response));
        self
    }

    pub fn fail(&self, message: &'static str) -> &Self {
        self.state
            .replies
            .lock()
            .unwrap()
            .push_back(Err(Error::transport(message)));
        self
    }

    /// Makes every call sleep for `delay` before answering.
    pub fn slow(&self, delay: Duration) {
        *self.state.delay.lock().unwrap() = Some(delay);
    }

    pub fn calls(&self) -> usize {
        self.state.seen.lock().unwrap().len()
    }

    pub fn last_request(&self) -> Option<Request> {
        self.state.seen.lock().unwrap().last().cloned()
    }
}

impl Transport for ScriptedOrigin {
    fn send(&self, request: Request) -> ResponseFuture {
        let state = Arc::clone(&self.state);
        Box::pin(async move {
            state.seen.lock().unwrap().push(request);
            let delay = *state.delay.lock().unwrap();
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            state
                .replies
                .lock()
                .unwrap()
                .pop_front()
                .expect("origin called more often than scripted")
        })
    }
}

/// Counts body releases.
#[derive(Clone, Default)]
pub struct ReleaseCounter(Arc<AtomicUsize>);

impl ReleaseCounter {
    /// Wraps `bytes` in a body that bumps this counter when dropped.
    pub fn body(&self, bytes: &'static str) -> Body {
        let count = Arc::clone(&self.0);
        Body::from(bytes).on_release(move || {
            count.fetch_add(1, Ordering::SeqCst);
        })
    }

    pub fn released(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}
