//! The storage collaborator.
//!
//! The cache layer treats each store call as atomic and owns no locking of its
//! own. Concurrent writers to the same key, eviction and persistence are the
//! store's business.

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;

use super::entry::CacheEntry;

/// Errors raised by a [`CacheStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cache store is closed")]
    Closed,

    #[error("cache store backend failure: {0}")]
    Backend(String),
}

/// A key-value backend holding at most one entry per key.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Returns the entry stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>, StoreError>;

    /// Stores `entry` under `key`, replacing any previous entry.
    async fn put(&self, key: &str, entry: CacheEntry) -> Result<(), StoreError>;

    /// Removes the entry under `key`, if any.
    async fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// Releases the backend's resources. Later calls may fail.
    async fn close(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// An unbounded in-process store.
///
/// # Examples
///
/// ```
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// use std::time::SystemTime;
/// use rttp_cache::cache::{CacheEntry, CacheStore, MemoryStore};
/// use rttp_cache::http::{Response, StatusCode};
///
/// let store = MemoryStore::new();
/// let response = Response::new(StatusCode::Ok).max_age(60).body("hi");
/// store.put("k", CacheEntry::from_response("k", &response, SystemTime::now())).await.unwrap();
/// assert!(store.get("k").await.unwrap().is_some());
/// # });
/// ```
#[derive(Debug)]
pub struct MemoryStore {
    // `None` once closed.
    entries: RwLock<Option<HashMap<String, CacheEntry>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Some(HashMap::new())),
        }
    }

    /// Returns the number of stored entries; zero once closed.
    pub async fn len(&self) -> usize {
        self.entries.read().await.as_ref().map_or(0, HashMap::len)
    }

    /// Returns `true` if nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>, StoreError> {
        let entries = self.entries.read().await;
        let entries = entries.as_ref().ok_or(StoreError::Closed)?;
        Ok(entries.get(key).cloned())
    }

    async fn put(&self, key: &str, entry: CacheEntry) -> Result<(), StoreError> {
        let mut entries = self.entries.write().await;
        let entries = entries.as_mut().ok_or(StoreError::Closed)?;
        entries.insert(key.to_owned(), entry);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.write().await;
        let entries = entries.as_mut().ok_or(StoreError::Closed)?;
        entries.remove(key);
        Ok(())
    }

    async fn close(&self) -> Result<(), StoreError> {
        self.entries.write().await.take();
        Ok(())
    }
}
