//! Response bodies with deterministic release.
//!
//! A [`Body`] owns its bytes and, optionally, a release hook supplied by the
//! transport (returning a pooled connection, closing a stream, counting
//! releases in tests). The hook runs exactly once, when the body is dropped,
//! so a response the cache decides not to return is released on every exit
//! path without an explicit dispose call.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use bytes::Bytes;

type ReleaseHook = Box<dyn FnOnce() + Send + Sync>;

/// A fully buffered message body.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use rttp_cache::http::Body;
///
/// let released = Arc::new(AtomicUsize::new(0));
/// let counter = Arc::clone(&released);
/// let body = Body::from("payload").on_release(move || {
///     counter.fetch_add(1, Ordering::SeqCst);
/// });
///
/// assert_eq!(body.len(), 7);
/// drop(body);
/// assert_eq!(released.load(Ordering::SeqCst), 1);
/// ```
pub struct Body {
    bytes: Bytes,
    on_release: Option<ReleaseHook>,
}

impl Body {
    /// Creates a body from anything convertible into [`Bytes`].
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self {
            bytes: bytes.into(),
            on_release: None,
        }
    }

    /// Attaches a hook that runs when the body is released.
    ///
    /// Replaces any previously attached hook without running it.
    #[must_use]
    pub fn on_release(mut self, hook: impl FnOnce() + Send + Sync + 'static) -> Self {
        self.on_release = Some(Box::new(hook));
        self
    }

    /// Returns the body bytes.
    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    /// Returns the body length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if the body holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl Drop for Body {
    fn drop(&mut self) {
        let Some(hook) = self.on_release.take() else {
            return;
        };
        // A failing release must not take the response being returned with it.
        if panic::catch_unwind(AssertUnwindSafe(hook)).is_err() {
            tracing::warn!(len = self.bytes.len(), "body release hook panicked");
        }
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Body")
            .field("len", &self.bytes.len())
            .field("on_release", &self.on_release.is_some())
            .finish()
    }
}

impl From<Bytes> for Body {
    fn from(bytes: Bytes) -> Self {
        Self::new(bytes)
    }
}

impl From<Vec<u8>> for Body {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl From<&'static str> for Body {
    fn from(text: &'static str) -> Self {
        Self::new(text)
    }
}
