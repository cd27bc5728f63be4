//! Errors surfaced by the outbound pipeline.

use thiserror::Error;

use crate::cache::{KeyError, StoreError};

/// A boxed error from a transport or user middleware.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors produced while sending a request through the pipeline.
///
/// The cache layer never masks or retries these: a failing store, key
/// strategy or transport is reported to the caller as-is.
#[derive(Debug, Error)]
pub enum Error {
    #[error("transport error: {0}")]
    Transport(#[source] BoxError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Key(#[from] KeyError),
}

impl Error {
    /// Wraps a transport failure.
    pub fn transport(err: impl Into<BoxError>) -> Self {
        Self::Transport(err.into())
    }
}
