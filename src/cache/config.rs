//! Cache configuration.
//!
//! ```json
//! { "cacheable_statuses": [200, 203, 204, 206, 300, 301, 404, 405, 410, 414, 501] }
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::cacheability::DEFAULT_CACHEABLE_STATUSES;
use crate::http::{StatusCode, StatusCodeError};

/// Errors raised while loading a [`CacheConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid cache configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cacheable_statuses contains an invalid code: {0}")]
    InvalidStatus(#[from] StatusCodeError),
}

/// Tunables for [`HttpCache`](super::HttpCache).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Response status codes eligible for storage.
    pub cacheable_statuses: Vec<u16>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            cacheable_statuses: DEFAULT_CACHEABLE_STATUSES
                .iter()
                .map(|status| status.as_u16())
                .collect(),
        }
    }
}

impl CacheConfig {
    /// Parses a JSON document. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.statuses()?;
        Ok(config)
    }

    /// Resolves the configured codes into a status set.
    pub fn statuses(&self) -> Result<HashSet<StatusCode>, ConfigError> {
        self.cacheable_statuses
            .iter()
            .map(|&code| StatusCode::try_from(code).map_err(ConfigError::from))
            .collect()
    }
}
