//! Session-scoped cache for fetched view data.
//!
//! An explicit abstraction injected into the fetch orchestrator rather than
//! ambient global state. Values are JSON documents; a cached value that
//! fails its structural check is invalidated and treated as absent, which
//! triggers a re-fetch.

use std::time::Duration;

use moka::future::Cache;
use serde_json::Value;

/// Cache key for the daily-extremes payload.
pub const EXTREMES_KEY: &str = "extremesData";

/// Cache key for the recommendations payload.
pub const RECOMMENDATIONS_KEY: &str = "recommendationsData";

/// String-keyed JSON cache with a session-scoped TTL.
#[derive(Clone)]
pub struct SessionCache {
    inner: Cache<String, Value>,
}

impl SessionCache {
    pub fn new(max_capacity: u64, time_to_live: Duration) -> Self {
        SessionCache {
            inner: Cache::builder()
                .max_capacity(max_capacity)
                .time_to_live(time_to_live)
                .build(),
        }
    }

    pub async fn get(&self, key: &str) -> Option<Value> {
        self.inner.get(key).await
    }

    pub async fn put(&self, key: &str, value: Value) {
        self.inner.insert(key.to_string(), value).await;
    }

    pub async fn invalidate(&self, key: &str) {
        self.inner.invalidate(key).await;
    }

    /// Read a cached value, enforcing its structural check. Malformed cached
    /// data is discarded so the caller falls through to a fresh fetch.
    pub async fn get_valid<F>(&self, key: &str, is_valid: F) -> Option<Value>
    where
        F: Fn(&Value) -> bool,
    {
        let value = self.inner.get(key).await?;
        if is_valid(&value) {
            Some(value)
        } else {
            tracing::warn!(key, "discarding structurally invalid cached value");
            self.inner.invalidate(key).await;
            None
        }
    }
}
