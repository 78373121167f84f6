use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use tokio::sync::Mutex;

#[derive(Debug)]
struct CacheEntry<V> {
    stored_at: Instant,
    value: V,
}

/// Request-keyed response cache with a fixed freshness window.
///
/// Entries older than `ttl` are treated as misses and swept on every insert,
/// so the map never holds more than one window's worth of keys.
#[derive(Debug, Clone)]
pub struct ResponseCache<V> {
    ttl: Duration,
    entries: Arc<Mutex<HashMap<String, CacheEntry<V>>>>,
}

impl<V: Clone> ResponseCache<V> {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Returns a clone of the cached value if it is still fresh.
    pub async fn get(&self, key: &str) -> Option<V> {
        let entries = self.entries.lock().await;
        entries
            .get(key)
            .filter(|entry| entry.stored_at.elapsed() < self.ttl)
            .map(|entry| entry.value.clone())
    }

    pub async fn insert(&self, key: impl Into<String>, value: V) {
        let mut entries = self.entries.lock().await;
        let ttl = self.ttl;
        entries.retain(|_, entry| entry.stored_at.elapsed() < ttl);
        if ttl.is_zero() {
            return;
        }
        entries.insert(
            key.into(),
            CacheEntry {
                stored_at: Instant::now(),
                value,
            },
        );
    }

    pub async fn invalidate(&self, key: &str) {
        self.entries.lock().await.remove(key);
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }
}
