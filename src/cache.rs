//! TTL cache over a plain map.
//!
//! Used by the web tier to memoize search-provider responses. Entries are
//! stamped at insertion and read as misses once their TTL has elapsed.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

/// Expiring key/value store.
pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: HashMap<K, (V, Instant)>,
}

impl<K: Eq + Hash, V> TtlCache<K, V> {
    /// Create a cache whose entries expire `ttl` after insertion.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    /// Insert a value, replacing (and re-stamping) any existing entry.
    pub fn insert(&mut self, key: K, value: V) {
        self.entries.insert(key, (value, Instant::now()));
    }

    /// Look up a fresh entry. Expired entries read as misses and are
    /// dropped.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let expired = match self.entries.get(key) {
            Some((_, stamped)) => stamped.elapsed() >= self.ttl,
            None => return None,
        };

        if expired {
            self.entries.remove(key);
            return None;
        }

        self.entries.get(key).map(|(value, _)| value)
    }

    /// Drop every expired entry.
    pub fn purge_expired(&mut self) {
        let ttl = self.ttl;
        self.entries.retain(|_, (_, stamped)| stamped.elapsed() < ttl);
    }

    /// Number of entries currently held, expired ones included until the
    /// next access or purge.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
