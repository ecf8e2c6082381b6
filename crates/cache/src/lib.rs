//! # Cache Crate
//!
//! An explicit TTL cache with optional LRU eviction.
//!
//! The cache is an instance owned by whoever handles requests, never a
//! module-level singleton: construct it, put it in your state, and share it
//! behind an `Arc`. Entries expire `ttl` after insertion; when a capacity is
//! configured, inserting into a full cache evicts the least recently used
//! entry.

use std::collections::HashMap;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::debug;

#[derive(Debug)]
struct Entry<V> {
    value: V,
    expires_at: Instant,
    last_used: Instant,
}

/// A thread-safe map with per-entry expiry and optional LRU eviction.
///
/// Lookups clone the value out; values are expected to be cheap to clone or
/// wrapped in `Arc` by the caller.
#[derive(Debug)]
pub struct TtlCache<K, V> {
    entries: Mutex<HashMap<K, Entry<V>>>,
    ttl: Duration,
    capacity: Option<NonZeroUsize>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Create an unbounded cache where entries live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
            capacity: None,
        }
    }

    /// Create a cache holding at most `capacity` entries, evicting the least
    /// recently used entry when full.
    pub fn with_capacity(ttl: Duration, capacity: NonZeroUsize) -> Self {
        Self {
            entries: Mutex::new(HashMap::with_capacity(capacity.get())),
            ttl,
            capacity: Some(capacity),
        }
    }

    /// Look up a key, treating expired entries as absent.
    ///
    /// A hit refreshes the entry's recency but not its expiry; the TTL runs
    /// from insertion.
    pub fn get(&self, key: &K) -> Option<V> {
        let now = Instant::now();
        let mut entries = self.entries.lock().ok()?;
        match entries.get_mut(key) {
            Some(entry) if entry.expires_at > now => {
                entry.last_used = now;
                Some(entry.value.clone())
            }
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Insert or replace an entry, evicting if at capacity.
    pub fn insert(&self, key: K, value: V) {
        let now = Instant::now();
        let Ok(mut entries) = self.entries.lock() else {
            return;
        };

        // Drop expired entries before considering eviction, so stale entries
        // never push out live ones.
        entries.retain(|_, entry| entry.expires_at > now);

        if let Some(capacity) = self.capacity {
            if !entries.contains_key(&key) && entries.len() >= capacity.get() {
                let oldest = entries
                    .iter()
                    .min_by_key(|(_, entry)| entry.last_used)
                    .map(|(key, _)| key.clone());
                if let Some(oldest) = oldest {
                    debug!("evicting least recently used cache entry");
                    entries.remove(&oldest);
                }
            }
        }

        entries.insert(
            key,
            Entry {
                value,
                expires_at: now + self.ttl,
                last_used: now,
            },
        );
    }

    /// Remove one entry.
    pub fn remove(&self, key: &K) -> Option<V> {
        let mut entries = self.entries.lock().ok()?;
        entries.remove(key).map(|entry| entry.value)
    }

    /// Drop every entry. Used to invalidate after a write to the backing
    /// data.
    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }

    /// Number of entries currently held, expired or not.
    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    /// True when the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
