//! The shape cache: shaped words, kept for next time
//!
//! Shaping is the expensive step, so each word's unspaced result is
//! cached under its text and the identity of the font stack that shaped
//! it. Entries are immutable once inserted: spacing and justification
//! are always applied to a private clone, never to the cached value.
//! That single rule is what keeps the cache correct under repeated
//! queries with different spacing.
//!
//! The map itself is an LRU behind a mutex, so a cache instance may be
//! shared across threads by embedders that want to; single-threaded
//! callers pay one uncontended lock per word.

// this_file: crates/wordshape-core/src/cache.rs

use std::num::NonZeroUsize;

use lru::LruCache;
use parking_lot::Mutex;

/// Identifies one shaped word: its text and the font stack
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShapeCacheKey {
    /// The word's UTF-16 code units
    pub text: Vec<u16>,
    /// `Font::cache_key()` of the stack that shaped it
    pub font_key: u64,
}

impl ShapeCacheKey {
    pub fn new(text: &[u16], font_key: u64) -> Self {
        Self {
            text: text.to_vec(),
            font_key,
        }
    }
}

/// Default capacity, in words
const DEFAULT_CAPACITY: NonZeroUsize = match NonZeroUsize::new(2048) {
    Some(v) => v,
    None => unreachable!(),
};

/// LRU cache from word text + font key to an immutable shape result
///
/// Generic over the value so the result type can live in a downstream
/// crate; in practice `V` is `Arc<ShapeResult>`.
pub struct ShapeCache<V: Clone> {
    entries: Mutex<LruCache<ShapeCacheKey, V>>,
    metrics: Mutex<CacheMetrics>,
}

impl<V: Clone> ShapeCache<V> {
    /// Create a cache with the default capacity
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY.get())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(DEFAULT_CAPACITY);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            metrics: Mutex::new(CacheMetrics::default()),
        }
    }

    /// Fetch a previously shaped word
    pub fn get(&self, key: &ShapeCacheKey) -> Option<V> {
        let hit = self.entries.lock().get(key).cloned();
        let mut metrics = self.metrics.lock();
        if hit.is_some() {
            metrics.hits += 1;
        } else {
            metrics.misses += 1;
        }
        hit
    }

    /// Remember a word's unspaced result
    ///
    /// The value must never be mutated after insertion; callers that
    /// need spacing clone first.
    pub fn insert(&self, key: ShapeCacheKey, value: V) {
        if let Some((evicted, _)) = self.entries.lock().push(key, value) {
            log::trace!("evicted a {}-unit word from the shape cache", evicted.text.len());
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Snapshot of hit/miss counters
    pub fn metrics(&self) -> CacheMetrics {
        self.metrics.lock().clone()
    }
}

impl<V: Clone> Default for ShapeCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Hit/miss counters for one cache instance
#[derive(Debug, Clone, Default)]
pub struct CacheMetrics {
    pub hits: u64,
    pub misses: u64,
}

impl CacheMetrics {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
