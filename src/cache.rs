use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::segment;
use crate::types::Span;

/// (source, term, `case_sensitive`)
type Key = (Arc<str>, Arc<str>, bool);

/// Cached segmentation with insertion timestamp for TTL-based eviction.
struct CacheEntry {
    spans: Arc<[Span]>,
    inserted_at: Instant,
}

/// Memo of segmentation results. Segmenting is deterministic, so a hit is
/// indistinguishable from recomputing. Safe to share across threads by
/// reference.
pub struct SegmentCache {
    entries: DashMap<Key, CacheEntry>,
    /// Entry cap; the oldest entry goes when an insert exceeds it.
    capacity: Option<usize>,
}

impl Default for SegmentCache {
    fn default() -> Self {
        Self {
            entries: DashMap::new(),
            capacity: None,
        }
    }
}

impl SegmentCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A cache holding at most `capacity` entries (at least one).
    #[must_use]
    pub fn bounded(capacity: usize) -> Self {
        Self {
            entries: DashMap::new(),
            capacity: Some(capacity.max(1)),
        }
    }

    /// Cached spans for the inputs, computing them on a miss.
    /// Uses `entry()` API to avoid TOCTOU race between get and insert.
    pub fn get_or_compute(&self, source: &str, term: &str, case_sensitive: bool) -> Arc<[Span]> {
        let key: Key = (source.into(), term.into(), case_sensitive);
        let spans = match self.entries.entry(key) {
            Entry::Occupied(e) => return Arc::clone(&e.get().spans),
            Entry::Vacant(e) => {
                let spans: Arc<[Span]> = segment::spans(source, term, case_sensitive).into();
                e.insert(CacheEntry {
                    spans: Arc::clone(&spans),
                    inserted_at: Instant::now(),
                });
                spans
            }
        };
        // Entry guard is dropped here; evicting while holding it would deadlock.
        self.enforce_capacity();
        spans
    }

    fn enforce_capacity(&self) {
        let Some(capacity) = self.capacity else {
            return;
        };
        while self.entries.len() > capacity {
            let oldest = self
                .entries
                .iter()
                .min_by_key(|e| e.value().inserted_at)
                .map(|e| e.key().clone());
            match oldest {
                Some(key) => {
                    self.entries.remove(&key);
                }
                None => break,
            }
        }
    }

    /// Evict entries that were cached more than `max_age` ago.
    pub fn prune(&self, max_age: Duration) {
        let Some(cutoff) = Instant::now().checked_sub(max_age) else {
            return;
        };
        self.entries.retain(|_, entry| entry.inserted_at > cutoff);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
