//! In-memory cache of the latest thumbnail per video
//!
//! Bounded both by entry count and by total payload size; the least recently
//! used entries are evicted first. Thumbnails are also persisted to the
//! assets directory, so an eviction never loses data.

use axum::body::Bytes;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

/// A cached thumbnail upload
#[derive(Debug, Clone, PartialEq)]
pub struct Thumbnail {
    /// Name of the file under the assets root
    pub file_name: String,
    pub media_type: String,
    pub data: Bytes,
}

struct Inner {
    entries: LruCache<Uuid, Thumbnail>,
    total_bytes: usize,
    max_bytes: usize,
}

/// Shared, thread-safe thumbnail cache keyed by video ID
#[derive(Clone)]
pub struct ThumbnailCache {
    inner: Arc<Mutex<Inner>>,
    writes: Arc<tokio::sync::Mutex<()>>,
}

impl ThumbnailCache {
    pub fn new(max_entries: usize, max_bytes: usize) -> Self {
        let capacity = NonZeroUsize::new(max_entries).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Arc::new(Mutex::new(Inner {
                entries: LruCache::new(capacity),
                total_bytes: 0,
                max_bytes,
            })),
            writes: Arc::new(tokio::sync::Mutex::new(())),
        }
    }

    /// Held by an upload while it updates the record and then the cache, so
    /// concurrent uploads for a video land in both in the same order
    pub async fn lock_writes(&self) -> tokio::sync::MutexGuard<'_, ()> {
        self.writes.lock().await
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store `thumbnail` for `video_id`, returning the entry it replaced
    pub fn insert(&self, video_id: Uuid, thumbnail: Thumbnail) -> Option<Thumbnail> {
        let mut inner = self.lock();
        inner.total_bytes += thumbnail.data.len();

        let replaced = match inner.entries.push(video_id, thumbnail) {
            Some((key, old)) => {
                inner.total_bytes -= old.data.len();
                (key == video_id).then_some(old)
            }
            None => None,
        };

        while inner.total_bytes > inner.max_bytes {
            match inner.entries.pop_lru() {
                Some((_, evicted)) => inner.total_bytes -= evicted.data.len(),
                None => break,
            }
        }

        replaced
    }

    pub fn get(&self, video_id: Uuid) -> Option<Thumbnail> {
        self.lock().entries.get(&video_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sum of cached payload sizes
    pub fn total_bytes(&self) -> usize {
        self.lock().total_bytes
    }
}
