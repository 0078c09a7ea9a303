//! In-memory embedding cache keyed by `(blake3(content), embedder_id)`.
//!
//! The candidate is compared against every reference, so caching turns N
//! candidate embeddings into one. The cache is consulted before calling the
//! embedder and written through on misses; when full it is cleared.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

pub const DEFAULT_MAX_ENTRIES: usize = 4096;

type Key = (String, String);

pub struct EmbeddingCache {
    entries: Mutex<HashMap<Key, Arc<Vec<f32>>>>,
    max_entries: usize,
}

impl Default for EmbeddingCache {
    fn default() -> Self { Self::with_capacity(DEFAULT_MAX_ENTRIES) }
}

impl EmbeddingCache {
    pub fn with_capacity(max_entries: usize) -> Self {
        Self { entries: Mutex::new(HashMap::new()), max_entries: max_entries.max(1) }
    }

    pub fn content_hash(text: &str) -> String { blake3::hash(text.as_bytes()).to_hex().to_string() }

    pub fn get(&self, embedder_id: &str, content_hash: &str) -> Option<Arc<Vec<f32>>> {
        self.lock().get(&(content_hash.to_string(), embedder_id.to_string())).cloned()
    }

    pub fn put(&self, embedder_id: &str, content_hash: String, vector: Vec<f32>) -> Arc<Vec<f32>> {
        let vector = Arc::new(vector);
        let mut entries = self.lock();
        if entries.len() >= self.max_entries { entries.clear(); }
        entries.insert((content_hash, embedder_id.to_string()), Arc::clone(&vector));
        vector
    }

    pub fn len(&self) -> usize { self.lock().len() }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    // a panic while holding the lock cannot leave a half-written entry
    fn lock(&self) -> MutexGuard<'_, HashMap<Key, Arc<Vec<f32>>>> {
        self.entries.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
