//! Caching: on-disk artifact paths (keyed by a hash of the video
//! reference) and a bounded in-memory transcript cache.

use std::{
    collections::{HashMap, VecDeque},
    hash::{DefaultHasher, Hash, Hasher},
    path::{Path, PathBuf},
};

/// Get the cache directory for a given video reference
pub fn get_cache_dir(key: &str) -> PathBuf {
    let mut hasher = DefaultHasher::new();
    key.hash(&mut hasher);
    let key_hash = hasher.finish();
    get_root_cache_dir().join(key_hash.to_string())
}

pub fn get_root_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join("smartlearn")
}

pub fn get_model_dir() -> PathBuf {
    get_root_cache_dir().join("models")
}

/// Scratch space for resolver temp files, cleaned after each run.
pub fn get_scratch_root() -> PathBuf {
    get_root_cache_dir().join("scratch")
}

pub fn get_transcript_path(cache_dir: &Path) -> PathBuf {
    cache_dir.join("transcript.txt")
}

/// Bounded in-memory transcript cache with least-recently-used
/// eviction. Wrapped in a lock by the resolver; not internally
/// synchronized.
pub struct TranscriptCache {
    capacity: usize,
    entries: HashMap<String, String>,
    order: VecDeque<String>,
}

impl TranscriptCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    pub fn get(&mut self, key: &str) -> Option<String> {
        let value = self.entries.get(key)?.clone();
        self.touch(key);
        Some(value)
    }

    pub fn insert(&mut self, key: &str, value: String) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.insert(key.to_string(), value).is_some() {
            self.touch(key);
        } else {
            self.order.push_back(key.to_string());
        }
        while self.entries.len() > self.capacity {
            if let Some(evicted) = self.order.pop_front() {
                self.entries.remove(&evicted);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn touch(&mut self, key: &str) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            self.order.remove(pos);
        }
        self.order.push_back(key.to_string());
    }
}
