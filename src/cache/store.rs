//! Bounded LRU store of cached resource payloads.

use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Cached payloads are trusted for 5 minutes.
pub const DEFAULT_TTL_MS: i64 = 300_000;

/// One cached payload with the time it was fetched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedResource {
    pub resource_id: String,
    pub payload: serde_json::Value,
    pub fetched_at: DateTime<Utc>,
}

impl CachedResource {
    pub fn new(resource_id: &str, payload: serde_json::Value) -> Self {
        Self {
            resource_id: resource_id.to_string(),
            payload,
            fetched_at: Utc::now(),
        }
    }

    pub fn age_ms(&self, now: DateTime<Utc>) -> i64 {
        (now - self.fetched_at).num_milliseconds()
    }

    /// A payload is fresh strictly under the TTL; an entry aged exactly
    /// `ttl_ms` is already stale.
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl_ms: i64) -> bool {
        self.age_ms(now) < ttl_ms
    }
}

/// Bounded LRU cache keyed by resource id, optionally persisted to disk
/// as one JSON file per entry. Constructed once and injected wherever
/// data is loaded; writers race last-write-wins by design.
pub struct ResourceCache {
    capacity: usize,
    ttl_ms: i64,
    entries: HashMap<String, CachedResource>,
    // Front is least recently used
    recency: VecDeque<String>,
    disk_dir: Option<PathBuf>,
}

impl ResourceCache {
    pub fn new(capacity: usize, ttl_ms: i64) -> Self {
        Self {
            capacity: capacity.max(1),
            ttl_ms,
            entries: HashMap::new(),
            recency: VecDeque::new(),
            disk_dir: None,
        }
    }

    /// Cache that also persists entries under `disk_dir`, so payloads
    /// survive restarts and serve as the offline fallback.
    pub fn with_disk(capacity: usize, ttl_ms: i64, disk_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&disk_dir)
            .with_context(|| format!("Failed to create cache directory {}", disk_dir.display()))?;
        let mut cache = Self::new(capacity, ttl_ms);
        cache.disk_dir = Some(disk_dir);
        Ok(cache)
    }

    pub fn ttl_ms(&self) -> i64 {
        self.ttl_ms
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an entry, promoting it to most recently used. Falls back
    /// to the on-disk copy when the entry is not in memory.
    pub fn get(&mut self, key: &str) -> Option<&CachedResource> {
        if self.entries.contains_key(key) {
            self.touch(key);
            return self.entries.get(key);
        }

        let entry = self.load_from_disk(key)?;
        self.insert(entry);
        self.entries.get(key)
    }

    /// Store a payload under `key`, evicting the least recently used
    /// entry once over capacity.
    pub fn put(&mut self, key: &str, payload: serde_json::Value) {
        let entry = CachedResource::new(key, payload);
        if let Err(e) = self.persist(&entry) {
            // A failed disk write only costs offline fallback
            warn!(key = key, error = %e, "Failed to persist cache entry");
        }
        self.insert(entry);
    }

    pub fn remove(&mut self, key: &str) {
        self.entries.remove(key);
        if let Some(pos) = self.recency.iter().position(|k| k == key) {
            self.recency.remove(pos);
        }
        self.remove_disk_file(key);
    }

    /// True when the cached entry for `key` exists and is under the TTL.
    pub fn is_fresh(&mut self, key: &str) -> bool {
        let now = Utc::now();
        let ttl_ms = self.ttl_ms;
        self.get(key).map(|e| e.is_fresh(now, ttl_ms)).unwrap_or(false)
    }

    fn insert(&mut self, entry: CachedResource) {
        let key = entry.resource_id.clone();
        self.entries.insert(key.clone(), entry);
        self.touch(&key);
        while self.entries.len() > self.capacity {
            let Some(oldest) = self.recency.pop_front() else {
                break;
            };
            self.entries.remove(&oldest);
            self.remove_disk_file(&oldest);
            debug!(key = %oldest, "Evicted least recently used cache entry");
        }
    }

    fn touch(&mut self, key: &str) {
        if let Some(pos) = self.recency.iter().position(|k| k == key) {
            self.recency.remove(pos);
        }
        self.recency.push_back(key.to_string());
    }

    fn cache_path(&self, key: &str) -> Option<PathBuf> {
        let dir = self.disk_dir.as_ref()?;
        Some(dir.join(format!("{}.json", sanitize_key(key))))
    }

    fn load_from_disk(&self, key: &str) -> Option<CachedResource> {
        let path = self.cache_path(key)?;
        if !path.exists() {
            return None;
        }
        let contents = std::fs::read_to_string(&path).ok()?;
        match serde_json::from_str::<CachedResource>(&contents) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(key = key, error = %e, "Discarding unreadable cache file");
                None
            }
        }
    }

    fn persist(&self, entry: &CachedResource) -> Result<()> {
        let Some(path) = self.cache_path(&entry.resource_id) else {
            return Ok(());
        };
        let contents = serde_json::to_string_pretty(entry)?;
        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write cache file {}", path.display()))?;
        Ok(())
    }

    fn remove_disk_file(&self, key: &str) {
        if let Some(path) = self.cache_path(key) {
            match std::fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => warn!(key = key, error = %e, "Failed to remove cache file"),
            }
        }
    }
}

/// Keep cache file names flat and filesystem-safe. Every byte outside
/// [A-Za-z0-9-] is hex-escaped ('_' included), so distinct keys can
/// never collide on the same file.
fn sanitize_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for byte in key.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' => out.push(byte as char),
            _ => out.push_str(&format!("_{:02X}", byte)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    #[test]
    fn test_freshness_boundary_is_strict() {
        let mut entry = CachedResource::new("programs_12", json!([1, 2, 3]));
        let now = Utc::now();

        entry.fetched_at = now - Duration::milliseconds(299_999);
        assert!(entry.is_fresh(now, DEFAULT_TTL_MS));

        // Exactly at the TTL counts as stale
        entry.fetched_at = now - Duration::milliseconds(300_000);
        assert!(!entry.is_fresh(now, DEFAULT_TTL_MS));

        entry.fetched_at = now - Duration::milliseconds(300_001);
        assert!(!entry.is_fresh(now, DEFAULT_TTL_MS));
    }

    #[test]
    fn test_put_get_roundtrip() {
        let mut cache = ResourceCache::new(4, DEFAULT_TTL_MS);
        cache.put("gyms", json!([{"id": 1}]));

        let entry = cache.get("gyms").expect("entry should exist");
        assert_eq!(entry.payload, json!([{"id": 1}]));
        assert!(cache.is_fresh("gyms"));
    }

    #[test]
    fn test_capacity_evicts_least_recently_used() {
        let mut cache = ResourceCache::new(2, DEFAULT_TTL_MS);
        cache.put("a", json!(1));
        cache.put("b", json!(2));

        // Touch "a" so "b" becomes the eviction candidate
        cache.get("a");
        cache.put("c", json!(3));

        assert_eq!(cache.len(), 2);
        assert!(cache.get("a").is_some());
        assert!(cache.get("b").is_none());
        assert!(cache.get("c").is_some());
    }

    #[test]
    fn test_overwrite_same_key_keeps_one_entry() {
        let mut cache = ResourceCache::new(2, DEFAULT_TTL_MS);
        cache.put("gyms", json!(1));
        cache.put("gyms", json!(2));

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("gyms").unwrap().payload, json!(2));
    }

    #[test]
    fn test_disk_persistence_survives_new_instance() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().to_path_buf();

        {
            let mut cache = ResourceCache::with_disk(4, DEFAULT_TTL_MS, path.clone()).unwrap();
            cache.put("programs_12", json!({"title": "Strength Basics"}));
        }

        let mut reopened = ResourceCache::with_disk(4, DEFAULT_TTL_MS, path).unwrap();
        let entry = reopened.get("programs_12").expect("entry should load from disk");
        assert_eq!(entry.payload["title"], "Strength Basics");
    }

    #[test]
    fn test_eviction_removes_disk_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache =
            ResourceCache::with_disk(1, DEFAULT_TTL_MS, dir.path().to_path_buf()).unwrap();

        cache.put("old", json!(1));
        cache.put("new", json!(2));

        assert!(!dir.path().join("old.json").exists());
        assert!(dir.path().join("new.json").exists());
    }

    #[test]
    fn test_sanitize_key() {
        assert_eq!(sanitize_key("programs-12"), "programs-12");
        assert_eq!(sanitize_key("programs_12"), "programs_5F12");
        assert_eq!(sanitize_key("courses/coach/7"), "courses_2Fcoach_2F7");
    }

    #[test]
    fn test_sanitized_keys_never_collide() {
        // Lossy replacement would map both of these to the same file
        assert_ne!(sanitize_key("courses/coach/7"), sanitize_key("courses_coach_7"));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().to_path_buf();
        {
            let mut cache = ResourceCache::with_disk(4, DEFAULT_TTL_MS, path.clone()).unwrap();
            cache.put("courses/coach/7", json!(1));
            cache.put("courses_coach_7", json!(2));
        }

        let mut reopened = ResourceCache::with_disk(4, DEFAULT_TTL_MS, path).unwrap();
        assert_eq!(reopened.get("courses/coach/7").unwrap().payload, json!(1));
        assert_eq!(reopened.get("courses_coach_7").unwrap().payload, json!(2));
    }
}
