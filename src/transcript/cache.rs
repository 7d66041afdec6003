//! In-process cache for raw caption cues.
//!
//! Only raw cues are cached; filters and segmentation are always re-applied.
//! The cache is owned by its fetcher rather than being process-global so
//! tests get isolated instances and the TTL stays configurable.

use crate::transcript::Cue;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Default time-to-live for cached cues.
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

struct CacheEntry {
    cues: Vec<Cue>,
    inserted_at: Instant,
}

/// TTL-bounded map from `(video_id, requested language)` to raw cues.
///
/// No eviction beyond TTL expiry; entries are checked for staleness at read
/// time. Growth is bounded only by process lifetime.
pub struct TranscriptCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl TranscriptCache {
    /// Create a cache with the given TTL.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Cache key for a video and a requested language.
    ///
    /// Keyed by what was *asked for*, not what succeeded; the fetcher also
    /// stores successful results under the succeeded language's key.
    pub fn key(video_id: &str, language: Option<&str>) -> String {
        format!("{}:{}", video_id, language.unwrap_or("default"))
    }

    /// Look up cues for a video under the requested language key.
    pub fn get(&self, video_id: &str, language: Option<&str>) -> Option<Vec<Cue>> {
        let key = Self::key(video_id, language);
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        match entries.get(&key) {
            Some(entry) if entry.inserted_at.elapsed() < self.ttl => Some(entry.cues.clone()),
            Some(_) => {
                entries.remove(&key);
                None
            }
            None => None,
        }
    }

    /// Store cues under both the requested key and the key of the language
    /// that actually succeeded, so either lookup hits later.
    pub fn put(
        &self,
        video_id: &str,
        requested: Option<&str>,
        succeeded: &str,
        cues: &[Cue],
    ) {
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        let now = Instant::now();
        entries.insert(
            Self::key(video_id, requested),
            CacheEntry {
                cues: cues.to_vec(),
                inserted_at: now,
            },
        );
        let succeeded_key = Self::key(video_id, Some(succeeded));
        entries.entry(succeeded_key).or_insert(CacheEntry {
            cues: cues.to_vec(),
            inserted_at: now,
        });
    }

    /// Number of live (possibly stale) entries.
    pub fn len(&self) -> usize {
        self.entries.lock().expect("cache lock poisoned").len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for TranscriptCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cues() -> Vec<Cue> {
        vec![Cue::new("hello", 0, 2000)]
    }

    #[test]
    fn test_miss_then_hit() {
        let cache = TranscriptCache::default();
        assert!(cache.get("vid", None).is_none());

        cache.put("vid", None, "en", &cues());
        assert_eq!(cache.get("vid", None).unwrap(), cues());
    }

    #[test]
    fn test_dual_key_population() {
        let cache = TranscriptCache::default();
        // Requested ko, succeeded with en via fallback.
        cache.put("vid", Some("ko"), "en", &cues());

        assert!(cache.get("vid", Some("ko")).is_some());
        assert!(cache.get("vid", Some("en")).is_some());
        assert!(cache.get("vid", None).is_none());
    }

    #[test]
    fn test_expiry_at_read_time() {
        let cache = TranscriptCache::new(Duration::from_millis(0));
        cache.put("vid", None, "en", &cues());
        assert_eq!(cache.len(), 2);

        std::thread::sleep(Duration::from_millis(5));
        // Each read drops only its own stale key; the succeeded-language
        // entry stays until it is read in turn.
        assert!(cache.get("vid", None).is_none());
        assert_eq!(cache.len(), 1);
        assert!(cache.get("vid", Some("en")).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_keys_isolated_per_video() {
        let cache = TranscriptCache::default();
        cache.put("a", None, "en", &cues());
        assert!(cache.get("b", None).is_none());
        assert_eq!(TranscriptCache::key("a", None), "a:default");
        assert_eq!(TranscriptCache::key("a", Some("ko")), "a:ko");
    }
}
