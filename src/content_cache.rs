use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Duration, Utc};

/// Thread-safe keyed cache with per-entry expiration.
/// A non-caching instance accepts values but never returns them.
pub struct ContentCache<T> {
    cache: Option<RwLock<CacheMap<T>>>,
}

type CacheMap<T> = HashMap<String, CacheValue<T>>;

struct CacheValue<T> {
    expire_date: DateTime<Utc>,
    value: Arc<T>,
}

impl<T> ContentCache<T> {
    pub fn new() -> Self {
        ContentCache {
            cache: Some(RwLock::new(HashMap::new())),
        }
    }

    pub fn non_caching() -> Self {
        ContentCache {
            cache: None,
        }
    }

    pub fn add(&self, key: &str, content: T, ttl: Duration) -> Arc<T> {
        let value = Arc::new(content);
        let Some(ref cache) = self.cache else {
            return value;
        };

        // A poisoned lock only means a writer panicked; the map is still usable
        let mut map = cache.write().unwrap_or_else(|e| e.into_inner());
        // Expired entries are dropped on write so the map stays bounded by live keys
        let now = Utc::now();
        map.retain(|_, v| v.expire_date >= now);
        map.insert(key.to_string(), CacheValue {
            expire_date: now + ttl,
            value: value.clone(),
        });
        value
    }

    pub fn get(&self, key: &str) -> Option<Arc<T>> {
        let cache = self.cache.as_ref()?;
        let map = cache.read().unwrap_or_else(|e| e.into_inner());
        let cache_value = map.get(key)?;
        if Utc::now() > cache_value.expire_date {
            return None;
        }
        Some(cache_value.value.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::sync::Arc;

    #[test]
    fn test_add_and_get() {
        let cache = ContentCache::new();
        let content = "Hello, world!".to_string();

        let cached_content = cache.add("category-1", content.clone(), Duration::minutes(5));
        assert_eq!(Arc::strong_count(&cached_content), 2);

        let retrieved_content = cache.get("category-1").unwrap();
        assert_eq!(retrieved_content.as_ref(), &content);
    }

    #[test]
    fn test_add_and_get_expires_after() {
        let cache = ContentCache::new();
        let content = "Hello, world!".to_string();

        let cached_content = cache.add("slug-x", content.clone(), Duration::milliseconds(100));

        // Retrieve immediately, should not expire yet
        let retrieved_content = cache.get("slug-x").unwrap();
        assert_eq!(cached_content.as_ref(), &content);
        assert_eq!(retrieved_content.as_ref(), &content);

        std::thread::sleep(std::time::Duration::from_millis(200));
        assert!(cache.get("slug-x").is_none());
    }

    #[test]
    fn test_expired_entries_dropped_on_write() {
        let cache = ContentCache::new();
        let expired = cache.add("old", 1, Duration::milliseconds(-1));
        assert_eq!(Arc::strong_count(&expired), 2);

        cache.add("new", 2, Duration::minutes(5));
        assert_eq!(Arc::strong_count(&expired), 1);
        assert_eq!(cache.get("new").map(|v| *v), Some(2));
    }

    #[test]
    fn test_get_nonexistent_key() {
        let cache: ContentCache<String> = ContentCache::new();
        assert!(cache.get("nonexistent-key").is_none());
    }

    #[test]
    fn test_non_caching_behavior() {
        let cache: ContentCache<String> = ContentCache::non_caching();
        let content = "Non-cached content".to_string();

        let cached_content = cache.add("non-cached", content.clone(), Duration::minutes(5));
        assert_eq!(Arc::strong_count(&cached_content), 1);

        assert!(cache.get("non-cached").is_none());
    }
}
