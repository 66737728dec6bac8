use anyhow::Result;
use chrono::Duration;
use spdlog::debug;

use crate::content_cache::ContentCache;
use crate::wordpress::raw_post::RawPost;
use crate::wordpress::PostSource;

/// Short-lived cache in front of another [`PostSource`]. Only successful
/// answers are stored; failures always reach the inner source again.
pub struct CachedSource<S> {
    inner: S,
    cache: ContentCache<Vec<RawPost>>,
    ttl: Duration,
}

impl<S: PostSource> CachedSource<S> {
    pub fn new(inner: S, ttl: Option<Duration>) -> Self {
        let cache = match ttl {
            Some(ttl) if ttl > Duration::zero() => ContentCache::new(),
            _ => ContentCache::non_caching(),
        };

        CachedSource {
            inner,
            cache,
            ttl: ttl.unwrap_or_else(Duration::zero),
        }
    }

    fn cached(&self, key: &str) -> Option<Vec<RawPost>> {
        let hit = self.cache.get(key)?;
        debug!("Cache hit for {}", key);
        Some(hit.as_ref().clone())
    }

    fn store(&self, key: &str, posts: Vec<RawPost>) -> Vec<RawPost> {
        self.cache.add(key, posts, self.ttl).as_ref().clone()
    }
}

impl<S: PostSource> PostSource for CachedSource<S> {
    async fn posts_in_category(&self, category_id: u64, per_page: u32) -> Result<Vec<RawPost>> {
        let key = format!("category-{}-{}", category_id, per_page);
        if let Some(posts) = self.cached(&key) {
            return Ok(posts);
        }

        let posts = self.inner.posts_in_category(category_id, per_page).await?;
        Ok(self.store(&key, posts))
    }

    async fn posts_by_slug(&self, slug: &str) -> Result<Vec<RawPost>> {
        let key = format!("slug-{}", slug);
        if let Some(posts) = self.cached(&key) {
            return Ok(posts);
        }

        let posts = self.inner.posts_by_slug(slug).await?;
        Ok(self.store(&key, posts))
    }
}
