use std::future::Future;

pub mod cached_source;
pub mod client;
pub mod raw_post;

use crate::wordpress::raw_post::RawPost;

/// Where posts come from. Implemented by the HTTP client, by the caching
/// decorator, and by in-memory stubs in tests.
pub trait PostSource {
    /// Newest first, at most `per_page` posts
    fn posts_in_category(&self, category_id: u64, per_page: u32) -> impl Future<Output = anyhow::Result<Vec<RawPost>>>;

    /// Zero or more posts sharing the slug
    fn posts_by_slug(&self, slug: &str) -> impl Future<Output = anyhow::Result<Vec<RawPost>>>;
}
