use futures::future::join_all;
use spdlog::{info, warn};

use crate::category::{CategoryKey, CategoryTable};
use crate::config::Defaults;
use crate::normalizer::{NormalizedPost, Normalizer};
use crate::wordpress::raw_post::RawPost;
use crate::wordpress::PostSource;

/// Order in which the sections are merged before sorting the home feed by date
const HOME_MERGE_ORDER: [CategoryKey; 5] = [
    CategoryKey::SanJuan,
    CategoryKey::Nacionales,
    CategoryKey::Internacionales,
    CategoryKey::Sindicales,
    CategoryKey::Opinion,
];

pub struct CategoryPosts {
    pub key: CategoryKey,
    pub posts: Vec<NormalizedPost>,
}

pub struct HomeFeed {
    pub by_category: Vec<CategoryPosts>,
    /// Every post, newest first
    pub all: Vec<NormalizedPost>,
}

impl HomeFeed {
    pub fn featured(&self, count: usize) -> &[NormalizedPost] {
        &self.all[..count.min(self.all.len())]
    }

    pub fn latest(&self, featured_count: usize) -> &[NormalizedPost] {
        &self.all[featured_count.min(self.all.len())..]
    }
}

pub struct SidebarEntry {
    pub key: CategoryKey,
    pub latest: Option<NormalizedPost>,
}

pub struct CategoryListing {
    pub key: CategoryKey,
    pub posts: Vec<NormalizedPost>,
    pub sidebar: Vec<SidebarEntry>,
}

pub struct Article {
    pub post: NormalizedPost,
    pub related: Vec<NormalizedPost>,
}

/// Assembles page data from a [`PostSource`]. Upstream failures never
/// escape: a failed section is empty and a failed lookup is "not found".
pub struct NewsService<S> {
    source: S,
    table: CategoryTable,
    normalizer: Normalizer,
    defaults: Defaults,
}

impl<S: PostSource> NewsService<S> {
    pub fn new(source: S, table: CategoryTable, normalizer: Normalizer, defaults: Defaults) -> Self {
        NewsService {
            source,
            table,
            normalizer,
            defaults,
        }
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    async fn fetch_raw(&self, key: CategoryKey, per_page: u32) -> Vec<RawPost> {
        match self.source.posts_in_category(self.table.id_of(key), per_page).await {
            Ok(posts) => posts,
            Err(e) => {
                warn!("Error fetching {}: {}", key, e);
                vec![]
            }
        }
    }

    pub async fn fetch_category(&self, key: CategoryKey, per_page: u32) -> Vec<NormalizedPost> {
        let raws = self.fetch_raw(key, per_page).await;
        self.normalizer.normalize_all(&raws, key)
    }

    pub async fn load_home(&self) -> HomeFeed {
        let per_page = self.defaults.home_fetch_size;
        let fetched = join_all(CategoryKey::ALL.iter().map(|key| async move {
            CategoryPosts {
                key: *key,
                posts: self.fetch_category(*key, per_page).await,
            }
        })).await;

        let mut all: Vec<NormalizedPost> = HOME_MERGE_ORDER.iter()
            .filter_map(|key| fetched.iter().find(|c| c.key == *key))
            .flat_map(|c| c.posts.iter().cloned())
            .collect();
        // Stable, undated posts last
        all.sort_by(|a, b| b.published.cmp(&a.published));

        info!("Home feed loaded with {} posts", all.len());
        HomeFeed {
            by_category: fetched,
            all,
        }
    }

    pub async fn load_category(&self, key: CategoryKey) -> CategoryListing {
        let others: Vec<CategoryKey> = CategoryKey::ALL.iter().copied().filter(|k| *k != key).collect();
        let sidebar = join_all(others.into_iter().map(|other| async move {
            SidebarEntry {
                key: other,
                latest: self.fetch_category(other, 1).await.into_iter().next(),
            }
        }));

        let (posts, sidebar) = futures::join!(self.fetch_category(key, self.defaults.category_fetch_size), sidebar);
        CategoryListing {
            key,
            posts,
            sidebar,
        }
    }

    async fn find_by_slug(&self, slug: &str) -> Option<RawPost> {
        match self.source.posts_by_slug(slug).await {
            Ok(posts) => posts.into_iter().next(),
            Err(e) => {
                warn!("Error fetching post {}: {}", slug, e);
                None
            }
        }
    }

    async fn related(&self, key: CategoryKey, slug: &str) -> Vec<NormalizedPost> {
        let raws = self.fetch_raw(key, self.defaults.related_fetch_size).await;
        raws.iter()
            .filter(|raw| raw.slug.as_deref() != Some(slug))
            .take(self.defaults.related_count)
            .map(|raw| self.normalizer.normalize(raw, key))
            .collect()
    }

    /// Article `slug` shown under section `key`. `None` means not found.
    pub async fn load_article(&self, key: CategoryKey, slug: &str) -> Option<Article> {
        let raw = self.find_by_slug(slug).await?;
        let post = self.normalizer.normalize(&raw, key);
        let related = self.related(key, slug).await;
        Some(Article { post, related })
    }

    /// Article looked up by slug alone. The section comes from `section` or,
    /// when absent, from the post's own upstream categories.
    pub async fn load_article_by_slug(&self, slug: &str, section: Option<CategoryKey>) -> Option<Article> {
        let raw = self.find_by_slug(slug).await?;
        let Some(key) = resolve_section(&self.table, &raw, section) else {
            warn!("Post {} does not belong to any known section", slug);
            return None;
        };

        let post = self.normalizer.normalize(&raw, key);
        let related = self.related(key, slug).await;
        Some(Article { post, related })
    }
}

pub fn resolve_section(table: &CategoryTable, raw: &RawPost, explicit: Option<CategoryKey>) -> Option<CategoryKey> {
    explicit.or_else(|| table.key_of(raw.upstream_categories()))
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use crate::test_data::{StubSource, WP_POSTS_JSON};
    use crate::wordpress::raw_post::decode_posts;

    use super::*;

    fn post(slug: &str, date: &str) -> RawPost {
        RawPost {
            slug: Some(slug.to_string()),
            date: Some(date.to_string()),
            ..Default::default()
        }
    }

    fn service(source: StubSource) -> NewsService<StubSource> {
        NewsService::new(
            source,
            CategoryTable::default(),
            Normalizer::new("/logo.png", "Fuente: WordPress"),
            Defaults::default(),
        )
    }

    fn table() -> CategoryTable {
        CategoryTable::default()
    }

    fn ids(posts: &[NormalizedPost]) -> Vec<&str> {
        posts.iter().map(|p| p.id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_home_merges_and_sorts_by_date() {
        let t = table();
        let mut source = StubSource::default();
        source.by_category.insert(t.id_of(CategoryKey::Nacionales), vec![
            post("n1", "2024-05-03T10:00:00"),
            post("n2", "2024-04-01T10:00:00"),
        ]);
        source.by_category.insert(t.id_of(CategoryKey::Opinion), vec![
            post("o1", "2024-05-04T10:00:00"),
        ]);
        source.by_category.insert(t.id_of(CategoryKey::SanJuan), vec![
            post("s1", "2024-05-02T10:00:00"),
            post("s-undated", ""),
        ]);

        let home = service(source).load_home().await;
        assert_eq!(ids(&home.all), ["o1", "n1", "s1", "n2", "s-undated"]);
        assert_eq!(ids(home.featured(4)), ["o1", "n1", "s1", "n2"]);
        assert_eq!(ids(home.latest(4)), ["s-undated"]);
        assert_eq!(home.by_category.len(), 5);
        assert_eq!(home.all[0].category_key, CategoryKey::Opinion);
    }

    #[tokio::test]
    async fn test_home_survives_failing_category() {
        let t = table();
        let mut source = StubSource::default();
        source.by_category.insert(t.id_of(CategoryKey::Sindicales), vec![post("g1", "2024-05-03T10:00:00")]);
        source.failing.push(t.id_of(CategoryKey::Nacionales));
        source.failing.push(t.id_of(CategoryKey::Opinion));

        let home = service(source).load_home().await;
        assert_eq!(ids(&home.all), ["g1"]);
        let nacionales = home.by_category.iter().find(|c| c.key == CategoryKey::Nacionales).unwrap();
        assert!(nacionales.posts.is_empty());
    }

    #[tokio::test]
    async fn test_home_with_no_posts() {
        let home = service(StubSource::default()).load_home().await;
        assert!(home.all.is_empty());
        assert!(home.featured(4).is_empty());
        assert!(home.latest(4).is_empty());
    }

    #[tokio::test]
    async fn test_empty_category_renders_zero_items() {
        let listing = service(StubSource::default()).load_category(CategoryKey::Opinion).await;
        assert_eq!(listing.key, CategoryKey::Opinion);
        assert!(listing.posts.is_empty());
        assert_eq!(listing.sidebar.len(), 4);
        assert!(listing.sidebar.iter().all(|s| s.latest.is_none() && s.key != CategoryKey::Opinion));
    }

    #[tokio::test]
    async fn test_category_with_sidebar() {
        let t = table();
        let mut source = StubSource::default();
        source.by_category.insert(t.id_of(CategoryKey::SanJuan), vec![
            post("s1", "2024-05-02T10:00:00"),
            post("s2", "2024-05-01T10:00:00"),
        ]);
        source.by_category.insert(t.id_of(CategoryKey::Nacionales), vec![
            post("n1", "2024-05-03T10:00:00"),
            post("n2", "2024-05-01T10:00:00"),
        ]);
        source.failing.push(t.id_of(CategoryKey::Opinion));

        let listing = service(source).load_category(CategoryKey::SanJuan).await;
        assert_eq!(ids(&listing.posts), ["s1", "s2"]);
        let keys: Vec<CategoryKey> = listing.sidebar.iter().map(|s| s.key).collect();
        assert_eq!(keys, [CategoryKey::Nacionales, CategoryKey::Sindicales, CategoryKey::Opinion, CategoryKey::Internacionales]);
        assert_eq!(listing.sidebar[0].latest.as_ref().map(|p| p.id.as_str()), Some("n1"));
        assert!(listing.sidebar[2].latest.is_none());
    }

    #[tokio::test]
    async fn test_article_not_found() {
        let article = service(StubSource::default()).load_article(CategoryKey::Opinion, "nope").await;
        assert!(article.is_none());

        let source = StubSource { slug_fails: true, ..Default::default() };
        let article = service(source).load_article(CategoryKey::Opinion, "nope").await;
        assert!(article.is_none());
    }

    #[tokio::test]
    async fn test_article_with_related() {
        let t = table();
        let mut source = StubSource::default();
        source.by_slug.insert("o2".to_string(), vec![post("o2", "2024-05-02T10:00:00")]);
        source.by_category.insert(t.id_of(CategoryKey::Opinion), vec![
            post("o1", "2024-05-03T10:00:00"),
            post("o2", "2024-05-02T10:00:00"),
            post("o3", "2024-05-01T10:00:00"),
            post("o4", "2024-04-30T10:00:00"),
            post("o5", "2024-04-29T10:00:00"),
        ]);

        let article = service(source).load_article(CategoryKey::Opinion, "o2").await.unwrap();
        assert_eq!(article.post.id, "o2");
        assert_eq!(article.post.category_key, CategoryKey::Opinion);
        assert_eq!(ids(&article.related), ["o1", "o3", "o4"]);
    }

    #[tokio::test]
    async fn test_article_related_failure_is_not_fatal() {
        let t = table();
        let mut source = StubSource::default();
        source.by_slug.insert("o2".to_string(), vec![post("o2", "2024-05-02T10:00:00")]);
        source.failing.push(t.id_of(CategoryKey::Opinion));

        let article = service(source).load_article(CategoryKey::Opinion, "o2").await.unwrap();
        assert_eq!(article.post.id, "o2");
        assert!(article.related.is_empty());
    }

    #[tokio::test]
    async fn test_article_by_slug_resolves_section() {
        let values: Vec<Value> = serde_json::from_str(WP_POSTS_JSON).unwrap();
        let posts = decode_posts(values);
        let mut source = StubSource::default();
        source.by_slug.insert("mina-veladero".to_string(), vec![posts[0].clone()]);

        let service = service(source);
        let article = service.load_article_by_slug("mina-veladero", None).await.unwrap();
        assert_eq!(article.post.category_key, CategoryKey::SanJuan);
        assert_eq!(article.post.category_color, "bg-red-500");

        let article = service.load_article_by_slug("mina-veladero", Some(CategoryKey::Opinion)).await.unwrap();
        assert_eq!(article.post.category_key, CategoryKey::Opinion);
    }

    #[tokio::test]
    async fn test_article_by_slug_without_known_section() {
        let mut source = StubSource::default();
        source.by_slug.insert("x".to_string(), vec![RawPost {
            slug: Some("x".to_string()),
            categories: Some(vec![1, 2]),
            ..Default::default()
        }]);
        assert!(service(source).load_article_by_slug("x", None).await.is_none());
    }
}
