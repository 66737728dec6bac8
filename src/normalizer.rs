use chrono::NaiveDateTime;

use crate::category::CategoryKey;
use crate::config::Site;
use crate::text_utils::{clean_text, extract_source, first_image_src, force_https, strip_tags, take_chars, ELLIPSIS, EXCERPT_MAX_CHARS};
use crate::util::spanish_date::{format_post_date, parse_date_time};
use crate::wordpress::raw_post::RawPost;

const UNTITLED: &str = "Sin título";

/// Display-ready post. Recomputed from the upstream record on every request.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedPost {
    /// Slug, or the numeric id when the slug is missing
    pub id: String,
    pub title: String,
    pub subtitle: String,
    /// Never empty
    pub image: String,
    pub category_key: CategoryKey,
    pub category_color: &'static str,
    pub content: String,
    pub source: String,
    pub date: String,
    pub original_date: String,
    pub published: Option<NaiveDateTime>,
}

/// Turns upstream records into [`NormalizedPost`]s. Holds only the site
/// fallbacks, so the same instance serves every request.
#[derive(Debug, Clone)]
pub struct Normalizer {
    default_image: String,
    default_source: String,
}

impl Normalizer {
    pub fn new(default_image: &str, default_source: &str) -> Self {
        let default_image = if default_image.is_empty() { "/logo.png" } else { default_image };
        Normalizer {
            default_image: default_image.to_string(),
            default_source: default_source.to_string(),
        }
    }

    pub fn from_site(site: &Site) -> Self {
        Self::new(&site.default_image, &site.default_source)
    }

    pub fn default_image(&self) -> &str {
        &self.default_image
    }

    pub fn normalize(&self, raw: &RawPost, category_key: CategoryKey) -> NormalizedPost {
        let content = clean_text(raw.content().unwrap_or(""));
        let title = clean_text(raw.title().filter(|t| !t.is_empty()).unwrap_or(UNTITLED));

        let id = match (raw.slug(), raw.id) {
            (Some(slug), _) => slug.to_string(),
            (None, Some(id)) => id.to_string(),
            (None, None) => String::new(),
        };

        let original_date = raw.date.clone().unwrap_or_default();
        let published = parse_date_time(&original_date).ok();
        let date = published.as_ref().map(format_post_date).unwrap_or_default();

        NormalizedPost {
            id,
            title,
            subtitle: derive_excerpt(raw.excerpt().unwrap_or(""), &content),
            image: self.resolve_image(raw, &content),
            category_key,
            category_color: category_key.color(),
            source: extract_source(&content).unwrap_or_else(|| self.default_source.clone()),
            content,
            date,
            original_date,
            published,
        }
    }

    /// Same order as the input, nothing dropped
    pub fn normalize_all(&self, raws: &[RawPost], category_key: CategoryKey) -> Vec<NormalizedPost> {
        raws.iter().map(|raw| self.normalize(raw, category_key)).collect()
    }

    fn resolve_image(&self, raw: &RawPost, cleaned_content: &str) -> String {
        let candidate = raw.featured_source_url()
            .or_else(|| first_image_src(cleaned_content));
        force_https(candidate, &self.default_image)
    }
}

/// Excerpt text capped at 150 chars plus ellipsis. With no excerpt, the
/// first 150 chars of the content are used and the ellipsis is always added,
/// even to short content.
fn derive_excerpt(raw_excerpt: &str, cleaned_content: &str) -> String {
    let excerpt = clean_text(strip_tags(raw_excerpt).trim());

    if excerpt.chars().count() > EXCERPT_MAX_CHARS {
        format!("{}{}", take_chars(&excerpt, EXCERPT_MAX_CHARS), ELLIPSIS)
    } else if excerpt.is_empty() && !cleaned_content.is_empty() {
        let text = strip_tags(cleaned_content);
        format!("{}{}", take_chars(text.trim(), EXCERPT_MAX_CHARS), ELLIPSIS)
    } else {
        excerpt
    }
}
