use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use spdlog::{debug, warn};

/// Field decoder that turns a value of the wrong type into `None`, so a
/// single bad field never costs the whole record.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }

    match serde_json::from_value(value) {
        Ok(field) => Ok(Some(field)),
        Err(e) => {
            debug!("Ignoring post field: {}", e);
            Ok(None)
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct Rendered {
    #[serde(default, deserialize_with = "lenient")]
    pub rendered: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct Media {
    #[serde(default, deserialize_with = "lenient")]
    pub source_url: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct Embedded {
    #[serde(rename = "wp:featuredmedia", default, deserialize_with = "lenient")]
    pub featured_media: Option<Vec<Media>>,
}

/// A post as returned by `/wp/v2/posts`. Every field may be missing or of
/// an unexpected type; such fields decode as `None`.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct RawPost {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<Rendered>,
    #[serde(default, deserialize_with = "lenient")]
    pub content: Option<Rendered>,
    #[serde(default, deserialize_with = "lenient")]
    pub excerpt: Option<Rendered>,
    #[serde(default, deserialize_with = "lenient")]
    pub featured_media: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub categories: Option<Vec<u64>>,
    #[serde(rename = "_embedded", default, deserialize_with = "lenient")]
    pub embedded: Option<Embedded>,
}

fn rendered(field: &Option<Rendered>) -> Option<&str> {
    field.as_ref().and_then(|r| r.rendered.as_deref())
}

impl RawPost {
    pub fn title(&self) -> Option<&str> {
        rendered(&self.title)
    }

    pub fn content(&self) -> Option<&str> {
        rendered(&self.content)
    }

    pub fn excerpt(&self) -> Option<&str> {
        rendered(&self.excerpt)
    }

    pub fn slug(&self) -> Option<&str> {
        self.slug.as_deref().filter(|s| !s.is_empty())
    }

    pub fn upstream_categories(&self) -> &[u64] {
        self.categories.as_deref().unwrap_or(&[])
    }

    /// Embedded featured image url. Only consulted when `featured_media` is set.
    pub fn featured_source_url(&self) -> Option<&str> {
        if self.featured_media.unwrap_or(0) == 0 {
            return None;
        }

        self.embedded.as_ref()
            .and_then(|e| e.featured_media.as_ref())
            .and_then(|media| media.first())
            .and_then(|m| m.source_url.as_deref())
            .filter(|url| !url.is_empty())
    }
}

/// Decodes a post collection one record at a time. Only entries that are not
/// JSON objects at all are logged and skipped.
pub fn decode_posts(values: Vec<Value>) -> Vec<RawPost> {
    values.into_iter()
        .filter_map(|value| match serde_json::from_value::<RawPost>(value) {
            Ok(post) => Some(post),
            Err(e) => {
                warn!("Skipping malformed post record: {}", e);
                None
            }
        })
        .collect()
}
