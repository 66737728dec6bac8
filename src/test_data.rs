use std::collections::HashMap;

use anyhow::{anyhow, Result};

use crate::wordpress::raw_post::RawPost;
use crate::wordpress::PostSource;

/// In-memory upstream: posts per category id, failing ids, posts by slug
#[derive(Default)]
pub struct StubSource {
    pub by_category: HashMap<u64, Vec<RawPost>>,
    pub failing: Vec<u64>,
    pub by_slug: HashMap<String, Vec<RawPost>>,
    pub slug_fails: bool,
}

impl PostSource for StubSource {
    async fn posts_in_category(&self, category_id: u64, per_page: u32) -> Result<Vec<RawPost>> {
        if self.failing.contains(&category_id) {
            return Err(anyhow!("503 Service Unavailable"));
        }
        let posts = self.by_category.get(&category_id).cloned().unwrap_or_default();
        Ok(posts.into_iter().take(per_page as usize).collect())
    }

    async fn posts_by_slug(&self, slug: &str) -> Result<Vec<RawPost>> {
        if self.slug_fails {
            return Err(anyhow!("connection refused"));
        }
        Ok(self.by_slug.get(slug).cloned().unwrap_or_default())
    }
}

pub const WP_POSTS_JSON: &str = r##"[
  {
    "id": 101,
    "slug": "mina-veladero",
    "date": "2024-05-01T10:20:30",
    "title": { "rendered": "Veladero &#8211; nueva etapa" },
    "content": { "rendered": "<p>La mina&nbsp;&nbsp;retoma la producción.</p>\n<p><img src=\"http://example.files.wordpress.com/interior.jpg\" /></p>\n<p>Fuente: Diario de Cuyo<br></p>" },
    "excerpt": { "rendered": "<p>La mina retoma la producción &amp; suma empleo.</p>\n" },
    "featured_media": 55,
    "categories": [67720],
    "_embedded": {
      "wp:featuredmedia": [ { "source_url": "http://example.files.wordpress.com/veladero.jpg" } ]
    }
  },
  {
    "id": 102,
    "slug": "paritarias-aoma",
    "date": "2024-04-28T08:00:00",
    "title": { "rendered": "Paritarias: &#8220;acuerdo&#8221; en AOMA" },
    "content": { "rendered": "<p>El gremio <b>firmó</b> el acuerdo.</p><img class=\"wp-image\" src=\"http://cdn.example.com/aoma.jpg\"><p>fuente:   Prensa AOMA </p>" },
    "excerpt": { "rendered": "" },
    "featured_media": 0,
    "categories": [3865306],
    "_embedded": {
      "wp:featuredmedia": [ { "source_url": "https://example.files.wordpress.com/ignored.jpg" } ]
    }
  },
  {
    "id": 103,
    "slug": "",
    "date": "2024-04-30T12:00:00",
    "title": { "rendered": "Sin imagen" },
    "content": { "rendered": "<p>Hola</p>" },
    "excerpt": { "rendered": "" },
    "featured_media": 0,
    "categories": [170094]
  }
]"##;
