use std::io;

use ramhorns::Template;

use crate::category::CategoryKey;
use crate::news::Article;
use crate::view::{parse_template, to_cards, PostCard, SidebarCard};

#[derive(ramhorns::Content)]
struct ArticleView<'a> {
    section_name: &'static str,
    title: &'a str,
    subtitle: &'a str,
    has_subtitle: bool,
    image: &'a str,
    category_label: &'static str,
    category_color: &'static str,
    content: &'a str,
    source: &'a str,
    date: &'a str,
    related: Vec<PostCard>,
    has_related: bool,
    sidebar: Vec<SidebarCard>,
}

pub struct ArticleRenderer<'a> {
    template: Template<'a>,
}

impl<'a> ArticleRenderer<'a> {
    pub fn new(article_tpl_src: &'a str) -> io::Result<ArticleRenderer<'a>> {
        Ok(ArticleRenderer {
            template: parse_template(article_tpl_src, "article")?,
        })
    }

    pub fn render(&self, article: &Article) -> String {
        let post = &article.post;
        let key = post.category_key;

        // Other sections, linked without a preview
        let sidebar = CategoryKey::ALL.iter()
            .filter(|other| **other != key)
            .map(|other| SidebarCard::new(*other, None))
            .collect();

        self.template.render(&ArticleView {
            section_name: key.name(),
            title: &post.title,
            subtitle: &post.subtitle,
            has_subtitle: !post.subtitle.is_empty(),
            image: &post.image,
            category_label: key.label(),
            category_color: post.category_color,
            content: &post.content,
            source: &post.source,
            date: &post.date,
            related: to_cards(&article.related),
            has_related: !article.related.is_empty(),
            sidebar,
        })
    }
}

/// Open Graph image of an article: absolute images go through the image
/// relay of the site, anything else falls back to the default image.
pub fn og_image(site_url: &str, default_image: &str, image: &str) -> String {
    let site_url = site_url.trim_end_matches('/');
    if image.starts_with("http") {
        let query = serde_urlencoded::to_string([("url", image)]).unwrap_or_default();
        format!("{}/api/image?{}", site_url, query)
    } else if default_image.starts_with("http") {
        default_image.to_string()
    } else {
        format!("{}{}", site_url, default_image)
    }
}
