use std::io;
use std::io::ErrorKind;
use std::path::Path;

use ramhorns::Template;

use crate::category::CategoryKey;
use crate::normalizer::NormalizedPost;
use crate::paginator::Paginator;

pub mod article_renderer;
pub mod layout_renderer;
pub mod list_renderer;

pub fn read_template(tpl_dir: &Path, file_name: &str) -> io::Result<String> {
    let full_path = tpl_dir.join(file_name);
    std::fs::read_to_string(&full_path)
        .map_err(|e| io::Error::new(e.kind(), format!("Error loading template {}: {}", full_path.display(), e)))
}

pub fn parse_template<'a>(src: &'a str, name: &str) -> io::Result<Template<'a>> {
    Template::new(src)
        .map_err(|e| io::Error::new(ErrorKind::InvalidInput, format!("Error parsing {} template: {}", name, e)))
}

pub fn category_link(key: CategoryKey) -> String {
    format!("/noticia/{}", key)
}

pub fn article_link(key: CategoryKey, id: &str) -> String {
    format!("/noticia/{}/{}", key, id)
}

/// One news card, as used by every listing
#[derive(ramhorns::Content)]
pub struct PostCard {
    pub id: String,
    /// False for posts with neither slug nor id, which no route can show
    pub has_link: bool,
    pub link: String,
    pub title: String,
    pub subtitle: String,
    pub image: String,
    pub category_label: &'static str,
    pub category_color: &'static str,
    pub source: String,
    pub date: String,
}

impl From<&NormalizedPost> for PostCard {
    fn from(post: &NormalizedPost) -> Self {
        PostCard {
            id: post.id.clone(),
            has_link: !post.id.is_empty(),
            link: if post.id.is_empty() { String::new() } else { article_link(post.category_key, &post.id) },
            title: post.title.clone(),
            subtitle: post.subtitle.clone(),
            image: post.image.clone(),
            category_label: post.category_key.label(),
            category_color: post.category_color,
            source: post.source.clone(),
            date: post.date.clone(),
        }
    }
}

pub fn to_cards(posts: &[NormalizedPost]) -> Vec<PostCard> {
    posts.iter().map(PostCard::from).collect()
}

#[derive(ramhorns::Content)]
pub struct SidebarCard {
    pub link: String,
    pub name: &'static str,
    pub has_latest: bool,
    pub latest_title: String,
}

impl SidebarCard {
    pub fn new(key: CategoryKey, latest: Option<&NormalizedPost>) -> Self {
        SidebarCard {
            link: category_link(key),
            name: key.name(),
            has_latest: latest.is_some(),
            latest_title: latest.map(|p| p.title.clone()).unwrap_or_default(),
        }
    }
}

#[derive(ramhorns::Content)]
pub struct PageLink {
    pub number: usize,
    pub current: bool,
    pub href: String,
}

#[derive(ramhorns::Content)]
pub struct Pagination {
    pub show: bool,
    pub pages: Vec<PageLink>,
    pub has_last: bool,
    pub last: Vec<PageLink>,
    pub prev_href: String,
    pub next_href: String,
    pub is_first: bool,
    pub is_last: bool,
}

impl Pagination {
    pub fn new<T>(paginator: &Paginator<T>, cur_page: usize, max_links: usize, base_path: &str) -> Self {
        let page_count = paginator.page_count();
        let href = |number: usize| format!("{}?page={}", base_path, number);
        let link = |number: usize| PageLink {
            number,
            current: number == cur_page,
            href: href(number),
        };

        let (numbers, last) = paginator.page_links(max_links);
        Pagination {
            show: page_count > 1,
            pages: numbers.into_iter().map(link).collect(),
            has_last: last.is_some(),
            last: last.into_iter().map(link).collect(),
            prev_href: href(cur_page.saturating_sub(1).max(1)),
            next_href: href((cur_page + 1).min(page_count.max(1))),
            is_first: cur_page <= 1,
            is_last: cur_page >= page_count,
        }
    }
}

#[derive(ramhorns::Content)]
struct MessagePage<'a> {
    title: &'a str,
    message: &'a str,
}

/// Body of the "not found" and "no news" pages
pub fn render_message(message_tpl_src: &str, title: &str, message: &str) -> io::Result<String> {
    let template = parse_template(message_tpl_src, "message")?;
    Ok(template.render(&MessagePage { title, message }))
}
