use std::io;

use ramhorns::Template;

use crate::config::Defaults;
use crate::news::{CategoryListing, HomeFeed};
use crate::paginator::Paginator;
use crate::view::{category_link, parse_template, to_cards, Pagination, PostCard, SidebarCard};

#[derive(ramhorns::Content)]
struct HomePage {
    featured: Vec<PostCard>,
    has_featured: bool,
    latest: Vec<PostCard>,
    has_latest: bool,
    pagination: Pagination,
    sidebar: Vec<SidebarCard>,
}

#[derive(ramhorns::Content)]
struct CategoryPage {
    name: &'static str,
    link: String,
    posts: Vec<PostCard>,
    is_empty: bool,
    pagination: Pagination,
    sidebar: Vec<SidebarCard>,
}

/// Renders the home feed and the section listings
pub struct ListRenderer<'a> {
    template: Template<'a>,
    page_size: usize,
    max_page_links: usize,
}

impl<'a> ListRenderer<'a> {
    pub fn new(list_tpl_src: &'a str, defaults: &Defaults) -> io::Result<ListRenderer<'a>> {
        Ok(ListRenderer {
            template: parse_template(list_tpl_src, "list")?,
            page_size: defaults.page_size,
            max_page_links: defaults.max_page_links,
        })
    }

    /// Featured posts on top, the rest paginated below
    pub fn render_home(&self, feed: &HomeFeed, featured_count: usize, cur_page: usize) -> String {
        let latest = feed.latest(featured_count);
        let paginator = Paginator::from(latest, self.page_size);
        let cur_page = paginator.sanitize(cur_page);
        let latest_page = paginator.get_page(cur_page);

        // Sections with nothing to show are left out of the sidebar
        let sidebar = feed.by_category.iter()
            .filter_map(|c| c.posts.first().map(|latest| SidebarCard::new(c.key, Some(latest))))
            .collect();

        self.template.render(&HomePage {
            featured: to_cards(feed.featured(featured_count)),
            has_featured: !feed.featured(featured_count).is_empty(),
            latest: to_cards(latest_page),
            has_latest: !latest_page.is_empty(),
            pagination: Pagination::new(&paginator, cur_page, self.max_page_links, "/"),
            sidebar,
        })
    }

    pub fn render_category(&self, listing: &CategoryListing, cur_page: usize) -> String {
        let paginator = Paginator::from(&listing.posts, self.page_size);
        let cur_page = paginator.sanitize(cur_page);
        let link = category_link(listing.key);

        let sidebar = listing.sidebar.iter()
            .map(|entry| SidebarCard::new(entry.key, entry.latest.as_ref()))
            .collect();

        self.template.render(&CategoryPage {
            name: listing.key.name(),
            posts: to_cards(paginator.get_page(cur_page)),
            is_empty: listing.posts.is_empty(),
            pagination: Pagination::new(&paginator, cur_page, self.max_page_links, &link),
            link,
            sidebar,
        })
    }
}
