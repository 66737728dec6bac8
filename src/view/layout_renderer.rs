use std::io;

use chrono::NaiveDate;
use ramhorns::Template;

use crate::category::CategoryKey;
use crate::util::spanish_date::format_banner_date;
use crate::view::{category_link, parse_template};

/// Head metadata of a page
pub struct PageMeta {
    pub title: String,
    pub description: String,
    pub og_type: &'static str,
    pub og_image: String,
    pub url: String,
}

#[derive(ramhorns::Content)]
struct NavItem {
    link: String,
    label: &'static str,
    current: bool,
}

#[derive(ramhorns::Content)]
struct LayoutPage<'a> {
    site_name: &'a str,
    title: &'a str,
    description: &'a str,
    og_type: &'a str,
    og_image: &'a str,
    url: &'a str,
    today: String,
    year: i32,
    nav: Vec<NavItem>,
    body: &'a str,
}

/// Page chrome: head, header with today's date, section navigation, footer.
pub struct LayoutRenderer<'a> {
    template: Template<'a>,
    site_name: &'a str,
}

impl<'a> LayoutRenderer<'a> {
    pub fn new(layout_tpl_src: &'a str, site_name: &'a str) -> io::Result<LayoutRenderer<'a>> {
        Ok(LayoutRenderer {
            template: parse_template(layout_tpl_src, "layout")?,
            site_name,
        })
    }

    pub fn render(&self, meta: &PageMeta, today: NaiveDate, current: Option<CategoryKey>, body: &str) -> String {
        let nav = CategoryKey::ALL.iter()
            .map(|key| NavItem {
                link: category_link(*key),
                label: key.label(),
                current: current == Some(*key),
            })
            .collect();

        self.template.render(&LayoutPage {
            site_name: self.site_name,
            title: &meta.title,
            description: &meta.description,
            og_type: meta.og_type,
            og_image: &meta.og_image,
            url: &meta.url,
            today: format_banner_date(&today),
            year: chrono::Datelike::year(&today),
            nav,
            body,
        })
    }
}
