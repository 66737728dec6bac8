pub struct Paginator<'a, T> {
    items: &'a [T],
    page_size: usize,
    page_count: usize,
}

impl<'a, T> Paginator<'a, T> {
    pub fn from(items: &'a [T], page_size: usize) -> Self {
        let page_size = page_size.max(1);
        let page_count = items.len().div_ceil(page_size);

        Paginator {
            items,
            page_size,
            page_count,
        }
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Pages out of range fall back to the first one
    pub fn sanitize(&self, page: usize) -> usize {
        match page {
            0 => 1,
            x if x > self.page_count => 1,
            x => x,
        }
    }

    /// Slice of the requested page. Out of range pages are empty.
    pub fn get_page(&self, page: usize) -> &'a [T] {
        if page == 0 || page > self.page_count {
            return &[];
        }

        let start = (page - 1) * self.page_size;
        let end = (start + self.page_size).min(self.items.len());
        &self.items[start..end]
    }

    /// Page numbers to link: the first `max_links` pages, and the last page
    /// after an ellipsis when there are more.
    pub fn page_links(&self, max_links: usize) -> (Vec<usize>, Option<usize>) {
        let shown = self.page_count.min(max_links);
        let numbers = (1..=shown).collect();
        let last = if self.page_count > max_links { Some(self.page_count) } else { None };
        (numbers, last)
    }
}
