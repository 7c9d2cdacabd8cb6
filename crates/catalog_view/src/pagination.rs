use shared::domain::total_pages;

/// Prev/Next bounds for the active page. Both directions clamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub total_pages: u32,
}

impl Pagination {
    pub fn new(page: u32, total: u64, limit: u32) -> Self {
        Self {
            page: page.max(1),
            total_pages: total_pages(total, limit),
        }
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn prev_page(&self) -> u32 {
        self.page.saturating_sub(1).max(1)
    }

    pub fn next_page(&self) -> u32 {
        if self.has_next() {
            self.page + 1
        } else {
            self.page
        }
    }
}
