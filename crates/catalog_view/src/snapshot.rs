use shared::{
    domain::{Item, ViewConfig},
    error::FetchError,
};

/// Everything the rendering side needs for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewSnapshot {
    pub config: ViewConfig,
    /// Filtered and sorted items of the active (or placeholder) page.
    pub items: Vec<Item>,
    pub categories: Vec<String>,
    pub total: u64,
    pub page: u32,
    pub total_pages: u32,
    pub has_prev: bool,
    pub has_next: bool,
    pub loading: bool,
    pub fetching: bool,
    pub is_placeholder: bool,
    pub error: Option<FetchError>,
    /// Failure notice instead of the item grid: an error with nothing to show.
    pub show_error: bool,
    pub selected_item: Option<Item>,
    /// Current query string of the location, without the leading `?`.
    pub location: String,
}

impl ViewSnapshot {
    /// Background activity over data that is already on screen.
    pub fn is_updating(&self) -> bool {
        self.fetching && !self.loading
    }
}
