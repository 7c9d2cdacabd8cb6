use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);
    };
}

id_newtype!(ItemId);

/// Sentinel category meaning "no category filter".
pub const ALL_CATEGORIES: &str = "all";
pub const DEFAULT_PAGE_SIZE: u32 = 12;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub title: String,
    pub category: String,
    pub price: f64,
    pub rating: f64,
}

/// One page of the remote listing. `items.len() <= limit` always holds.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub items: Vec<Item>,
    pub total: u64,
    pub offset: u64,
    pub limit: u32,
}

impl Page {
    pub fn total_pages(&self) -> u32 {
        total_pages(self.total, self.limit)
    }
}

pub fn total_pages(total: u64, limit: u32) -> u32 {
    let limit = u64::from(limit.max(1));
    let pages = total.div_ceil(limit).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Cache key: one cached [`Page`] per `(page, limit)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageKey {
    pub page: u32,
    pub limit: u32,
}

impl PageKey {
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: if limit == 0 { DEFAULT_PAGE_SIZE } else { limit },
        }
    }

    pub fn skip(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    #[default]
    Title,
    Price,
    Rating,
}

impl SortBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::Title => "title",
            SortBy::Price => "price",
            SortBy::Rating => "rating",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "title" => Some(SortBy::Title),
            "price" => Some(SortBy::Price),
            "rating" => Some(SortBy::Rating),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

impl SortDir {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDir::Asc => "asc",
            SortDir::Desc => "desc",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "asc" => Some(SortDir::Asc),
            "desc" => Some(SortDir::Desc),
            _ => None,
        }
    }
}

/// The UI state that round-trips through the location query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewConfig {
    pub query: String,
    pub category: String,
    pub sort_by: SortBy,
    pub sort_dir: SortDir,
    pub selected_id: Option<ItemId>,
    pub page: u32,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            query: String::new(),
            category: ALL_CATEGORIES.to_string(),
            sort_by: SortBy::Title,
            sort_dir: SortDir::Asc,
            selected_id: None,
            page: 1,
        }
    }
}

impl ViewConfig {
    pub fn filters_all_categories(&self) -> bool {
        self.category == ALL_CATEGORIES
    }

    /// True when any input of the filter/sort pipeline differs. Page and
    /// selection are deliberately not compared.
    pub fn pipeline_inputs_differ(&self, other: &ViewConfig) -> bool {
        self.query != other.query
            || self.category != other.category
            || self.sort_by != other.sort_by
            || self.sort_dir != other.sort_dir
    }
}
