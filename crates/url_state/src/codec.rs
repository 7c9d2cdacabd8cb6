use shared::domain::{ItemId, SortBy, SortDir, ViewConfig, ALL_CATEGORIES};
use url::form_urlencoded;

pub const PARAM_QUERY: &str = "q";
pub const PARAM_CATEGORY: &str = "category";
pub const PARAM_SORT_BY: &str = "sortBy";
pub const PARAM_SORT_DIR: &str = "dir";
pub const PARAM_PAGE: &str = "page";
pub const PARAM_SELECTED: &str = "selected";

/// Fields recovered from a query string. `None` means "keep the default".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewConfigPatch {
    pub query: Option<String>,
    pub category: Option<String>,
    pub sort_by: Option<SortBy>,
    pub sort_dir: Option<SortDir>,
    pub selected_id: Option<ItemId>,
    pub page: Option<u32>,
}

impl ViewConfigPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply_to(self, config: &mut ViewConfig) {
        if let Some(query) = self.query {
            config.query = query;
        }
        if let Some(category) = self.category {
            config.category = category;
        }
        if let Some(sort_by) = self.sort_by {
            config.sort_by = sort_by;
        }
        if let Some(sort_dir) = self.sort_dir {
            config.sort_dir = sort_dir;
        }
        if let Some(selected_id) = self.selected_id {
            config.selected_id = Some(selected_id);
        }
        if let Some(page) = self.page {
            config.page = page;
        }
    }

    pub fn into_config(self) -> ViewConfig {
        let mut config = ViewConfig::default();
        self.apply_to(&mut config);
        config
    }
}

/// Decodes a location query string (with or without the leading `?`).
///
/// Never fails: unknown parameters are skipped and malformed values leave
/// their field at the default. When a parameter repeats, the first
/// occurrence wins.
pub fn decode(query_string: &str) -> ViewConfigPatch {
    let raw = query_string.strip_prefix('?').unwrap_or(query_string);
    let mut patch = ViewConfigPatch::default();
    let mut seen: Vec<String> = Vec::new();

    for (name, value) in form_urlencoded::parse(raw.as_bytes()) {
        if seen.iter().any(|s| *s == name) {
            continue;
        }
        seen.push(name.to_string());

        let accepted = match &*name {
            PARAM_QUERY if !value.is_empty() => {
                patch.query = Some(value.to_string());
                true
            }
            PARAM_CATEGORY if !value.is_empty() => {
                patch.category = Some(value.to_string());
                true
            }
            PARAM_SORT_BY => {
                patch.sort_by = SortBy::parse(&value);
                patch.sort_by.is_some()
            }
            PARAM_SORT_DIR => {
                patch.sort_dir = SortDir::parse(&value);
                patch.sort_dir.is_some()
            }
            PARAM_SELECTED => {
                patch.selected_id = value.trim().parse::<i64>().ok().map(ItemId);
                patch.selected_id.is_some()
            }
            PARAM_PAGE => {
                patch.page = value.trim().parse::<u32>().ok().filter(|page| *page >= 1);
                patch.page.is_some()
            }
            _ => true,
        };

        if !accepted {
            tracing::debug!(param = %name, value = %value, "ignoring malformed location parameter");
        }
    }

    patch
}

/// Encodes `config` as a query string without the leading `?`, in the
/// stable order q, category, sortBy, dir, page, selected.
pub fn encode(config: &ViewConfig) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());

    if !config.query.is_empty() {
        serializer.append_pair(PARAM_QUERY, &config.query);
    }
    if !config.category.is_empty() && config.category != ALL_CATEGORIES {
        serializer.append_pair(PARAM_CATEGORY, &config.category);
    }
    serializer.append_pair(PARAM_SORT_BY, config.sort_by.as_str());
    serializer.append_pair(PARAM_SORT_DIR, config.sort_dir.as_str());
    serializer.append_pair(PARAM_PAGE, &config.page.to_string());
    if let Some(selected) = config.selected_id {
        serializer.append_pair(PARAM_SELECTED, &selected.0.to_string());
    }

    serializer.finish()
}

#[cfg(test)]
#[path = "tests/codec_tests.rs"]
mod tests;
