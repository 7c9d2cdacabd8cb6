//! Pure filter → sort → select derivation over the cached page.

use std::cmp::Ordering;

use feruca::Collator;
use shared::domain::{Item, ItemId, SortBy, SortDir, ViewConfig, ALL_CATEGORIES};

pub fn matches_filter(item: &Item, query_lower: &str, category: &str) -> bool {
    let matches_category = category == ALL_CATEGORIES || item.category == category;
    matches_category && item.title.to_lowercase().contains(query_lower)
}

pub fn filter_items<'a>(items: &'a [Item], query: &str, category: &str) -> Vec<&'a Item> {
    let query_lower = query.to_lowercase();
    items
        .iter()
        .filter(|item| matches_filter(item, &query_lower, category))
        .collect()
}

/// Orders titles by the Unicode collation algorithm with root locale data:
/// accents and case only break ties, so "apple" < "Apple" < "éclair" < "fig".
pub fn compare_titles(collator: &mut Collator, a: &str, b: &str) -> Ordering {
    collator.collate(a, b)
}

pub fn compare_items(collator: &mut Collator, a: &Item, b: &Item, sort_by: SortBy) -> Ordering {
    match sort_by {
        SortBy::Title => compare_titles(collator, &a.title, &b.title),
        SortBy::Price => a.price.partial_cmp(&b.price).unwrap_or(Ordering::Equal),
        SortBy::Rating => a.rating.partial_cmp(&b.rating).unwrap_or(Ordering::Equal),
    }
}

/// Stable sort: items with equal keys keep their filtered order in both
/// directions.
pub fn sort_items(items: &mut [&Item], sort_by: SortBy, sort_dir: SortDir) {
    let mut collator = Collator::default();
    items.sort_by(|a, b| {
        let ordering = compare_items(&mut collator, a, b, sort_by);
        match sort_dir {
            SortDir::Asc => ordering,
            SortDir::Desc => ordering.reverse(),
        }
    });
}

/// Resolves the selection against the whole active page, not the filtered
/// set, so a selection survives filter and sort changes.
pub fn select_item(items: &[Item], selected_id: Option<ItemId>) -> Option<&Item> {
    let selected_id = selected_id?;
    items.iter().find(|item| item.id == selected_id)
}

/// Distinct categories of the page in first-seen order.
pub fn categories(items: &[Item]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for item in items {
        if !seen.iter().any(|category| *category == item.category) {
            seen.push(item.category.clone());
        }
    }
    seen
}

pub fn visible_items<'a>(items: &'a [Item], config: &ViewConfig) -> Vec<&'a Item> {
    let mut visible = filter_items(items, &config.query, &config.category);
    sort_items(&mut visible, config.sort_by, config.sort_dir);
    visible
}

#[cfg(test)]
#[path = "tests/pipeline_tests.rs"]
mod tests;
