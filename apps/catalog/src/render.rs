use std::fmt::Write as _;

use catalog_view::ViewSnapshot;
use shared::domain::Item;

pub fn render(snapshot: &ViewSnapshot, path: &str) -> String {
    let mut out = String::new();
    let config = &snapshot.config;

    let _ = write!(out, "Page {} / {}", snapshot.page, snapshot.total_pages);
    if snapshot.is_updating() {
        out.push_str("  (updating...)");
    }
    out.push('\n');
    let _ = writeln!(
        out,
        "search: {:?}  category: {}  sort: {} {}",
        config.query,
        config.category,
        config.sort_by.as_str(),
        config.sort_dir.as_str()
    );
    if !snapshot.categories.is_empty() {
        let _ = writeln!(out, "categories: all, {}", snapshot.categories.join(", "));
    }

    if snapshot.show_error {
        out.push_str("Failed to load. Try again (refetch).\n");
    } else if snapshot.loading {
        out.push_str("Loading...\n");
    } else if snapshot.items.is_empty() {
        out.push_str("No matching items on this page.\n");
    } else {
        for item in &snapshot.items {
            let marker = if Some(item.id) == config.selected_id { '>' } else { ' ' };
            let _ = writeln!(
                out,
                "{marker} #{:<4} {:<40} {:<18} ${:>9.2}  * {:.2}",
                item.id.0, item.title, item.category, item.price, item.rating
            );
        }
    }

    if let Some(item) = &snapshot.selected_item {
        out.push_str(&render_details(item));
    }

    let _ = writeln!(out, "location: {path}?{}", snapshot.location);
    out
}

fn render_details(item: &Item) -> String {
    format!(
        "--- {}\n    category: {}\n    price: ${:.2}\n    rating: * {:.2}\n",
        item.title, item.category, item.price, item.rating
    )
}
