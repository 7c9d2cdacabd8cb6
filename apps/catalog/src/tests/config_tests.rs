use super::*;

fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| map.get(name).cloned()
}

#[test]
fn defaults_match_the_public_listing() {
    let settings = Settings::default();
    assert_eq!(settings.api_url, "https://dummyjson.com/products");
    assert_eq!(settings.page_size, 12);
    assert_eq!(settings.stale_time, Duration::from_secs(60));
    assert_eq!(settings.listing_mode, ListingMode::Paginated);
    assert_eq!(settings.request_timeout, Duration::from_secs(10));
}

#[test]
fn file_values_override_defaults() {
    let file_cfg: HashMap<String, String> = toml::from_str(
        r#"
api_url = "http://localhost:9000/items"
listing_mode = "items-only"
page_size = "24"
stale_seconds = "5"
gc_seconds = "off"
timeout_seconds = "3"
"#,
    )
    .expect("toml");

    let mut settings = Settings::default();
    apply_file(&mut settings, &file_cfg);
    assert_eq!(settings.api_url, "http://localhost:9000/items");
    assert_eq!(settings.listing_mode, ListingMode::ItemsOnly);
    assert_eq!(settings.page_size, 24);
    assert_eq!(settings.stale_time, Duration::from_secs(5));
    assert_eq!(settings.gc_time, None);
    assert_eq!(settings.request_timeout, Duration::from_secs(3));
}

#[test]
fn env_overrides_and_app_prefix_wins() {
    let mut settings = Settings::default();
    apply_env(
        &mut settings,
        env_of(&[
            ("CATALOG_API_URL", "http://a.invalid"),
            ("APP__API_URL", "http://b.invalid"),
            ("CATALOG_PAGE_SIZE", "30"),
            ("CATALOG_GC_SECONDS", "10"),
            ("CATALOG_TIMEOUT_SECONDS", "2"),
            ("CATALOG_LOG", "debug"),
        ]),
    );
    assert_eq!(settings.api_url, "http://b.invalid");
    assert_eq!(settings.page_size, 30);
    assert_eq!(settings.gc_time, Some(Duration::from_secs(10)));
    assert_eq!(settings.request_timeout, Duration::from_secs(2));
    assert_eq!(settings.log_filter, "debug");
}

#[test]
fn unparseable_values_keep_previous_setting() {
    let mut settings = Settings::default();
    apply_env(
        &mut settings,
        env_of(&[
            ("CATALOG_PAGE_SIZE", "0"),
            ("APP__PAGE_SIZE", "lots"),
            ("CATALOG_STALE_SECONDS", "-1"),
            ("CATALOG_LISTING_MODE", "scroll"),
            ("CATALOG_GC_SECONDS", "soon"),
            ("CATALOG_TIMEOUT_SECONDS", "0"),
        ]),
    );
    assert_eq!(settings, Settings::default());
}
