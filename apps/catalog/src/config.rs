use std::{collections::HashMap, fs, path::Path, time::Duration};

use client_core::{
    data_source::{DEFAULT_LISTING_URL, DEFAULT_REQUEST_TIMEOUT},
    CacheSettings, ListingMode,
};
use shared::domain::DEFAULT_PAGE_SIZE;

pub const DEFAULT_SETTINGS_FILE: &str = "catalog.toml";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api_url: String,
    pub listing_mode: ListingMode,
    pub page_size: u32,
    pub stale_time: Duration,
    pub gc_time: Option<Duration>,
    pub request_timeout: Duration,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        let cache = CacheSettings::default();
        Self {
            api_url: DEFAULT_LISTING_URL.into(),
            listing_mode: ListingMode::Paginated,
            page_size: DEFAULT_PAGE_SIZE,
            stale_time: cache.stale_time,
            gc_time: cache.gc_time,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            log_filter: "info".into(),
        }
    }
}

impl Settings {
    pub fn cache_settings(&self) -> CacheSettings {
        CacheSettings {
            stale_time: self.stale_time,
            gc_time: self.gc_time,
        }
    }
}

pub fn load_settings(path: Option<&Path>) -> Settings {
    let mut settings = Settings::default();

    let path = path.unwrap_or_else(|| Path::new(DEFAULT_SETTINGS_FILE));
    if let Ok(raw) = fs::read_to_string(path) {
        match toml::from_str::<HashMap<String, String>>(&raw) {
            Ok(file_cfg) => apply_file(&mut settings, &file_cfg),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "ignoring unreadable settings file")
            }
        }
    }

    apply_env(&mut settings, |name| std::env::var(name).ok());
    settings
}

fn apply_file(settings: &mut Settings, file_cfg: &HashMap<String, String>) {
    if let Some(v) = file_cfg.get("api_url") {
        settings.api_url = v.clone();
    }
    if let Some(mode) = file_cfg.get("listing_mode").and_then(|v| ListingMode::parse(v)) {
        settings.listing_mode = mode;
    }
    if let Some(size) = file_cfg.get("page_size").and_then(|v| parse_page_size(v)) {
        settings.page_size = size;
    }
    if let Some(secs) = file_cfg.get("stale_seconds").and_then(|v| v.parse::<u64>().ok()) {
        settings.stale_time = Duration::from_secs(secs);
    }
    if let Some(v) = file_cfg.get("gc_seconds") {
        settings.gc_time = parse_gc_seconds(v).unwrap_or(settings.gc_time);
    }
    if let Some(timeout) = file_cfg.get("timeout_seconds").and_then(|v| parse_timeout_seconds(v)) {
        settings.request_timeout = timeout;
    }
    if let Some(v) = file_cfg.get("log") {
        settings.log_filter = v.clone();
    }
}

fn apply_env(settings: &mut Settings, var: impl Fn(&str) -> Option<String>) {
    if let Some(v) = var("CATALOG_API_URL") {
        settings.api_url = v;
    }
    if let Some(v) = var("APP__API_URL") {
        settings.api_url = v;
    }

    for name in ["CATALOG_PAGE_SIZE", "APP__PAGE_SIZE"] {
        if let Some(size) = var(name).and_then(|v| parse_page_size(&v)) {
            settings.page_size = size;
        }
    }

    if let Some(mode) = var("CATALOG_LISTING_MODE").and_then(|v| ListingMode::parse(&v)) {
        settings.listing_mode = mode;
    }

    if let Some(secs) = var("CATALOG_STALE_SECONDS").and_then(|v| v.parse::<u64>().ok()) {
        settings.stale_time = Duration::from_secs(secs);
    }

    if let Some(gc_time) = var("CATALOG_GC_SECONDS").and_then(|v| parse_gc_seconds(&v)) {
        settings.gc_time = gc_time;
    }

    if let Some(timeout) = var("CATALOG_TIMEOUT_SECONDS").and_then(|v| parse_timeout_seconds(&v)) {
        settings.request_timeout = timeout;
    }

    if let Some(v) = var("CATALOG_LOG") {
        settings.log_filter = v;
    }
}

fn parse_page_size(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok().filter(|size| *size > 0)
}

fn parse_timeout_seconds(raw: &str) -> Option<Duration> {
    raw.trim()
        .parse::<u64>()
        .ok()
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
}

/// `off` disables collection; anything else must be whole seconds.
fn parse_gc_seconds(raw: &str) -> Option<Option<Duration>> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("off") {
        return Some(None);
    }
    raw.parse::<u64>().ok().map(|secs| Some(Duration::from_secs(secs)))
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
