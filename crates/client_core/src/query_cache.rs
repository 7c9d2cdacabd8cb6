//! Page cache keyed by `(page, limit)`.
//!
//! The cache is a state machine and never performs I/O itself. Accessing a
//! key hands out a [`FetchTicket`] when a network call is due; the caller
//! runs the fetch and feeds the result back through [`QueryCache::complete`].
//! Only the newest outstanding ticket of a key may write to that key, which
//! gives per-key dedup and stale-response suppression in one rule.

use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use shared::{
    domain::{Page, PageKey},
    error::FetchError,
};
use tracing::{debug, info, warn};

pub const DEFAULT_STALE_TIME: Duration = Duration::from_secs(60);
pub const DEFAULT_GC_TIME: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheSettings {
    /// How long a successful fetch stays fresh.
    pub stale_time: Duration,
    /// Idle entries older than this are dropped by `collect_garbage`.
    /// `None` keeps every entry for the lifetime of the cache.
    pub gc_time: Option<Duration>,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            stale_time: DEFAULT_STALE_TIME,
            gc_time: Some(DEFAULT_GC_TIME),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(u64);

/// Permission to run one fetch for `key`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub id: RequestId,
    pub key: PageKey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// A newer request for the key was issued, or the entry was collected.
    Superseded,
}

#[derive(Debug, Clone, Default)]
pub struct CacheEntry {
    status: FetchStatus,
    data: Option<Arc<Page>>,
    error: Option<FetchError>,
    in_flight: Option<RequestId>,
    updated_at: Option<Instant>,
    last_access: Option<Instant>,
}

impl CacheEntry {
    pub fn status(&self) -> FetchStatus {
        self.status
    }

    pub fn data(&self) -> Option<&Arc<Page>> {
        self.data.as_ref()
    }

    pub fn error(&self) -> Option<&FetchError> {
        self.error.as_ref()
    }

    pub fn is_fetching(&self) -> bool {
        self.in_flight.is_some()
    }

    /// True only while nothing has ever been produced for this key.
    pub fn is_loading(&self) -> bool {
        self.data.is_none() && self.is_fetching()
    }

    pub fn updated_at(&self) -> Option<Instant> {
        self.updated_at
    }

    fn is_fresh(&self, now: Instant, stale_time: Duration) -> bool {
        match (self.data.is_some(), self.updated_at) {
            (true, Some(updated_at)) => now.saturating_duration_since(updated_at) < stale_time,
            _ => false,
        }
    }
}

#[derive(Debug, Default)]
pub struct QueryCache {
    entries: HashMap<PageKey, CacheEntry>,
    settings: CacheSettings,
    next_request: u64,
}

impl QueryCache {
    pub fn new(settings: CacheSettings) -> Self {
        Self {
            entries: HashMap::new(),
            settings,
            next_request: 0,
        }
    }

    pub fn settings(&self) -> CacheSettings {
        self.settings
    }

    pub fn entry(&self, key: PageKey) -> Option<&CacheEntry> {
        self.entries.get(&key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_stale(&self, key: PageKey, now: Instant) -> bool {
        self.entries
            .get(&key)
            .map_or(true, |entry| !entry.is_fresh(now, self.settings.stale_time))
    }

    /// Accesses `key`. Returns a ticket when the caller has to fetch: the
    /// key has no data or its data went stale, and nothing is in flight for
    /// it yet. A second access while a request is outstanding attaches to
    /// that request and returns `None`.
    pub fn request(&mut self, key: PageKey, now: Instant) -> Option<FetchTicket> {
        let stale_time = self.settings.stale_time;
        let entry = self.entries.entry(key).or_default();
        entry.last_access = Some(now);

        if entry.in_flight.is_some() {
            debug!(page = key.page, limit = key.limit, "attaching to in-flight request");
            return None;
        }
        if entry.is_fresh(now, stale_time) {
            return None;
        }

        Some(self.issue(key))
    }

    /// Forces a fetch for `key` regardless of freshness. Any request still
    /// outstanding for the key is superseded and its result will be dropped.
    pub fn refetch(&mut self, key: PageKey, now: Instant) -> FetchTicket {
        self.entries.entry(key).or_default().last_access = Some(now);
        self.issue(key)
    }

    fn issue(&mut self, key: PageKey) -> FetchTicket {
        self.next_request += 1;
        let id = RequestId(self.next_request);
        let entry = self.entries.entry(key).or_default();
        if entry.data.is_none() {
            entry.status = FetchStatus::Loading;
        }
        entry.in_flight = Some(id);
        debug!(page = key.page, limit = key.limit, request = id.0, "issued fetch ticket");
        FetchTicket { id, key }
    }

    pub fn complete(
        &mut self,
        ticket: FetchTicket,
        result: Result<Page, FetchError>,
        now: Instant,
    ) -> Completion {
        let Some(entry) = self.entries.get_mut(&ticket.key) else {
            debug!(page = ticket.key.page, request = ticket.id.0, "dropping response for collected entry");
            return Completion::Superseded;
        };
        if entry.in_flight != Some(ticket.id) {
            warn!(
                page = ticket.key.page,
                request = ticket.id.0,
                "discarding superseded response"
            );
            return Completion::Superseded;
        }

        entry.in_flight = None;
        match result {
            Ok(page) => {
                info!(
                    page = ticket.key.page,
                    items = page.items.len(),
                    total = page.total,
                    "page cached"
                );
                entry.status = FetchStatus::Success;
                entry.data = Some(Arc::new(page));
                entry.error = None;
                entry.updated_at = Some(now);
            }
            Err(err) => {
                warn!(
                    page = ticket.key.page,
                    error = %err,
                    has_data = entry.data.is_some(),
                    "page fetch failed"
                );
                entry.status = FetchStatus::Error;
                entry.error = Some(err);
            }
        }
        Completion::Applied
    }

    /// Drops idle entries untouched for longer than `gc_time`, except `keep`.
    /// Returns how many entries were removed.
    pub fn collect_garbage(&mut self, now: Instant, keep: PageKey) -> usize {
        let Some(gc_time) = self.settings.gc_time else {
            return 0;
        };
        let before = self.entries.len();
        self.entries.retain(|key, entry| {
            *key == keep
                || entry.in_flight.is_some()
                || entry
                    .last_access
                    .map_or(false, |at| now.saturating_duration_since(at) <= gc_time)
        });
        let removed = before - self.entries.len();
        if removed > 0 {
            debug!(removed, remaining = self.entries.len(), "collected idle cache entries");
        }
        removed
    }
}

#[cfg(test)]
#[path = "tests/query_cache_tests.rs"]
mod tests;
