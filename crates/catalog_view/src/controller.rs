//! View state owner and its three ordered reactions.
//!
//! * hydrate: [`ViewController::mount`] decodes the location once; there is
//!   no other way to build a controller, so it cannot run twice.
//! * page reset: a transition that changes query, category or sort forces
//!   page 1, evaluated against the previous config so a deep-linked page
//!   survives mount.
//! * persist: every transition that changes the config writes exactly one
//!   location replace.
//!
//! Each [`ViewAction`] is one transition; observers never see a config
//! with some of its fields updated and others not.

use std::{sync::Arc, time::Instant};

use client_core::{
    CacheSettings, Clock, Completion, FetchTicket, QueryCache, QueryObserver, QueryState,
};
use shared::{
    domain::{
        Item, ItemId, Page, PageKey, SortBy, SortDir, ViewConfig, ALL_CATEGORIES,
        DEFAULT_PAGE_SIZE,
    },
    error::FetchError,
};
use tracing::{debug, info};
use url_state::{decode, encode, LocationStore};

use crate::{pagination::Pagination, pipeline, snapshot::ViewSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewSettings {
    pub page_size: u32,
    pub cache: CacheSettings,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            cache: CacheSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewAction {
    SetQuery(String),
    SetCategory(String),
    SetSortBy(SortBy),
    SetSortDir(SortDir),
    Select(Option<ItemId>),
    GoToPage(u32),
    NextPage,
    PrevPage,
    Reset,
}

pub struct ViewController<L: LocationStore> {
    config: ViewConfig,
    location: L,
    settings: ViewSettings,
    cache: QueryCache,
    observer: QueryObserver,
    clock: Arc<dyn Clock>,
    pending: Vec<FetchTicket>,
}

impl<L: LocationStore> ViewController<L> {
    pub fn mount(location: L, settings: ViewSettings, clock: Arc<dyn Clock>) -> Self {
        let search = location.search();
        let mut config = decode(&search).into_config();
        normalize(&mut config);
        info!(search = %search, page = config.page, "hydrated view config from location");

        let mut controller = Self {
            config,
            location,
            settings,
            cache: QueryCache::new(settings.cache),
            observer: QueryObserver::new(),
            clock,
            pending: Vec::new(),
        };
        controller.persist();
        controller.sync_query();
        controller
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    pub fn location(&self) -> &L {
        &self.location
    }

    pub fn settings(&self) -> ViewSettings {
        self.settings
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub fn active_key(&self) -> PageKey {
        PageKey::new(self.config.page, self.settings.page_size)
    }

    pub fn query_state(&self) -> &QueryState {
        self.observer.state()
    }

    /// Applies one action as a single transition. Returns whether the
    /// config changed (and therefore whether the location was rewritten).
    pub fn dispatch(&mut self, action: ViewAction) -> bool {
        let mut next = self.config.clone();
        match action {
            ViewAction::SetQuery(query) => next.query = query,
            ViewAction::SetCategory(category) => next.category = category,
            ViewAction::SetSortBy(sort_by) => next.sort_by = sort_by,
            ViewAction::SetSortDir(sort_dir) => next.sort_dir = sort_dir,
            ViewAction::Select(selected_id) => next.selected_id = selected_id,
            ViewAction::GoToPage(page) => next.page = page,
            ViewAction::NextPage => next.page = self.pagination().next_page(),
            ViewAction::PrevPage => next.page = self.pagination().prev_page(),
            ViewAction::Reset => next = ViewConfig::default(),
        }
        self.commit(next)
    }

    pub fn set_query(&mut self, query: impl Into<String>) -> bool {
        self.dispatch(ViewAction::SetQuery(query.into()))
    }

    pub fn set_category(&mut self, category: impl Into<String>) -> bool {
        self.dispatch(ViewAction::SetCategory(category.into()))
    }

    pub fn set_sort_by(&mut self, sort_by: SortBy) -> bool {
        self.dispatch(ViewAction::SetSortBy(sort_by))
    }

    pub fn set_sort_dir(&mut self, sort_dir: SortDir) -> bool {
        self.dispatch(ViewAction::SetSortDir(sort_dir))
    }

    pub fn select(&mut self, selected_id: Option<ItemId>) -> bool {
        self.dispatch(ViewAction::Select(selected_id))
    }

    pub fn go_to_page(&mut self, page: u32) -> bool {
        self.dispatch(ViewAction::GoToPage(page))
    }

    pub fn next_page(&mut self) -> bool {
        self.dispatch(ViewAction::NextPage)
    }

    pub fn prev_page(&mut self) -> bool {
        self.dispatch(ViewAction::PrevPage)
    }

    pub fn reset(&mut self) -> bool {
        self.dispatch(ViewAction::Reset)
    }

    fn commit(&mut self, mut next: ViewConfig) -> bool {
        normalize(&mut next);
        if next.pipeline_inputs_differ(&self.config) {
            next.page = 1;
        }
        if next == self.config {
            return false;
        }

        let page_changed = next.page != self.config.page;
        self.config = next;
        self.persist();
        if page_changed {
            self.sync_query();
        }
        true
    }

    fn persist(&mut self) {
        let search = encode(&self.config);
        debug!(search = %search, "persisting view config to location");
        self.location.replace_search(&search);
    }

    fn sync_query(&mut self) {
        let now = self.now();
        let key = self.active_key();
        self.observer.set_key(key);
        if let Some(ticket) = self.cache.request(key, now) {
            self.pending.push(ticket);
        }
        self.cache.collect_garbage(now, key);
        self.observer.observe(&self.cache);
    }

    /// Forces a fetch of the active page. Data on screen stays until the
    /// response lands.
    pub fn refetch(&mut self) -> FetchTicket {
        let now = self.now();
        let ticket = self.cache.refetch(self.active_key(), now);
        self.pending.push(ticket);
        self.observer.observe(&self.cache);
        ticket
    }

    /// Re-accesses the active page so stale data refetches in the
    /// background. Meant for timer or focus events.
    pub fn revalidate(&mut self) -> Option<FetchTicket> {
        let before = self.pending.len();
        self.sync_query();
        self.pending.get(before).copied()
    }

    pub fn apply_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<Page, FetchError>,
    ) -> Completion {
        let now = self.now();
        let completion = self.cache.complete(ticket, result, now);
        self.observer.observe(&self.cache);
        completion
    }

    /// Tickets issued since the last call; each must be fetched and fed back
    /// through [`ViewController::apply_fetch`].
    pub fn drain_fetches(&mut self) -> Vec<FetchTicket> {
        std::mem::take(&mut self.pending)
    }

    pub fn pagination(&self) -> Pagination {
        let (total, limit) = self
            .observer
            .state()
            .data
            .as_deref()
            .map_or((0, self.settings.page_size), |page| (page.total, page.limit));
        Pagination::new(self.config.page, total, limit)
    }

    pub fn selected_item(&self) -> Option<&Item> {
        let items = self.observer.state().data.as_deref().map(|page| page.items.as_slice())?;
        pipeline::select_item(items, self.config.selected_id)
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        let state = self.observer.state();
        let page_items: &[Item] = state
            .data
            .as_deref()
            .map(|page| page.items.as_slice())
            .unwrap_or(&[]);
        let show_error = state.error.is_some() && state.data.is_none();
        let items = pipeline::visible_items(page_items, &self.config)
            .into_iter()
            .cloned()
            .collect();
        let pagination = self.pagination();

        ViewSnapshot {
            config: self.config.clone(),
            items,
            categories: pipeline::categories(page_items),
            total: state.data.as_deref().map_or(0, |page| page.total),
            page: pagination.page,
            total_pages: pagination.total_pages,
            has_prev: pagination.has_prev(),
            has_next: pagination.has_next(),
            loading: state.loading,
            fetching: state.fetching,
            is_placeholder: state.is_placeholder,
            error: state.error.clone(),
            show_error,
            selected_item: self.selected_item().cloned(),
            location: self.location.search(),
        }
    }

    fn now(&self) -> Instant {
        self.clock.now()
    }
}

fn normalize(config: &mut ViewConfig) {
    if config.category.is_empty() {
        config.category = ALL_CATEGORIES.to_string();
    }
    config.page = config.page.max(1);
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
