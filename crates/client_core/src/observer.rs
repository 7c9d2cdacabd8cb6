use std::sync::Arc;

use shared::{
    domain::{Page, PageKey},
    error::FetchError,
};

use crate::query_cache::QueryCache;

/// What a consumer of the active key sees.
#[derive(Debug, Clone, Default)]
pub struct QueryState {
    pub data: Option<Arc<Page>>,
    /// `data` belongs to a previously active key and is shown only until
    /// the active key's first fetch lands.
    pub is_placeholder: bool,
    pub loading: bool,
    pub fetching: bool,
    pub error: Option<FetchError>,
}

/// Follows one active key and applies placeholder retention.
///
/// When the key changes, the last data this observer displayed stays
/// visible while the new key's fetch is outstanding. Responses landing for
/// other keys never reach the observer.
#[derive(Debug, Default)]
pub struct QueryObserver {
    key: Option<PageKey>,
    last_data: Option<Arc<Page>>,
    state: QueryState,
}

impl QueryObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(&self) -> Option<PageKey> {
        self.key
    }

    pub fn set_key(&mut self, key: PageKey) {
        self.key = Some(key);
    }

    pub fn state(&self) -> &QueryState {
        &self.state
    }

    /// Recomputes the state for the active key from `cache`.
    pub fn observe(&mut self, cache: &QueryCache) -> &QueryState {
        let entry = self.key.and_then(|key| cache.entry(key));
        let fetching = entry.is_some_and(|entry| entry.is_fetching());
        let error = entry.and_then(|entry| entry.error().cloned());

        self.state = match entry.and_then(|entry| entry.data().cloned()) {
            Some(data) => {
                self.last_data = Some(Arc::clone(&data));
                QueryState {
                    data: Some(data),
                    is_placeholder: false,
                    loading: false,
                    fetching,
                    error,
                }
            }
            None if fetching && self.last_data.is_some() => QueryState {
                data: self.last_data.clone(),
                is_placeholder: true,
                loading: false,
                fetching,
                error,
            },
            None => QueryState {
                data: None,
                is_placeholder: false,
                loading: fetching,
                fetching,
                error,
            },
        };
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use shared::domain::{Item, ItemId};

    use super::*;
    use crate::query_cache::CacheSettings;

    fn page(key: PageKey, id: i64) -> Page {
        Page {
            items: vec![Item {
                id: ItemId(id),
                title: format!("item-{id}"),
                category: "misc".into(),
                price: 1.0,
                rating: 1.0,
            }],
            total: 30,
            offset: key.skip(),
            limit: key.limit,
        }
    }

    #[test]
    fn previous_page_is_a_placeholder_while_next_page_loads() {
        let mut cache = QueryCache::new(CacheSettings::default());
        let mut observer = QueryObserver::new();
        let now = Instant::now();
        let first = PageKey::new(1, 12);
        let second = PageKey::new(2, 12);

        observer.set_key(first);
        let ticket = cache.request(first, now).expect("ticket");
        assert!(observer.observe(&cache).loading);
        cache.complete(ticket, Ok(page(first, 1)), now);
        observer.observe(&cache);

        observer.set_key(second);
        let ticket = cache.request(second, now).expect("ticket");
        let state = observer.observe(&cache).clone();
        assert!(state.is_placeholder);
        assert!(!state.loading);
        assert!(state.fetching);
        assert_eq!(state.data.expect("placeholder").items[0].id, ItemId(1));

        cache.complete(ticket, Ok(page(second, 13)), now);
        let state = observer.observe(&cache).clone();
        assert!(!state.is_placeholder);
        assert!(!state.fetching);
        assert_eq!(state.data.expect("data").items[0].id, ItemId(13));
    }

    #[test]
    fn failed_first_fetch_drops_placeholder_and_reports_error() {
        let mut cache = QueryCache::new(CacheSettings::default());
        let mut observer = QueryObserver::new();
        let now = Instant::now();
        let first = PageKey::new(1, 12);
        let second = PageKey::new(2, 12);

        observer.set_key(first);
        let ticket = cache.request(first, now).expect("ticket");
        cache.complete(ticket, Ok(page(first, 1)), now);
        observer.observe(&cache);

        observer.set_key(second);
        let ticket = cache.request(second, now).expect("ticket");
        cache.complete(ticket, Err(FetchError::Status(500)), now);
        let state = observer.observe(&cache);
        assert!(state.data.is_none());
        assert!(!state.loading);
        assert_eq!(state.error, Some(FetchError::Status(500)));
    }

    #[test]
    fn late_response_for_previous_key_is_not_observed() {
        let mut cache = QueryCache::new(CacheSettings::default());
        let mut observer = QueryObserver::new();
        let now = Instant::now();
        let first = PageKey::new(1, 12);
        let second = PageKey::new(2, 12);

        observer.set_key(first);
        let stale = cache.request(first, now).expect("ticket");
        observer.set_key(second);
        cache.request(second, now).expect("ticket");

        cache.complete(stale, Ok(page(first, 1)), now);
        let state = observer.observe(&cache);
        assert!(state.data.is_none());
        assert!(state.loading);
    }
}
