//! Remote listing access and the page cache that sits in front of it.

pub mod clock;
pub mod data_source;
pub mod observer;
pub mod query_cache;

pub use clock::{Clock, ManualClock, SystemClock};
pub use data_source::{DataSource, HttpDataSource, ListingMode};
pub use observer::{QueryObserver, QueryState};
pub use query_cache::{
    CacheEntry, CacheSettings, Completion, FetchStatus, FetchTicket, QueryCache, RequestId,
};
