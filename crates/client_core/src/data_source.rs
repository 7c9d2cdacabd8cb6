use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use shared::{
    domain::{Page, PageKey},
    error::FetchError,
    protocol::ListingPayload,
};
use tracing::{debug, warn};
use url::Url;

pub use shared::protocol::ListingMode;

pub const DEFAULT_LISTING_URL: &str = "https://dummyjson.com/products";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Where pages come from. Implementations report every failure as a typed
/// [`FetchError`]; the cache never sees a panic or an untyped error.
#[async_trait]
pub trait DataSource: Send + Sync {
    async fn fetch_page(&self, key: PageKey) -> Result<Page, FetchError>;
}

pub struct HttpDataSource {
    http: Client,
    endpoint: Url,
    mode: ListingMode,
}

impl HttpDataSource {
    pub fn new(endpoint: Url, mode: ListingMode) -> Self {
        Self::with_client(Client::new(), endpoint, mode)
    }

    /// A stalled request fails with [`FetchError::Transport`] after `timeout`.
    pub fn with_timeout(
        endpoint: Url,
        mode: ListingMode,
        timeout: Duration,
    ) -> reqwest::Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(http, endpoint, mode))
    }

    pub fn with_client(http: Client, endpoint: Url, mode: ListingMode) -> Self {
        Self { http, endpoint, mode }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn mode(&self) -> ListingMode {
        self.mode
    }

    pub fn request_url(&self, key: PageKey) -> Url {
        let mut url = self.endpoint.clone();
        if self.mode == ListingMode::Paginated {
            url.query_pairs_mut()
                .append_pair("limit", &key.limit.to_string())
                .append_pair("skip", &key.skip().to_string());
        }
        url
    }
}

#[async_trait]
impl DataSource for HttpDataSource {
    async fn fetch_page(&self, key: PageKey) -> Result<Page, FetchError> {
        let url = self.request_url(key);
        debug!(%url, page = key.page, limit = key.limit, "fetching listing page");

        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|err| FetchError::transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!(%url, status = status.as_u16(), "listing request rejected");
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| FetchError::transport(format!("failed to read listing body: {err}")))?;

        let page = ListingPayload::from_slice(&body)
            .and_then(|payload| payload.into_page(key, self.mode))
            .inspect_err(|err| warn!(%url, error = %err, "listing body rejected"))?;

        debug!(
            page = key.page,
            items = page.items.len(),
            total = page.total,
            "listing page decoded"
        );
        Ok(page)
    }
}

#[cfg(test)]
#[path = "tests/data_source_tests.rs"]
mod tests;
