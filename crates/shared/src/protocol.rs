use serde::{Deserialize, Serialize};

use crate::{
    domain::{Item, Page, PageKey},
    error::FetchError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ListingMode {
    /// `GET endpoint?limit=..&skip=..`, body carries `total`/`skip`/`limit`.
    #[default]
    Paginated,
    /// `GET endpoint`, body is every item at once.
    ItemsOnly,
}

impl ListingMode {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "paginated" => Some(ListingMode::Paginated),
            "items-only" | "items_only" | "all" => Some(ListingMode::ItemsOnly),
            _ => None,
        }
    }
}

/// Paginated listing body: `{ products, total, skip, limit }`.
#[derive(Debug, Clone, Deserialize)]
pub struct ListingResponse {
    #[serde(alias = "items")]
    pub products: Vec<Item>,
    pub total: u64,
    pub skip: u64,
    pub limit: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ItemsEnvelope {
    #[serde(alias = "items")]
    pub products: Vec<Item>,
}

/// Every body shape the listing endpoint is known to return.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ListingPayload {
    Paginated(ListingResponse),
    Envelope(ItemsEnvelope),
    Bare(Vec<Item>),
}

impl ListingPayload {
    pub fn from_slice(body: &[u8]) -> Result<Self, FetchError> {
        Ok(serde_json::from_slice(body)?)
    }

    /// Turns the body into the [`Page`] cached under `key`.
    ///
    /// In paginated mode only a body carrying `total`/`skip`/`limit` is
    /// accepted, and it keeps the requested limit since the listing echoes
    /// the number of returned rows rather than the page size. In items-only
    /// mode every shape collapses into one page holding everything.
    pub fn into_page(self, key: PageKey, mode: ListingMode) -> Result<Page, FetchError> {
        let page = match (mode, self) {
            (ListingMode::Paginated, ListingPayload::Paginated(body)) => {
                if body.products.len() > key.limit as usize {
                    return Err(FetchError::decode(format!(
                        "page holds {} items but only {} were requested",
                        body.products.len(),
                        key.limit
                    )));
                }
                Page {
                    items: body.products,
                    total: body.total,
                    offset: body.skip,
                    limit: key.limit,
                }
            }
            (ListingMode::Paginated, _) => {
                return Err(FetchError::decode(
                    "paginated listing body is missing total/skip/limit",
                ));
            }
            (ListingMode::ItemsOnly, payload) => {
                let products = match payload {
                    ListingPayload::Paginated(ListingResponse { products, .. })
                    | ListingPayload::Envelope(ItemsEnvelope { products })
                    | ListingPayload::Bare(products) => products,
                };
                let len = products.len();
                Page {
                    items: products,
                    total: len as u64,
                    offset: 0,
                    limit: u32::try_from(len.max(1)).unwrap_or(u32::MAX),
                }
            }
        };

        validate_items(&page.items)?;
        Ok(page)
    }
}

fn validate_items(items: &[Item]) -> Result<(), FetchError> {
    for item in items {
        if !item.price.is_finite() || item.price < 0.0 {
            return Err(FetchError::decode(format!(
                "item {} has invalid price {}",
                item.id.0, item.price
            )));
        }
        if !item.rating.is_finite() {
            return Err(FetchError::decode(format!(
                "item {} has invalid rating",
                item.id.0
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
