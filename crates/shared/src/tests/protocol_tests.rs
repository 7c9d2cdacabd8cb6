use super::*;
use crate::domain::{ItemId, PageKey};
use crate::error::FetchErrorKind;

fn product_json(id: i64, title: &str, price: f64) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "title": title,
        "category": "beauty",
        "price": price,
        "rating": 4.5,
        "stock": 10,
        "tags": ["unused"]
    })
}

fn decode(body: serde_json::Value, key: PageKey, mode: ListingMode) -> Result<Page, FetchError> {
    ListingPayload::from_slice(body.to_string().as_bytes())
        .expect("payload")
        .into_page(key, mode)
}

#[test]
fn paginated_body_keeps_requested_limit_and_server_skip() {
    let body = serde_json::json!({
        "products": [product_json(25, "Mascara", 9.99)],
        "total": 30,
        "skip": 24,
        "limit": 1
    });
    let page = decode(body, PageKey::new(3, 12), ListingMode::Paginated).expect("page");

    assert_eq!(page.total, 30);
    assert_eq!(page.offset, 24);
    assert_eq!(page.limit, 12);
    assert_eq!(page.total_pages(), 3);
    assert_eq!(page.items[0].id, ItemId(25));
}

#[test]
fn items_only_mode_collapses_bare_array_into_one_page() {
    let body = serde_json::json!([
        product_json(1, "Banana", 3.0),
        product_json(2, "apple", 5.0)
    ]);
    let page = decode(body, PageKey::new(1, 12), ListingMode::ItemsOnly).expect("page");

    assert_eq!(page.total, 2);
    assert_eq!(page.limit, 2);
    assert_eq!(page.total_pages(), 1);
}

#[test]
fn items_alias_is_accepted_for_envelopes() {
    let body = serde_json::json!({ "items": [product_json(7, "Lamp", 20.0)] });
    let page = decode(body, PageKey::new(1, 12), ListingMode::ItemsOnly).expect("page");
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.offset, 0);
}

#[test]
fn items_only_mode_ignores_pagination_fields() {
    let products: Vec<_> = (1..=20).map(|id| product_json(id, "x", 1.0)).collect();
    let body = serde_json::json!({ "products": products, "total": 100, "skip": 40, "limit": 20 });
    let page = decode(body, PageKey::new(1, 12), ListingMode::ItemsOnly).expect("page");

    assert_eq!(page.items.len(), 20);
    assert_eq!(page.total, 20);
    assert_eq!(page.offset, 0);
}

#[test]
fn paginated_mode_rejects_envelope_without_totals() {
    let products: Vec<_> = (1..=20).map(|id| product_json(id, "x", 1.0)).collect();
    let body = serde_json::json!({ "products": products });
    let err = decode(body, PageKey::new(2, 12), ListingMode::Paginated).expect_err("must reject");
    assert_eq!(err.kind(), FetchErrorKind::Decode);
}

#[test]
fn paginated_mode_rejects_bare_array() {
    let body = serde_json::json!([product_json(1, "Banana", 3.0)]);
    let err = decode(body, PageKey::new(1, 12), ListingMode::Paginated).expect_err("must reject");
    assert_eq!(err.kind(), FetchErrorKind::Decode);
}

#[test]
fn oversized_page_is_a_decode_error() {
    let products: Vec<_> = (1..=3).map(|id| product_json(id, "x", 1.0)).collect();
    let body = serde_json::json!({ "products": products, "total": 3, "skip": 0, "limit": 3 });
    let err = decode(body, PageKey::new(1, 2), ListingMode::Paginated).expect_err("must reject");
    assert_eq!(err.kind(), FetchErrorKind::Decode);
}

#[test]
fn negative_price_is_a_decode_error() {
    let body = serde_json::json!([product_json(1, "Refund", -1.0)]);
    let err = decode(body, PageKey::new(1, 12), ListingMode::ItemsOnly).expect_err("must reject");
    assert!(err.to_string().contains("invalid price"), "{err}");
}

#[test]
fn non_listing_json_is_a_decode_error() {
    let err = ListingPayload::from_slice(br#"{"message":"oops"}"#).expect_err("must reject");
    assert_eq!(err.kind(), FetchErrorKind::Decode);

    let err = ListingPayload::from_slice(b"<html>").expect_err("must reject");
    assert_eq!(err.kind(), FetchErrorKind::Decode);
}

#[test]
fn listing_mode_parses_aliases() {
    assert_eq!(ListingMode::parse("Paginated"), Some(ListingMode::Paginated));
    assert_eq!(ListingMode::parse(" items-only "), Some(ListingMode::ItemsOnly));
    assert_eq!(ListingMode::parse("all"), Some(ListingMode::ItemsOnly));
    assert_eq!(ListingMode::parse("cursor"), None);
}
