//! Integration tests for `ApiClient` against a wiremock storefront backend.

use std::time::Duration;

use rust_decimal::Decimal;
use serde_json::json;
use treadline_client::{ApiClient, ClientError, RetryPolicy, ServiceSync};
use treadline_core::{ProductType, RefId};
use wiremock::matchers::{body_json, header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> ApiClient {
    ApiClient::with_base_url(base_url, 5).expect("client construction should not fail")
}

// ---------------------------------------------------------------------------
// Reference data
// ---------------------------------------------------------------------------

#[tokio::test]
async fn years_unwraps_data_envelope() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/years"))
        .and(header_exists("x-request-id"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"_id": "y1", "year": 2020}, {"_id": "y2", "year": "2021"}]
        })))
        .mount(&server)
        .await;

    let years = test_client(&server.uri()).years().await.expect("years");
    assert_eq!(years.len(), 2);
    assert_eq!(years[0].year, "2020");
    assert_eq!(years[1].year, "2021");
}

#[tokio::test]
async fn makes_are_scoped_by_year() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/makes"))
        .and(query_param("year", "2020"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"_id": "m1", "make": "Honda", "year": "2020"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let makes = test_client(&server.uri()).makes("2020").await.expect("makes");
    assert_eq!(makes.len(), 1);
    assert_eq!(makes[0].make, "Honda");
}

#[tokio::test]
async fn tire_sizes_send_every_parent_value() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/tire-sizes"))
        .and(query_param("year", "2020"))
        .and(query_param("make", "Honda"))
        .and(query_param("model", "Civic"))
        .and(query_param("trim", "EX"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"_id": "s1", "tireSize": "215/55R16"}]
        })))
        .mount(&server)
        .await;

    let sizes = test_client(&server.uri())
        .tire_sizes("2020", "Honda", "Civic", "EX")
        .await
        .expect("sizes");
    assert_eq!(sizes[0].tire_size, "215/55R16");
}

#[tokio::test]
async fn size_catalog_fetches_all_three_lists() {
    let server = MockServer::start().await;

    for (endpoint, body) in [
        ("/widths", json!({"data": [{"_id": "w1", "width": 225}]})),
        ("/ratios", json!({"data": [{"_id": "r1", "ratio": 45, "width": "225"}]})),
        ("/diameters", json!({"data": [{"_id": "d1", "diameter": 17}, {"_id": "d2", "diameter": 18}]})),
    ] {
        Mock::given(method("GET"))
            .and(path(endpoint))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;
    }

    let catalog = test_client(&server.uri())
        .size_catalog()
        .await
        .expect("size catalog");
    assert_eq!(catalog.widths.len(), 1);
    assert_eq!(catalog.ratios[0].width.as_deref(), Some("225"));
    assert_eq!(catalog.diameters.len(), 2);
}

#[tokio::test]
async fn size_catalog_fails_when_one_list_fails() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/widths"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/ratios"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/diameters"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let result = test_client(&server.uri()).size_catalog().await;
    assert!(
        matches!(result, Err(ClientError::NotFound { .. })),
        "expected NotFound, got: {result:?}"
    );
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

#[tokio::test]
async fn products_skip_malformed_records() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/tires"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"_id": "t1", "name": "Pilot Sport 4S", "price": "189.99",
                 "brand": {"_id": "b1", "name": "Michelin"}},
                {"_id": "t2", "name": "No price tire"},
                {"_id": "t3", "name": "Turanza", "price": 120, "brand": null}
            ]
        })))
        .mount(&server)
        .await;

    let products = test_client(&server.uri())
        .products(ProductType::Tire)
        .await
        .expect("products");
    assert_eq!(products.len(), 2, "record without price must be skipped");
    assert_eq!(products[0].brand_name(), "Michelin");
    assert_eq!(products[0].price(), Decimal::new(18999, 2));
    assert_eq!(products[1].product_type(), ProductType::Tire);
    assert_eq!(products[1].brand_name(), "");
}

#[tokio::test]
async fn products_with_another_type_tag_are_skipped() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/tires"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"_id": "t1", "productType": "tire", "name": "Pilot Sport 4S", "price": 190},
                {"_id": "wh1", "productType": "wheel", "name": "Forged", "price": 450},
                {"_id": "t2", "name": "Untagged", "price": 99}
            ]
        })))
        .mount(&server)
        .await;

    let products = test_client(&server.uri())
        .products(ProductType::Tire)
        .await
        .expect("products");
    let ids: Vec<&str> = products.iter().map(|p| p.id().as_str()).collect();
    assert_eq!(ids, ["t1", "t2"]);
    assert!(products
        .iter()
        .all(|p| p.product_type() == ProductType::Tire));
}

#[tokio::test]
async fn wheels_come_from_wheel_collection() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/wheels"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"_id": "wh1", "name": "Forged", "price": 450, "boltPattern": "5x114.3"}]
        })))
        .mount(&server)
        .await;

    let products = test_client(&server.uri())
        .products(ProductType::Wheel)
        .await
        .expect("wheels");
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].product_type(), ProductType::Wheel);
}

#[tokio::test]
async fn non_envelope_body_is_a_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/brands"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"_id": "b1", "name": "Michelin"}])))
        .mount(&server)
        .await;

    let result = test_client(&server.uri()).brands().await;
    assert!(
        matches!(result, Err(ClientError::Deserialize { ref context, .. }) if context == "brands"),
        "expected Deserialize(brands), got: {result:?}"
    );
}

// ---------------------------------------------------------------------------
// Retries
// ---------------------------------------------------------------------------

#[tokio::test]
async fn server_errors_are_retried_for_reads() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/categories"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"_id": "c1", "name": "All-season"}]
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri()).with_retry_policy(RetryPolicy::new(2, Duration::ZERO));
    let categories = client.categories().await.expect("categories after retry");
    assert_eq!(categories[0].name, "All-season");
}

#[tokio::test]
async fn server_error_without_retries_is_unexpected_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/driving-types"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let result = test_client(&server.uri()).driving_types().await;
    assert!(matches!(
        result,
        Err(ClientError::UnexpectedStatus { status: 500, .. })
    ));
}

// ---------------------------------------------------------------------------
// Cart
// ---------------------------------------------------------------------------

#[tokio::test]
async fn get_cart_parses_items_and_token_is_sent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cart/u1"))
        .and(header("authorization", "Bearer secret-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "_id": "c1",
                "user": "u1",
                "items": [{
                    "product": "p1",
                    "productType": "tire",
                    "quantity": 2,
                    "price": 10,
                    "installationFee": 5,
                    "productDetails": {"name": "Test", "stock": 8, "addonServices": []}
                }],
                "totalPrice": 30
            }
        })))
        .mount(&server)
        .await;

    let cart = test_client(&server.uri())
        .with_token("secret-token")
        .get_cart("u1")
        .await
        .expect("cart");
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.items[0].available_stock(), Some(8));
}

#[tokio::test]
async fn update_services_sends_addon_ids() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/cart/u1/items/p1/services"))
        .and(body_json(json!({"installation": true, "addonServices": ["a2"]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": null})))
        .expect(1)
        .mount(&server)
        .await;

    let sync = ServiceSync {
        installation: true,
        addon_services: vec![RefId::new("a2")],
    };
    test_client(&server.uri())
        .update_services("u1", &RefId::new("p1"), &sync)
        .await
        .expect("services update");
}

#[tokio::test]
async fn update_item_sends_quantity() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/cart/u1/items/p1"))
        .and(body_json(json!({"quantity": 3})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    test_client(&server.uri())
        .update_item("u1", &RefId::new("p1"), 3)
        .await
        .expect("quantity update");
}

#[tokio::test]
async fn mutations_are_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/cart/u1/items/p1"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri()).with_retry_policy(RetryPolicy::new(3, Duration::ZERO));
    let result = client.remove_item("u1", &RefId::new("p1")).await;
    assert!(matches!(
        result,
        Err(ClientError::UnexpectedStatus { status: 503, .. })
    ));
}

#[tokio::test]
async fn clear_cart_deletes_whole_cart() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/cart/u1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    test_client(&server.uri())
        .clear_cart("u1")
        .await
        .expect("clear cart");
}
