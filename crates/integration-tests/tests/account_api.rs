//! Wishlist, address book and checkout history tests.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use axum::http::{Method, StatusCode};
use serde_json::{Value, json};

use shoply_integration_tests::TestApp;

const UID: &str = "test-user-id";

// ============================================================================
// Wishlist
// ============================================================================

fn wishlist_body(uid: &str, title: &str) -> Value {
    json!({
        "uid": uid,
        "title": title,
        "image": "hoodie.jpg",
        "price": "49.50",
        "pathname": "/products/hoodie"
    })
}

#[tokio::test]
async fn test_wishlist_add_list_remove() {
    let app = TestApp::new();
    let token = app.token_for(UID);

    let resp = app
        .post("/api/wishlist", &token, &wishlist_body(UID, "Hoodie"))
        .await;
    assert_eq!(resp.status, StatusCode::CREATED);
    assert_eq!(resp.json["uid"], UID);
    let id = resp.json["id"].as_str().unwrap().to_string();

    app.post("/api/wishlist", &token, &wishlist_body(UID, "Cap"))
        .await;

    let resp = app.get(&format!("/api/wishlist/{UID}"), &token).await;
    assert_eq!(resp.status, StatusCode::OK);
    let titles: Vec<_> = resp.json.as_array().unwrap().iter().map(|i| i["title"].clone()).collect();
    assert_eq!(titles, vec![json!("Hoodie"), json!("Cap")]);

    let resp = app.delete(&format!("/api/wishlist/{id}"), &token).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.message(), Some("Item removed from wishlist"));

    let resp = app.delete(&format!("/api/wishlist/{id}"), &token).await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert_eq!(resp.message(), Some("Item not found"));
}

#[tokio::test]
async fn test_wishlist_ownership() {
    let app = TestApp::new();
    let owner = app.token_for(UID);
    let intruder = app.token_for("intruder");

    let resp = app
        .post("/api/wishlist", &owner, &wishlist_body(UID, "Hoodie"))
        .await;
    let id = resp.json["id"].as_str().unwrap().to_string();

    let resp = app
        .post("/api/wishlist", &intruder, &wishlist_body(UID, "Sneaky"))
        .await;
    assert_eq!(resp.status, StatusCode::FORBIDDEN);

    let resp = app.get(&format!("/api/wishlist/{UID}"), &intruder).await;
    assert_eq!(resp.status, StatusCode::FORBIDDEN);

    let resp = app.delete(&format!("/api/wishlist/{id}"), &intruder).await;
    assert_eq!(resp.status, StatusCode::FORBIDDEN);

    let resp = app.delete("/api/wishlist/nope", &owner).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);

    let resp = app.get(&format!("/api/wishlist/{UID}"), &owner).await;
    assert_eq!(resp.json.as_array().unwrap().len(), 1);
}

// ============================================================================
// Address book
// ============================================================================

fn address_body(uid: &str, city: &str) -> Value {
    json!({
        "uid": uid,
        "firstName": "Ada",
        "lastName": "Lovelace",
        "country": "United Kingdom",
        "street": "12 St James's Square",
        "city": city,
        "state": "Greater London",
        "number": "+44 20 7946 0000",
        "postalCode": "SW1Y 4JH",
        "shipping": true
    })
}

#[tokio::test]
async fn test_address_crud() {
    let app = TestApp::new();
    let token = app.token_for(UID);

    let resp = app
        .post("/api/info-account", &token, &address_body(UID, "London"))
        .await;
    assert_eq!(resp.status, StatusCode::CREATED);
    assert_eq!(resp.json["firstName"], "Ada");
    assert_eq!(resp.json["shipping"], true);
    assert_eq!(resp.json["billing"], false);
    let id = resp.json["id"].as_str().unwrap().to_string();

    let resp = app
        .request(
            Method::PUT,
            &format!("/api/info-account/{id}"),
            Some(&token),
            Some(&address_body(UID, "Bath")),
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json["city"], "Bath");
    assert_eq!(resp.json["uid"], UID);

    let resp = app.get(&format!("/api/info-account/{UID}"), &token).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json.as_array().unwrap().len(), 1);
    assert_eq!(resp.json[0]["city"], "Bath");

    let resp = app.delete(&format!("/api/info-account/{id}"), &token).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.message(), Some("Item removed from InfoAccountList"));

    let resp = app.get(&format!("/api/info-account/{UID}"), &token).await;
    assert_eq!(resp.json, json!([]));
}

#[tokio::test]
async fn test_address_update_cannot_change_owner() {
    let app = TestApp::new();
    let owner = app.token_for(UID);
    let intruder = app.token_for("intruder");

    let resp = app
        .post("/api/info-account", &owner, &address_body(UID, "London"))
        .await;
    let id = resp.json["id"].as_str().unwrap().to_string();
    let uri = format!("/api/info-account/{id}");

    // Owner trying to hand the address to someone else
    let resp = app
        .request(
            Method::PUT,
            &uri,
            Some(&owner),
            Some(&address_body("intruder", "Paris")),
        )
        .await;
    assert_eq!(resp.status, StatusCode::FORBIDDEN);

    // Someone else claiming the address for themselves
    let resp = app
        .request(
            Method::PUT,
            &uri,
            Some(&intruder),
            Some(&address_body("intruder", "Paris")),
        )
        .await;
    assert_eq!(resp.status, StatusCode::FORBIDDEN);

    let resp = app.delete(&uri, &intruder).await;
    assert_eq!(resp.status, StatusCode::FORBIDDEN);

    let resp = app.get(&format!("/api/info-account/{UID}"), &owner).await;
    assert_eq!(resp.json[0]["city"], "London");
}

#[tokio::test]
async fn test_address_missing_and_malformed() {
    let app = TestApp::new();
    let token = app.token_for(UID);

    let resp = app
        .delete("/api/info-account/5f1d7a2c-8e3b-4c6d-9a0f-1b2c3d4e5f60", &token)
        .await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);

    let resp = app
        .request(
            Method::PUT,
            "/api/info-account/12",
            Some(&token),
            Some(&address_body(UID, "Leeds")),
        )
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.message(), Some("Invalid ID format"));
}

// ============================================================================
// Checkout
// ============================================================================

fn checkout_body(uid: &str, titles: &[&str]) -> Value {
    let orders: Vec<Value> = titles
        .iter()
        .map(|title| {
            json!({
                "title": title,
                "image": "item.jpg",
                "price": "10.00",
                "color": "Black",
                "quantity": 2,
                "webID": 7
            })
        })
        .collect();
    json!({ "uid": uid, "orders": orders })
}

#[tokio::test]
async fn test_checkout_appends_orders() {
    let app = TestApp::new();
    let token = app.token_for(UID);

    let resp = app.get(&format!("/api/check-out/{UID}"), &token).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.text, "null");

    let resp = app
        .post("/api/check-out", &token, &checkout_body(UID, &["Tee", "Socks"]))
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(
        resp.message(),
        Some("Order successfully added to your dashboard")
    );
    assert_eq!(resp.json["checkOut"]["orders"].as_array().unwrap().len(), 2);
    let history_id = resp.json["checkOut"]["id"].clone();

    let resp = app
        .post("/api/check-out", &token, &checkout_body(UID, &["Scarf"]))
        .await;
    assert_eq!(resp.json["checkOut"]["id"], history_id);

    let resp = app.get(&format!("/api/check-out/{UID}"), &token).await;
    let orders = resp.json["orders"].as_array().unwrap();
    assert_eq!(orders.len(), 3);
    assert_eq!(orders[2]["title"], "Scarf");
    assert!(orders[0]["placedAt"].is_string());
    assert!(orders[0]["id"].is_string());
}

#[tokio::test]
async fn test_checkout_ownership() {
    let app = TestApp::new();
    let intruder = app.token_for("intruder");

    let resp = app
        .post("/api/check-out", &intruder, &checkout_body(UID, &["Tee"]))
        .await;
    assert_eq!(resp.status, StatusCode::FORBIDDEN);

    let resp = app.get(&format!("/api/check-out/{UID}"), &intruder).await;
    assert_eq!(resp.status, StatusCode::FORBIDDEN);
}
