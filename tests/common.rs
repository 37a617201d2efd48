//! Common test utilities for BitPOS integration tests
//!
//! Every test builds its own application over a private in-memory database
//! and drives it through the HTTP API, the same way the web and mobile
//! clients do.

#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use bitpos::{auth::TokenKeys, create_app, db::init_pool};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::Service;

/// A card number the demo processor approves
pub const APPROVED_CARD: &str = "4242424242424242";

/// A card number the demo processor declines
pub const DECLINED_CARD: &str = "4111111111111111";

/// Creates a test application with an in-memory SQLite database
///
/// The database URL is unique per call and uses a shared cache, so all
/// pooled connections of one app see the same data while tests stay
/// isolated from each other.
pub fn create_test_app() -> Router {
    let database_url = format!(
        "file:it_{}?mode=memory&cache=shared",
        uuid::Uuid::new_v4().simple()
    );
    let pool = Arc::new(init_pool(&database_url).unwrap());

    let conn = &mut pool.get().unwrap();
    bitpos::run_migrations(conn).unwrap();

    create_app(pool, TokenKeys::new("integration-test-secret", 24))
}

/// Sends one request and returns the status and the parsed JSON body
///
/// ### Arguments
///
/// * `app` - The test application
/// * `method` - The HTTP method
/// * `uri` - The request path
/// * `token` - A bearer token, if the route needs one
/// * `body` - A JSON body, if any
pub async fn send(
    app: &mut Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().uri(uri).method(method);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.call(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// An account created through the signup endpoint
pub struct TestUser {
    pub id: String,
    pub email: String,
    pub token: String,
}

/// Signs up a user with `role` ("CUSTOMER" or "VENDOR") and a random email
pub async fn signup(app: &mut Router, role: &str) -> TestUser {
    let email = format!("{}@example.com", uuid::Uuid::new_v4().simple());
    let (status, body) = send(
        app,
        "POST",
        "/api/auth/signup",
        None,
        Some(json!({
            "email": email,
            "password": "password123",
            "name": format!("Test {}", role.to_lowercase()),
            "role": role
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "signup failed: {}", body);

    TestUser {
        id: body["user"]["id"].as_str().unwrap().to_string(),
        email,
        token: body["token"].as_str().unwrap().to_string(),
    }
}

/// Tops up a customer wallet with the demo card and returns the new balance view
pub async fn add_funds(app: &mut Router, customer: &TestUser, amount_usd: u32) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/api/customer/add-funds-card",
        Some(&customer.token),
        Some(json!({
            "cardNumber": APPROVED_CARD,
            "amount": amount_usd,
            "cardHolderName": "Test Customer",
            "expiryDate": "12/30",
            "cvv": "123"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "add funds failed: {}", body);
    body["balance"].clone()
}

/// Adds a product to the vendor's catalog and returns it
pub async fn create_product(app: &mut Router, vendor: &TestUser, name: &str, price_btc: f64) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/api/vendor/add-product",
        Some(&vendor.token),
        Some(json!({
            "name": name,
            "description": format!("{} for testing", name),
            "priceBtc": price_btc
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "add product failed: {}", body);
    body
}

/// Builds one cart line at the product's listed price
pub fn cart_line(product: &Value, quantity: i32) -> Value {
    json!({
        "productId": product["id"],
        "quantity": quantity,
        "priceBtc": product["priceBtc"]
    })
}

/// Fetches the caller's customer balance
pub async fn balance(app: &mut Router, customer: &TestUser) -> Value {
    let (status, body) = send(app, "GET", "/api/customer/balance", Some(&customer.token), None).await;
    assert_eq!(status, StatusCode::OK);
    body
}
