//! Integration tests for the cart and order API.
//!
//! These tests require:
//! - A migrated `PostgreSQL` database (`BAZAAR_DATABASE_URL`)
//! - The server running against it (cargo run -p bazaar-server)
//!
//! Run with: cargo test -p bazaar-integration-tests -- --ignored

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use bazaar_core::UserRole;
use bazaar_integration_tests::{TestContext, json_body};
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

const ACCESS_DENIED: &str = "You do not have the right permissions for this resource/endpoint.";

async fn customer() -> (TestContext, Client) {
    let ctx = TestContext::new().await;
    let email = ctx.user(UserRole::Customer).await;
    let client = ctx.login(&email).await;
    (ctx, client)
}

async fn add(ctx: &TestContext, client: &Client, body: &Value) -> reqwest::Response {
    client
        .post(ctx.url("/cart/add"))
        .json(body)
        .send()
        .await
        .unwrap()
}

// ============================================================================
// Cart
// ============================================================================

#[tokio::test]
#[ignore = "requires running server and database"]
async fn test_new_cart_is_empty() {
    let (ctx, client) = customer().await;

    let resp = client.get(ctx.url("/cart")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let cart = json_body(resp).await;
    assert_eq!(cart["items"], json!([]));
    assert_eq!(cart["total"], "0.00");
}

#[tokio::test]
#[ignore = "requires running server and database"]
async fn test_cart_total_is_sum_of_lines() {
    let (ctx, client) = customer().await;
    let scarf = ctx.product(2_500, 5).await;
    let socks = ctx.product(799, 10).await;

    add(&ctx, &client, &json!({"product_id": scarf, "quantity": 2})).await;
    add(&ctx, &client, &json!({"product_id": socks, "quantity": 3})).await;

    let cart = json_body(client.get(ctx.url("/cart")).send().await.unwrap()).await;
    assert_eq!(cart["total"], "73.97");
    assert_eq!(cart["item_count"], 5);
    assert_eq!(ctx.stock(scarf).await, 3);
    assert_eq!(ctx.stock(socks).await, 7);
}

#[tokio::test]
#[ignore = "requires running server and database"]
async fn test_add_more_than_stock_is_not_acceptable() {
    let (ctx, client) = customer().await;
    let mug = ctx.product(1_250, 2).await;

    let resp = add(&ctx, &client, &json!({"product_id": mug, "quantity": 3})).await;
    assert_eq!(resp.status(), StatusCode::NOT_ACCEPTABLE);

    let body = json_body(resp).await;
    assert_eq!(body["status"], "NOT_ACCEPTABLE");
    assert!(body["message"].is_string());

    let cart = json_body(client.get(ctx.url("/cart")).send().await.unwrap()).await;
    assert_eq!(cart["items"], json!([]));
    assert_eq!(ctx.stock(mug).await, 2);
}

#[tokio::test]
#[ignore = "requires running server and database"]
async fn test_unknown_product_is_not_acceptable() {
    let (ctx, client) = customer().await;

    let resp = add(&ctx, &client, &json!({"product_id": i32::MAX, "quantity": 1})).await;
    assert_eq!(resp.status(), StatusCode::NOT_ACCEPTABLE);
}

#[tokio::test]
#[ignore = "requires running server and database"]
async fn test_reduce_and_remove_return_stock() {
    let (ctx, client) = customer().await;
    let scarf = ctx.product(2_500, 5).await;
    let socks = ctx.product(799, 5).await;

    add(&ctx, &client, &json!({"product_id": scarf, "quantity": 4})).await;
    add(&ctx, &client, &json!({"product_id": socks, "quantity": 1})).await;

    // Reducing past the line quantity changes nothing.
    let resp = client
        .put(ctx.url("/cart/reduce"))
        .json(&json!({"product_id": scarf, "quantity": 5}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_ACCEPTABLE);
    assert_eq!(ctx.stock(scarf).await, 1);

    let resp = client
        .put(ctx.url("/cart/reduce"))
        .json(&json!({"product_id": scarf, "quantity": 3}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(ctx.stock(scarf).await, 4);

    let resp = client
        .delete(ctx.url(&format!("/cart/{scarf}")))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(ctx.stock(scarf).await, 5);

    // The other line is untouched.
    let cart = json_body(resp).await;
    assert_eq!(cart["items"].as_array().unwrap().len(), 1);
    assert_eq!(cart["items"][0]["product_id"], json!(socks));

    // Removing again: the line is gone.
    let resp = client
        .delete(ctx.url(&format!("/cart/{scarf}")))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_ACCEPTABLE);
}

#[tokio::test]
#[ignore = "requires running server and database"]
async fn test_deleted_user_is_not_acceptable_on_every_cart_route() {
    let ctx = TestContext::new().await;
    let email = ctx.user(UserRole::Customer).await;
    let client = ctx.login(&email).await;
    let mug = ctx.product(1_250, 2).await;

    ctx.delete_user(&email).await;

    let body = json!({"product_id": mug, "quantity": 1});
    for request in [
        client.get(ctx.url("/cart")),
        client.post(ctx.url("/cart/add")).json(&body),
        client.put(ctx.url("/cart/reduce")).json(&body),
        client.delete(ctx.url(&format!("/cart/{mug}"))),
    ] {
        let resp = request.send().await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_ACCEPTABLE);

        let error = json_body(resp).await;
        assert_eq!(error["status"], "NOT_ACCEPTABLE");
        assert_eq!(error["message"], format!("User with email {email} not found"));
    }

    assert_eq!(ctx.stock(mug).await, 2);
}

#[tokio::test]
#[ignore = "requires running server and database"]
async fn test_missing_field_is_bad_request() {
    let (ctx, client) = customer().await;

    let resp = add(&ctx, &client, &json!({"quantity": 1})).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(resp).await["product_id"], "must not be null");
}

// ============================================================================
// Access control
// ============================================================================

#[tokio::test]
#[ignore = "requires running server and database"]
async fn test_cart_without_login_is_unauthorized() {
    let ctx = TestContext::new().await;

    let resp = Client::new().get(ctx.url("/cart")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "requires running server and database"]
async fn test_admin_cannot_use_cart() {
    let ctx = TestContext::new().await;
    let email = ctx.user(UserRole::Admin).await;
    let client = ctx.login(&email).await;

    let resp = client.get(ctx.url("/cart")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert!(resp.text().await.unwrap().ends_with(ACCESS_DENIED));
}

#[tokio::test]
#[ignore = "requires running server and database"]
async fn test_wrong_password_is_unauthorized() {
    let ctx = TestContext::new().await;
    let email = ctx.user(UserRole::Customer).await;

    let resp = Client::new()
        .post(ctx.url("/auth/login"))
        .json(&json!({"email": email, "password": "not the password"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "requires running server and database"]
async fn test_logout_ends_session() {
    let (ctx, client) = customer().await;

    let resp = client.post(ctx.url("/auth/logout")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = client.get(ctx.url("/cart")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Orders
// ============================================================================

#[tokio::test]
#[ignore = "requires running server and database"]
async fn test_checkout_empty_cart_is_not_acceptable() {
    let (ctx, client) = customer().await;

    let resp = client.post(ctx.url("/orders")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_ACCEPTABLE);
}

#[tokio::test]
#[ignore = "requires running server and database"]
async fn test_checkout_then_archive() {
    let (ctx, client) = customer().await;
    let scarf = ctx.product(2_500, 5).await;
    add(&ctx, &client, &json!({"product_id": scarf, "quantity": 2})).await;

    let resp = client.post(ctx.url("/orders")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let order = json_body(resp).await;
    assert_eq!(order["total_price"], "50.00");
    assert_eq!(order["status"], "PENDING");
    assert_eq!(order["items"][0]["quantity"], 2);

    // Checkout empties the cart but keeps the reservation.
    let cart = json_body(client.get(ctx.url("/cart")).send().await.unwrap()).await;
    assert_eq!(cart["items"], json!([]));
    assert_eq!(ctx.stock(scarf).await, 3);

    let orders = json_body(client.get(ctx.url("/orders")).send().await.unwrap()).await;
    assert_eq!(orders.as_array().unwrap().len(), 1);

    let order_id = order["id"].as_i64().unwrap();
    for _ in 0..2 {
        let resp = client
            .delete(ctx.url(&format!("/orders/{order_id}")))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    }

    let orders = json_body(client.get(ctx.url("/orders")).send().await.unwrap()).await;
    assert_eq!(orders, json!([]));
}

#[tokio::test]
#[ignore = "requires running server and database"]
async fn test_order_history_keeps_cart_order() {
    let (ctx, client) = customer().await;
    let scarf = ctx.product(2_500, 5).await;
    let socks = ctx.product(799, 5).await;

    // Higher id first, so insertion order differs from id order.
    add(&ctx, &client, &json!({"product_id": socks, "quantity": 1})).await;
    add(&ctx, &client, &json!({"product_id": scarf, "quantity": 1})).await;

    let placed = json_body(client.post(ctx.url("/orders")).send().await.unwrap()).await;
    let product_ids = |order: &Value| -> Vec<Value> {
        order["items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|item| item["product_id"].clone())
            .collect()
    };
    assert_eq!(product_ids(&placed), vec![json!(socks), json!(scarf)]);

    let orders = json_body(client.get(ctx.url("/orders")).send().await.unwrap()).await;
    assert_eq!(product_ids(&orders[0]), product_ids(&placed));
}

#[tokio::test]
#[ignore = "requires running server and database"]
async fn test_archive_foreign_order_is_not_acceptable() {
    let (ctx, owner) = customer().await;
    let scarf = ctx.product(2_500, 5).await;
    add(&ctx, &owner, &json!({"product_id": scarf, "quantity": 1})).await;
    let order = json_body(owner.post(ctx.url("/orders")).send().await.unwrap()).await;

    let stranger_email = ctx.user(UserRole::Customer).await;
    let stranger = ctx.login(&stranger_email).await;

    let resp = stranger
        .delete(ctx.url(&format!("/orders/{}", order["id"])))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_ACCEPTABLE);
}

// ============================================================================
// Products
// ============================================================================

#[tokio::test]
#[ignore = "requires running server and database"]
async fn test_product_lookup() {
    let ctx = TestContext::new().await;
    let id = ctx.product(1_000, 4).await;

    let resp = Client::new()
        .get(ctx.url(&format!("/products/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let product = json_body(resp).await;
    assert_eq!(product["price"], "10.00");
    assert_eq!(product["stock"], 4);

    let resp = Client::new()
        .get(ctx.url(&format!("/products/{}", i32::MAX)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
