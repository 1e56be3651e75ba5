//! Product listing and creation over HTTP.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use serde_json::{Value, json};

use shop_api::db::DocumentStore;
use shop_core::RawDocument;
use shop_integration_tests::{Failure, TestApp};

fn lamp() -> Value {
    json!({
        "title": "Brass Desk Lamp",
        "description": "Adjustable arm",
        "price": 49.99,
        "category": "home",
        "image": "https://cdn.example.com/lamp.jpg"
    })
}

async fn seed_catalog(app: &TestApp) {
    for product in [
        lamp(),
        json!({"title": "Floor LAMP", "price": 120, "category": "home", "in_stock": false}),
        json!({"title": "Chef Knife", "price": 35.5, "category": "kitchen"}),
    ] {
        let (status, _) = app.post_json("/products", &product).await;
        assert_eq!(status, StatusCode::OK);
    }
}

fn titles(body: &Value) -> Vec<&str> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn test_create_returns_id_and_lists_product() {
    let app = TestApp::with_memory_store();

    let (status, id) = app.post_json("/products", &lamp()).await;
    assert_eq!(status, StatusCode::OK);
    let id = id.as_str().unwrap().to_string();
    assert_eq!(id.len(), 24);

    let (status, body) = app.get("/products").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([{
            "id": id,
            "title": "Brass Desk Lamp",
            "description": "Adjustable arm",
            "price": 49.99,
            "category": "home",
            "image": "https://cdn.example.com/lamp.jpg",
            "in_stock": true
        }])
    );
}

#[tokio::test]
async fn test_created_document_is_timestamped() {
    let app = TestApp::with_memory_store();
    app.post_json("/products", &lamp()).await;

    let docs = app
        .memory()
        .find("product", &shop_api::db::Filter::new())
        .await
        .unwrap();
    assert_eq!(docs.len(), 1);
    assert!(docs[0].contains("created_at"));
    assert!(docs[0].contains("updated_at"));

    // Timestamps are not part of the output shape
    let (_, body) = app.get("/products").await;
    assert!(body[0].get("created_at").is_none());
}

#[tokio::test]
async fn test_filter_by_category() {
    let app = TestApp::with_memory_store();
    seed_catalog(&app).await;

    let (status, body) = app.get("/products?category=home").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&body), ["Brass Desk Lamp", "Floor LAMP"]);

    let (_, body) = app.get("/products?category=Home").await;
    assert!(titles(&body).is_empty());
}

#[tokio::test]
async fn test_search_is_case_insensitive_substring() {
    let app = TestApp::with_memory_store();
    seed_catalog(&app).await;

    let (_, body) = app.get("/products?q=lamp").await;
    assert_eq!(titles(&body), ["Brass Desk Lamp", "Floor LAMP"]);

    let (_, body) = app.get("/products?category=home&q=floor").await;
    assert_eq!(titles(&body), ["Floor LAMP"]);
}

#[tokio::test]
async fn test_empty_query_params_are_ignored() {
    let app = TestApp::with_memory_store();
    seed_catalog(&app).await;

    let (_, body) = app.get("/products?category=&q=").await;
    assert_eq!(titles(&body).len(), 3);
}

#[tokio::test]
async fn test_search_treats_pattern_characters_literally() {
    let app = TestApp::with_memory_store();
    seed_catalog(&app).await;
    app.post_json(
        "/products",
        &json!({"title": "Lamp (2-pack)", "price": 80, "category": "home"}),
    )
    .await;

    let (_, body) = app.get("/products?q=%282-pack%29").await;
    assert_eq!(titles(&body), ["Lamp (2-pack)"]);

    let (_, body) = app.get("/products?q=.*").await;
    assert!(titles(&body).is_empty());
}

#[tokio::test]
async fn test_validation_failure_is_422_with_field_details() {
    let app = TestApp::with_memory_store();

    let (status, body) = app
        .post_json("/products", &json!({"title": "", "price": -1}))
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let fields: Vec<&str> = body["detail"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"title"));
    assert!(fields.contains(&"price"));
    assert!(fields.contains(&"category"));
    assert_eq!(app.memory().count("product").await, 0);
}

#[tokio::test]
async fn test_malformed_json_is_400() {
    let app = TestApp::with_memory_store();

    let (status, body) = app.post_raw("/products", "{\"title\": ").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn test_malformed_stored_documents_are_skipped() {
    let app = TestApp::with_memory_store();
    app.post_json("/products", &lamp()).await;
    app.memory()
        .insert(
            "product",
            RawDocument::new().with("title", "No price").with("category", "misc"),
        )
        .await
        .unwrap();

    let (status, body) = app.get("/products").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&body), ["Brass Desk Lamp"]);
}

#[tokio::test]
async fn test_legacy_documents_get_defaults() {
    let app = TestApp::with_memory_store();
    app.memory()
        .insert(
            "product",
            RawDocument::new()
                .with("title", "Old Stock")
                .with("price", 3_i64)
                .with("category", "misc"),
        )
        .await
        .unwrap();

    let (_, body) = app.get("/products").await;
    assert_eq!(body[0]["in_stock"], json!(true));
    assert_eq!(body[0]["description"], Value::Null);
    assert_eq!(body[0]["price"], json!(3.0));
}

#[tokio::test]
async fn test_without_store_lists_empty_and_create_fails() {
    let app = TestApp::without_store();

    let (status, body) = app.get("/products").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, body) = app.post_json("/products", &lamp()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["detail"], "Database not configured");
}

#[tokio::test]
async fn test_without_store_still_validates_first() {
    let app = TestApp::without_store();

    let (status, _) = app.post_json("/products", &json!({})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_unreachable_store_degrades_listing() {
    let app = TestApp::with_failing_store(Failure::Unreachable);

    let (status, body) = app.get("/products").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, body) = app.post_json("/products", &lamp()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["detail"], "Internal server error");
}

#[tokio::test]
async fn test_corrupt_store_fails_listing() {
    let app = TestApp::with_failing_store(Failure::Corrupt);

    let (status, _) = app.get("/products").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}
