//! Handler tests for the Products domain
//!
//! These run the products router against the in-memory repository:
//! - Request deserialization and validation
//! - Response bodies and status codes
//! - Error body shape
//!
//! Routing under `/api`, CORS and the fallback handler belong to the app
//! and are not covered here.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use domain_products::*;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::time::Duration;
use tower::ServiceExt; // For oneshot()

fn app() -> Router {
    handlers::router(ProductService::new(InMemoryProductRepository::new()))
}

async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn create(app: &Router, body: Value) -> Product {
    let response = app
        .clone()
        .oneshot(json_request("POST", "/", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    json_body(response.into_body()).await
}

#[tokio::test]
async fn test_create_product_returns_201() {
    let app = app();

    let product = create(
        &app,
        json!({
            "name": "Widget",
            "description": "A widget",
            "price": 9.99,
            "stock": 5,
            "imageUrl": "http://img/widget.png",
            "category": "tools"
        }),
    )
    .await;

    assert!(product.id > 0);
    assert_eq!(product.name, "Widget");
    assert_eq!(product.price.to_string(), "9.99");
    assert_eq!(product.image_url.as_deref(), Some("http://img/widget.png"));
    assert_eq!(product.created_at, product.updated_at);
}

#[tokio::test]
async fn test_create_ignores_client_id_and_defaults_stock() {
    let app = app();

    let product = create(&app, json!({"id": 500, "name": "Widget", "price": 1})).await;

    assert_ne!(product.id, 500);
    assert_eq!(product.stock, 0);
}

#[tokio::test]
async fn test_create_invalid_returns_validation_details() {
    let response = app()
        .oneshot(json_request("POST", "/", json!({"name": "", "price": 0})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["status"], 400);
    assert_eq!(body["error"], "Validation Failed");
    assert_eq!(body["details"]["name"], "Product name is required");
    assert_eq!(body["details"]["price"], "Price must be greater than 0");
}

#[tokio::test]
async fn test_create_null_name_reports_every_field() {
    let response = app()
        .oneshot(json_request(
            "POST",
            "/",
            json!({"name": null, "price": -1, "stock": null}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "Validation Failed");
    assert_eq!(body["details"]["name"], "Product name is required");
    assert_eq!(body["details"]["price"], "Price must be greater than 0");
}

#[tokio::test]
async fn test_create_null_price_is_required() {
    let response = app()
        .oneshot(json_request("POST", "/", json!({"name": "Widget", "price": null})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["details"]["price"], "Price is required");
}

#[tokio::test]
async fn test_price_is_written_with_two_decimals() {
    let response = app()
        .oneshot(json_request("POST", "/", json!({"name": "Widget", "price": 10})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains(r#""price":10.00"#), "{text}");
}

#[tokio::test]
async fn test_create_missing_price_and_long_image_url() {
    let response = app()
        .oneshot(json_request(
            "POST",
            "/",
            json!({"name": "Widget", "imageUrl": "x".repeat(256)}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["details"]["price"], "Price is required");
    assert_eq!(
        body["details"]["imageUrl"],
        "Image URL must not exceed 255 characters"
    );
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from("{\"name\": "))
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "Bad Request");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_get_missing_product_returns_404() {
    let response = app().oneshot(get("/999")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["status"], 404);
    assert_eq!(body["error"], "Not Found");
    assert_eq!(body["message"], "Product not found: 999");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_non_numeric_id_is_bad_request() {
    let response = app().oneshot(get("/abc")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_and_delete_missing_return_404() {
    let app = app();

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/42",
            json!({"name": "Widget", "price": 1.5}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/42")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_invalid_body_on_missing_id_is_400() {
    let response = app()
        .oneshot(json_request("PUT", "/42", json!({"name": "", "price": 1})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_price_range_is_inclusive() {
    let app = app();
    for (name, price) in [("low", 9.99), ("min", 10.0), ("max", 50.0), ("high", 50.01)] {
        create(&app, json!({"name": name, "price": price})).await;
    }

    let response = app
        .oneshot(get("/price?min=10&max=50"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let products: Vec<Product> = json_body(response.into_body()).await;
    let names: Vec<_> = products.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["min", "max"]);
}

#[tokio::test]
async fn test_price_range_requires_bounds() {
    let response = app().oneshot(get("/price?min=10")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app()
        .oneshot(get("/price?min=ten&max=50"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_search_category_and_stock_queries() {
    let app = app();
    create(
        &app,
        json!({"name": "Blue Widget", "price": 12, "category": "tools", "stock": 2}),
    )
    .await;
    create(
        &app,
        json!({"name": "Gadget", "price": 30, "category": "tools"}),
    )
    .await;
    create(
        &app,
        json!({"name": "Red Widget", "price": 40, "category": "toys", "stock": 9}),
    )
    .await;

    let response = app.clone().oneshot(get("/search?name=Widget")).await.unwrap();
    let found: Vec<Product> = json_body(response.into_body()).await;
    assert_eq!(found.len(), 2);

    let response = app.clone().oneshot(get("/search?name=widget")).await.unwrap();
    let found: Vec<Product> = json_body(response.into_body()).await;
    assert!(found.is_empty());

    let response = app.clone().oneshot(get("/search")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(get("/category/tools"))
        .await
        .unwrap();
    let tools: Vec<Product> = json_body(response.into_body()).await;
    assert_eq!(tools.len(), 2);

    let response = app
        .clone()
        .oneshot(get("/category/tools/price?min=20&max=35"))
        .await
        .unwrap();
    let tools: Vec<Product> = json_body(response.into_body()).await;
    assert_eq!(tools.len(), 1);
    assert_eq!(tools[0].name, "Gadget");

    let response = app.clone().oneshot(get("/in-stock")).await.unwrap();
    let stocked: Vec<Product> = json_body(response.into_body()).await;
    assert_eq!(stocked.len(), 2);

    let response = app.oneshot(get("/in-stock?min=2")).await.unwrap();
    let stocked: Vec<Product> = json_body(response.into_body()).await;
    assert_eq!(stocked.len(), 1);
    assert_eq!(stocked[0].name, "Red Widget");
}

#[tokio::test]
async fn test_widget_lifecycle() {
    let app = app();

    let created = create(
        &app,
        json!({"name": "Widget", "price": 9.99, "stock": 5}),
    )
    .await;
    assert_eq!(created.created_at, created.updated_at);
    let uri = format!("/{}", created.id);

    let response = app.clone().oneshot(get(&uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let fetched: Product = json_body(response.into_body()).await;
    assert_eq!(fetched, created);

    tokio::time::sleep(Duration::from_millis(5)).await;
    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &uri,
            json!({"name": "Widget2", "price": 19.99, "stock": 3}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated: Product = json_body(response.into_body()).await;
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.name, "Widget2");
    assert_eq!(updated.price.to_string(), "19.99");
    assert_eq!(updated.stock, 3);
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at > created.updated_at);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(&uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert!(bytes.is_empty());

    let response = app.oneshot(get(&uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_put_with_null_fields_clears_them() {
    let app = app();

    let created = create(
        &app,
        json!({
            "name": "Widget",
            "description": "A widget",
            "price": 9.99,
            "stock": 5,
            "imageUrl": "http://img/widget.png",
            "category": "tools"
        }),
    )
    .await;

    let response = app
        .oneshot(json_request(
            "PUT",
            &format!("/{}", created.id),
            json!({
                "name": "Widget",
                "price": 5,
                "description": null,
                "stock": null,
                "imageUrl": null,
                "category": null
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let updated: Product = json_body(response.into_body()).await;
    assert_eq!(updated.price.to_string(), "5.00");
    assert_eq!(updated.stock, 0);
    assert!(updated.description.is_none());
    assert!(updated.image_url.is_none());
    assert!(updated.category.is_none());
}
