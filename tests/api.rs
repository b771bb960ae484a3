//! HTTP tests against the full router over the in-memory store.

mod common;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use book_catalog::{build_router, AppState, MemoryStore};
use common::{create, send};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt; // for .oneshot()

fn app() -> Router {
    build_router(AppState::new(Arc::new(MemoryStore::new())), 1024 * 1024)
}

#[tokio::test]
async fn health_and_hello() {
    let app = app();
    let (status, json) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");

    assert!(json.get("store").is_none());

    let (status, json) = send(&app, Method::GET, "/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({"status": "ok", "store": "ok"}));

    let (status, json) = send(&app, Method::GET, "/version", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["name"], "book-catalog");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));

    let (status, json) = send(&app, Method::GET, "/api/v1/hello", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({"message": "Hello, World!"}));
}

#[tokio::test]
async fn author_with_empty_name_is_rejected() {
    let app = app();
    let (status, json) = send(&app, Method::POST, "/api/v1/authors", Some(json!({"name": ""}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "validation_error");

    // Missing fields default to empty and fail the same way.
    let (status, _) = send(&app, Method::POST, "/api/v1/authors", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, json) = send(&app, Method::GET, "/api/v1/authors", None).await;
    assert_eq!(json["meta"]["total"], 0);
}

#[tokio::test]
async fn author_create_then_get() {
    let app = app();
    let id = create(
        &app,
        "/api/v1/authors",
        json!({"name": "Ursula K. Le Guin", "description": "Earthsea"}),
    )
    .await;
    assert!(id > 0);

    let (status, json) = send(&app, Method::GET, &format!("/api/v1/authors/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["id"], id);
    assert_eq!(json["data"]["name"], "Ursula K. Le Guin");
    assert_eq!(json["data"]["description"], "Earthsea");
}

#[tokio::test]
async fn update_missing_author_is_not_found() {
    let app = app();
    let (status, json) = send(
        &app,
        Method::PUT,
        "/api/v1/authors/999",
        Some(json!({"name": "Nobody"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"]["code"], "not_found");
}

#[tokio::test]
async fn invalid_ids_and_bodies_are_bad_requests() {
    let app = app();
    for uri in ["/api/v1/authors/abc", "/api/v1/authors/0", "/api/v1/books/-3"] {
        let (status, _) = send(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
    }

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/authors")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::POST, "/api/v1/books", Some(json!({"pages": "many"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn bad_paging_parameters_are_rejected() {
    let app = app();
    for query in ["p=0", "limit=0", "limit=-2", "sortBy=password", "direction=sideways"] {
        let (status, json) = send(&app, Method::GET, &format!("/api/v1/books?{}", query), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", query);
        assert_eq!(json["error"]["code"], "validation_error");
    }

    let (status, json) = send(&app, Method::GET, "/api/v1/publishers?limit=500", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["meta"]["limit"], 100);
}

#[tokio::test]
async fn book_with_unknown_publisher_fails() {
    let app = app();
    let (status, json) = send(
        &app,
        Method::POST,
        "/api/v1/books",
        Some(json!({"title": "Dune", "pages": 412, "year": 1965, "publisher_id": 77})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "validation_error");
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = app();
    let (status, json) = send(&app, Method::GET, "/api/v1/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["paths"]["/api/v1/books/{id}"].is_object());
}

#[tokio::test]
async fn author_list_pages_and_filters() {
    common::author_list_pages_and_filters(&app()).await;
}

#[tokio::test]
async fn filter_keeps_sharp_s() {
    common::filter_keeps_sharp_s(&app()).await;
}

#[tokio::test]
async fn book_update_replaces_authors() {
    common::book_update_replaces_authors(&app()).await;
}

#[tokio::test]
async fn failed_book_update_keeps_previous_authors() {
    common::failed_book_update_keeps_previous_authors(&app()).await;
}

#[tokio::test]
async fn book_author_endpoints_add_and_remove() {
    common::book_author_endpoints_add_and_remove(&app()).await;
}

#[tokio::test]
async fn publisher_soft_delete() {
    common::publisher_soft_delete(&app()).await;
}

#[tokio::test]
async fn category_codes_conflict() {
    common::category_codes_conflict(&app()).await;
}

#[tokio::test]
async fn book_delete_and_list() {
    common::book_delete_and_list(&app()).await;
}
