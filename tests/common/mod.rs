//! Request helpers and catalog scenarios replayed against every store backend.
#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt; // for .oneshot()

pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(v) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(v.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

pub async fn create(app: &Router, uri: &str, body: Value) -> i64 {
    let (status, json) = send(app, Method::POST, uri, Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{}", json);
    json["data"]["id"].as_i64().unwrap()
}

pub async fn author(app: &Router, name: &str) -> i64 {
    create(app, "/api/v1/authors", json!({"name": name, "description": ""})).await
}

pub async fn publisher(app: &Router, name: &str) -> i64 {
    create(app, "/api/v1/publishers", json!({"name": name})).await
}

pub fn author_names(book: &Value) -> Vec<String> {
    book["authors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["name"].as_str().unwrap().to_string())
        .collect()
}

fn names(list: &Value) -> Vec<String> {
    list["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["name"].as_str().unwrap().to_string())
        .collect()
}

pub async fn author_list_pages_and_filters(app: &Router) {
    for name in ["Tolkien", "Herbert", "Tolstoy"] {
        author(app, name).await;
    }

    let (status, json) = send(app, Method::GET, "/api/v1/authors?limit=2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"].as_array().unwrap().len(), 2);
    assert_eq!(json["meta"], json!({"page": 1, "limit": 2, "total": 3, "total_pages": 2}));
    // List items are references only.
    assert!(json["data"][0].get("description").is_none());

    let (_, json) = send(app, Method::GET, "/api/v1/authors?authorName=tol&sortBy=name&direction=DESC", None).await;
    assert_eq!(names(&json), vec!["Tolstoy", "Tolkien"]);

    let (_, json) = send(app, Method::GET, "/api/v1/authors?p=2&limit=2", None).await;
    assert_eq!(names(&json), vec!["Tolstoy"]);

    // Wildcards in the term are literal.
    let (_, json) = send(app, Method::GET, "/api/v1/authors?authorName=%25", None).await;
    assert_eq!(json["meta"]["total"], 0);
}

/// `ß` has no single-char upper case, so it only matches itself.
pub async fn filter_keeps_sharp_s(app: &Router) {
    author(app, "Straße").await;
    author(app, "Strasse").await;

    let (_, json) = send(app, Method::GET, "/api/v1/authors?authorName=%C3%9F", None).await;
    assert_eq!(names(&json), vec!["Straße"]);

    let (_, json) = send(app, Method::GET, "/api/v1/authors?authorName=STRA%C3%9F", None).await;
    assert_eq!(names(&json), vec!["Straße"]);

    let (_, json) = send(app, Method::GET, "/api/v1/authors?authorName=ss", None).await;
    assert_eq!(names(&json), vec!["Strasse"]);
}

pub async fn book_update_replaces_authors(app: &Router) {
    let p = publisher(app, "Chilton").await;
    let a = author(app, "A").await;
    let b = author(app, "B").await;
    let c = author(app, "C").await;
    let book = create(
        app,
        "/api/v1/books",
        json!({"title": "Dune", "pages": 412, "year": 1965, "publisher_id": p, "author_ids": [a, b]}),
    )
    .await;

    let (status, json) = send(
        app,
        Method::PUT,
        &format!("/api/v1/books/{}", book),
        Some(json!({"title": "Dune", "pages": 412, "year": 1965, "publisher_id": p, "author_ids": [b, c]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(author_names(&json["data"]), vec!["B", "C"]);
    assert_eq!(json["data"]["publisher"]["name"], "Chilton");

    let (_, json) = send(app, Method::GET, &format!("/api/v1/books/{}", book), None).await;
    assert_eq!(author_names(&json["data"]), vec!["B", "C"]);

    let (status, _) = send(
        app,
        Method::PUT,
        &format!("/api/v1/books/{}", book + 100),
        Some(json!({"title": "Dune", "pages": 412, "year": 1965, "publisher_id": p})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

pub async fn failed_book_update_keeps_previous_authors(app: &Router) {
    let p = publisher(app, "Ace").await;
    let a = author(app, "A").await;
    let book = create(
        app,
        "/api/v1/books",
        json!({"title": "Neuromancer", "pages": 271, "year": 1984, "publisher_id": p, "author_ids": [a]}),
    )
    .await;

    let (status, json) = send(
        app,
        Method::PUT,
        &format!("/api/v1/books/{}", book),
        Some(json!({"title": "Changed", "pages": 271, "year": 1984, "publisher_id": p, "author_ids": [a, 4040]})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"]["message"].as_str().unwrap().contains("4040"));

    let (_, json) = send(app, Method::GET, &format!("/api/v1/books/{}", book), None).await;
    assert_eq!(json["data"]["title"], "Neuromancer");
    assert_eq!(author_names(&json["data"]), vec!["A"]);
}

pub async fn book_author_endpoints_add_and_remove(app: &Router) {
    let p = publisher(app, "Ace").await;
    let a = author(app, "A").await;
    let b = author(app, "B").await;
    let book = create(
        app,
        "/api/v1/books",
        json!({"title": "Anthology", "pages": 300, "year": 1990, "publisher_id": p}),
    )
    .await;
    let uri = format!("/api/v1/books/{}/authors", book);

    let (status, json) = send(app, Method::POST, &uri, Some(json!({"author_ids": [b, a, a]}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(author_names(&json["data"]), vec!["A", "B"]);

    let (status, json) = send(app, Method::DELETE, &uri, Some(json!({"author_ids": [a, 999]}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(author_names(&json["data"]), vec!["B"]);

    let (status, _) = send(app, Method::POST, &uri, Some(json!({"author_ids": [999]}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

pub async fn publisher_soft_delete(app: &Router) {
    let p = publisher(app, "Gollancz").await;
    let keep = publisher(app, "Tor").await;
    let book = create(
        app,
        "/api/v1/books",
        json!({"title": "Hyperion", "pages": 482, "year": 1989, "publisher_id": p}),
    )
    .await;

    let (status, json) = send(app, Method::DELETE, &format!("/api/v1/publishers/{}", p), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(json, Value::Null);

    let (status, _) = send(app, Method::GET, &format!("/api/v1/publishers/{}", p), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(app, Method::DELETE, &format!("/api/v1/publishers/{}", p), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, json) = send(app, Method::GET, "/api/v1/publishers", None).await;
    assert_eq!(json["meta"]["total"], 1);
    assert_eq!(json["data"][0]["id"], keep);

    // The book survives but no longer reports the publisher.
    let (status, json) = send(app, Method::GET, &format!("/api/v1/books/{}", book), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["publisher"], Value::Null);
}

pub async fn category_codes_conflict(app: &Router) {
    let (status, json) = send(
        app,
        Method::POST,
        "/api/v1/categories",
        Some(json!({"code": "SF", "name": "Science fiction", "description": "Rockets"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["data"]["code"], "SF");
    let id = json["data"]["id"].as_i64().unwrap();

    let (status, json) = send(
        app,
        Method::POST,
        "/api/v1/categories",
        Some(json!({"code": "SF", "name": "Duplicate"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"]["code"], "conflict");

    let (_, json) = send(app, Method::GET, "/api/v1/categories?categoryName=science", None).await;
    assert_eq!(json["data"][0]["description"], "Rockets");

    let (status, _) = send(app, Method::DELETE, &format!("/api/v1/categories/{}", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(
        app,
        Method::POST,
        "/api/v1/categories",
        Some(json!({"code": "SF", "name": "Again"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

pub async fn book_delete_and_list(app: &Router) {
    let p = publisher(app, "Ace").await;
    let first = create(
        app,
        "/api/v1/books",
        json!({"title": "Alpha", "pages": 10, "year": 2000, "publisher_id": p}),
    )
    .await;
    create(
        app,
        "/api/v1/books",
        json!({"title": "Beta", "pages": 20, "year": 2001, "publisher_id": p}),
    )
    .await;

    let (status, _) = send(app, Method::DELETE, &format!("/api/v1/books/{}", first), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, json) = send(app, Method::GET, "/api/v1/books?sortBy=pages&direction=desc", None).await;
    assert_eq!(json["meta"]["total"], 1);
    assert_eq!(json["data"][0]["title"], "Beta");
    assert_eq!(json["data"][0]["publisher"]["id"], p);
}
