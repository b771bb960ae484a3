//! Catalog routes, mounted under /api/v1.

use crate::handlers::{author, book, category, hello, publisher};
use crate::openapi::openapi_json;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn catalog_routes(state: AppState) -> Router {
    Router::new()
        .route("/authors", get(author::list).post(author::create))
        .route("/authors/:id", get(author::read).put(author::update))
        .route("/publishers", get(publisher::list).post(publisher::create))
        .route(
            "/publishers/:id",
            get(publisher::read).put(publisher::update).delete(publisher::delete),
        )
        .route("/categories", get(category::list).post(category::create))
        .route(
            "/categories/:id",
            get(category::read).put(category::update).delete(category::delete),
        )
        .route("/books", get(book::list).post(book::create))
        .route(
            "/books/:id",
            get(book::read).put(book::update).delete(book::delete),
        )
        .route(
            "/books/:id/authors",
            axum::routing::post(book::add_authors).delete(book::remove_authors),
        )
        .route("/hello", get(hello::hello))
        .route("/openapi.json", get(openapi_json))
        .with_state(state)
}
