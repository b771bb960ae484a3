//! OpenAPI document for the catalog, served at /api/v1/openapi.json.

use crate::error::{ErrorBody, ErrorDetail};
use crate::handlers::{author, book, category, hello, publisher};
use crate::model::*;
use crate::response::PageMeta;
use axum::Json;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(title = "Book Catalog API", description = "Authors, publishers, categories and books"),
    paths(
        author::create,
        author::list,
        author::read,
        author::update,
        publisher::create,
        publisher::list,
        publisher::read,
        publisher::update,
        publisher::delete,
        category::create,
        category::list,
        category::read,
        category::update,
        category::delete,
        book::create,
        book::list,
        book::read,
        book::update,
        book::delete,
        book::add_authors,
        book::remove_authors,
        hello::hello,
    ),
    components(schemas(
        ErrorBody,
        ErrorDetail,
        PageMeta,
        CreatedId,
        Reference,
        AuthorRequest,
        AuthorDetail,
        PublisherRequest,
        PublisherDetail,
        CategoryRequest,
        CategoryDetail,
        BookRequest,
        BookAuthorsRequest,
        BookDetail,
    )),
    tags(
        (name = "authors"),
        (name = "publishers"),
        (name = "categories"),
        (name = "books", description = "Books with their publisher and authors"),
        (name = "hello")
    )
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
