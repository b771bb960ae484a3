//! Book handlers, including the author association endpoints.

use super::parse_id;
use crate::error::{AppError, ErrorBody};
use crate::model::*;
use crate::pagination::PageRequest;
use crate::response::{success_many, success_one, success_one_ok, SuccessMany, SuccessOne};
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::collections::HashMap;

#[utoipa::path(
    post,
    operation_id = "create_book",
    path = "/api/v1/books",
    tag = "books",
    request_body = BookRequest,
    responses(
        (status = 201, description = "Book created", body = SuccessOne<CreatedId>),
        (status = 400, description = "Invalid body, unknown publisher or author", body = ErrorBody)
    )
)]
pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<BookRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = body?;
    Ok(success_one(state.books.create(&req).await?))
}

#[utoipa::path(
    get,
    operation_id = "list_books",
    path = "/api/v1/books",
    tag = "books",
    params(
        ("p" = Option<u32>, Query, description = "1-based page number (alias: pages)"),
        ("limit" = Option<u32>, Query, description = "Page size, at most 100"),
        ("sortBy" = Option<String>, Query, description = "id, title, pages, year, created_at or updated_at"),
        ("direction" = Option<String>, Query, description = "asc or desc"),
        ("title" = Option<String>, Query, description = "Case-insensitive title substring")
    ),
    responses(
        (status = 200, description = "Page of books", body = SuccessMany<BookDetail>),
        (status = 400, description = "Invalid paging parameters", body = ErrorBody)
    )
)]
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let page = PageRequest::from_params(&params, &BOOK_LIST)?;
    Ok(success_many(state.books.list(&page).await?))
}

#[utoipa::path(
    get,
    operation_id = "read_book",
    path = "/api/v1/books/{id}",
    tag = "books",
    params(("id" = i64, Path, description = "Book id")),
    responses(
        (status = 200, description = "Book with publisher and authors", body = SuccessOne<BookDetail>),
        (status = 404, description = "No live book with this id", body = ErrorBody)
    )
)]
pub async fn read(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    Ok(success_one_ok(state.books.get(id).await?))
}

#[utoipa::path(
    put,
    operation_id = "update_book",
    path = "/api/v1/books/{id}",
    tag = "books",
    params(("id" = i64, Path, description = "Book id")),
    request_body = BookRequest,
    responses(
        (status = 200, description = "Updated book; author_ids replaced the author set", body = SuccessOne<BookDetail>),
        (status = 400, description = "Invalid body, unknown publisher or author", body = ErrorBody),
        (status = 404, description = "No live book with this id", body = ErrorBody)
    )
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    body: Result<Json<BookRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let Json(req) = body?;
    Ok(success_one_ok(state.books.update(id, &req).await?))
}

#[utoipa::path(
    delete,
    operation_id = "delete_book",
    path = "/api/v1/books/{id}",
    tag = "books",
    params(("id" = i64, Path, description = "Book id")),
    responses(
        (status = 204, description = "Book soft-deleted"),
        (status = 404, description = "No live book with this id", body = ErrorBody)
    )
)]
pub async fn delete(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    state.books.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    operation_id = "add_book_authors",
    path = "/api/v1/books/{id}/authors",
    tag = "books",
    params(("id" = i64, Path, description = "Book id")),
    request_body = BookAuthorsRequest,
    responses(
        (status = 200, description = "Book after attaching the authors", body = SuccessOne<BookDetail>),
        (status = 400, description = "Unknown author", body = ErrorBody),
        (status = 404, description = "No live book with this id", body = ErrorBody)
    )
)]
pub async fn add_authors(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    body: Result<Json<BookAuthorsRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let Json(req) = body?;
    Ok(success_one_ok(state.books.add_authors(id, &req).await?))
}

#[utoipa::path(
    delete,
    operation_id = "remove_book_authors",
    path = "/api/v1/books/{id}/authors",
    tag = "books",
    params(("id" = i64, Path, description = "Book id")),
    request_body = BookAuthorsRequest,
    responses(
        (status = 200, description = "Book after detaching the authors", body = SuccessOne<BookDetail>),
        (status = 404, description = "No live book with this id", body = ErrorBody)
    )
)]
pub async fn remove_authors(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    body: Result<Json<BookAuthorsRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let Json(req) = body?;
    Ok(success_one_ok(state.books.remove_authors(id, &req).await?))
}
