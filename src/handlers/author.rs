//! Author handlers. Authors have no delete endpoint.

use super::parse_id;
use crate::error::{AppError, ErrorBody};
use crate::model::*;
use crate::pagination::PageRequest;
use crate::response::{success_many, success_one, success_one_ok, SuccessMany, SuccessOne};
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    response::IntoResponse,
    Json,
};
use std::collections::HashMap;

#[utoipa::path(
    post,
    operation_id = "create_author",
    path = "/api/v1/authors",
    tag = "authors",
    request_body = AuthorRequest,
    responses(
        (status = 201, description = "Author created", body = SuccessOne<CreatedId>),
        (status = 400, description = "Invalid body", body = ErrorBody)
    )
)]
pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<AuthorRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = body?;
    let created = state.authors.create(&req).await?;
    Ok(success_one(created))
}

#[utoipa::path(
    get,
    operation_id = "list_authors",
    path = "/api/v1/authors",
    tag = "authors",
    params(
        ("p" = Option<u32>, Query, description = "1-based page number (alias: pages)"),
        ("limit" = Option<u32>, Query, description = "Page size, at most 100"),
        ("sortBy" = Option<String>, Query, description = "id, name, created_at or updated_at"),
        ("direction" = Option<String>, Query, description = "asc or desc"),
        ("authorName" = Option<String>, Query, description = "Case-insensitive name substring")
    ),
    responses(
        (status = 200, description = "Page of authors", body = SuccessMany<Reference>),
        (status = 400, description = "Invalid paging parameters", body = ErrorBody)
    )
)]
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let page = PageRequest::from_params(&params, &AUTHOR_LIST)?;
    Ok(success_many(state.authors.list(&page).await?))
}

#[utoipa::path(
    get,
    operation_id = "read_author",
    path = "/api/v1/authors/{id}",
    tag = "authors",
    params(("id" = i64, Path, description = "Author id")),
    responses(
        (status = 200, description = "Author", body = SuccessOne<AuthorDetail>),
        (status = 404, description = "No live author with this id", body = ErrorBody)
    )
)]
pub async fn read(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    Ok(success_one_ok(state.authors.get(id).await?))
}

#[utoipa::path(
    put,
    operation_id = "update_author",
    path = "/api/v1/authors/{id}",
    tag = "authors",
    params(("id" = i64, Path, description = "Author id")),
    request_body = AuthorRequest,
    responses(
        (status = 200, description = "Updated author", body = SuccessOne<AuthorDetail>),
        (status = 400, description = "Invalid body", body = ErrorBody),
        (status = 404, description = "No live author with this id", body = ErrorBody)
    )
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    body: Result<Json<AuthorRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let Json(req) = body?;
    Ok(success_one_ok(state.authors.update(id, &req).await?))
}
