//! Category handlers.

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
    operation_id = "create_category",
    path = "/api/v1/categories",
    tag = "categories",
    request_body = CategoryRequest,
    responses(
        (status = 201, description = "Category created", body = SuccessOne<CategoryDetail>),
        (status = 400, description = "Invalid body", body = ErrorBody),
        (status = 409, description = "Code already used by a live category", body = ErrorBody)
    )
)]
pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<CategoryRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = body?;
    let created = state.categories.create(&req).await?;
    Ok(success_one(created))
}

#[utoipa::path(
    get,
    operation_id = "list_categories",
    path = "/api/v1/categories",
    tag = "categories",
    params(
        ("p" = Option<u32>, Query, description = "1-based page number (alias: pages)"),
        ("limit" = Option<u32>, Query, description = "Page size, at most 100"),
        ("sortBy" = Option<String>, Query, description = "id, code, name, created_at or updated_at"),
        ("direction" = Option<String>, Query, description = "asc or desc"),
        ("categoryName" = Option<String>, Query, description = "Case-insensitive name substring")
    ),
    responses(
        (status = 200, description = "Page of categories", body = SuccessMany<CategoryDetail>),
        (status = 400, description = "Invalid paging parameters", body = ErrorBody)
    )
)]
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let page = PageRequest::from_params(&params, &CATEGORY_LIST)?;
    Ok(success_many(state.categories.list(&page).await?))
}

#[utoipa::path(
    get,
    operation_id = "read_category",
    path = "/api/v1/categories/{id}",
    tag = "categories",
    params(("id" = i64, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category", body = SuccessOne<CategoryDetail>),
        (status = 404, description = "No live category with this id", body = ErrorBody)
    )
)]
pub async fn read(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    Ok(success_one_ok(state.categories.get(id).await?))
}

#[utoipa::path(
    put,
    operation_id = "update_category",
    path = "/api/v1/categories/{id}",
    tag = "categories",
    params(("id" = i64, Path, description = "Category id")),
    request_body = CategoryRequest,
    responses(
        (status = 200, description = "Updated category", body = SuccessOne<CategoryDetail>),
        (status = 400, description = "Invalid body", body = ErrorBody),
        (status = 404, description = "No live category with this id", body = ErrorBody),
        (status = 409, description = "Code already used by a live category", body = ErrorBody)
    )
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    body: Result<Json<CategoryRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let Json(req) = body?;
    Ok(success_one_ok(state.categories.update(id, &req).await?))
}

#[utoipa::path(
    delete,
    operation_id = "delete_category",
    path = "/api/v1/categories/{id}",
    tag = "categories",
    params(("id" = i64, Path, description = "Category id")),
    responses(
        (status = 204, description = "Category soft-deleted"),
        (status = 404, description = "No live category with this id", body = ErrorBody)
    )
)]
pub async fn delete(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    state.categories.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
