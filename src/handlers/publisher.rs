//! Publisher handlers.

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
    operation_id = "create_publisher",
    path = "/api/v1/publishers",
    tag = "publishers",
    request_body = PublisherRequest,
    responses(
        (status = 201, description = "Publisher created", body = SuccessOne<CreatedId>),
        (status = 400, description = "Invalid body", body = ErrorBody)
    )
)]
pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<PublisherRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = body?;
    let created = state.publishers.create(&req).await?;
    Ok(success_one(created))
}

#[utoipa::path(
    get,
    operation_id = "list_publishers",
    path = "/api/v1/publishers",
    tag = "publishers",
    params(
        ("p" = Option<u32>, Query, description = "1-based page number (alias: pages)"),
        ("limit" = Option<u32>, Query, description = "Page size, at most 100"),
        ("sortBy" = Option<String>, Query, description = "id, name, created_at or updated_at"),
        ("direction" = Option<String>, Query, description = "asc or desc"),
        ("publisherName" = Option<String>, Query, description = "Case-insensitive name substring")
    ),
    responses(
        (status = 200, description = "Page of publishers", body = SuccessMany<Reference>),
        (status = 400, description = "Invalid paging parameters", body = ErrorBody)
    )
)]
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let page = PageRequest::from_params(&params, &PUBLISHER_LIST)?;
    Ok(success_many(state.publishers.list(&page).await?))
}

#[utoipa::path(
    get,
    operation_id = "read_publisher",
    path = "/api/v1/publishers/{id}",
    tag = "publishers",
    params(("id" = i64, Path, description = "Publisher id")),
    responses(
        (status = 200, description = "Publisher", body = SuccessOne<PublisherDetail>),
        (status = 404, description = "No live publisher with this id", body = ErrorBody)
    )
)]
pub async fn read(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    Ok(success_one_ok(state.publishers.get(id).await?))
}

#[utoipa::path(
    put,
    operation_id = "update_publisher",
    path = "/api/v1/publishers/{id}",
    tag = "publishers",
    params(("id" = i64, Path, description = "Publisher id")),
    request_body = PublisherRequest,
    responses(
        (status = 200, description = "Updated publisher", body = SuccessOne<PublisherDetail>),
        (status = 400, description = "Invalid body", body = ErrorBody),
        (status = 404, description = "No live publisher with this id", body = ErrorBody)
    )
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    body: Result<Json<PublisherRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let Json(req) = body?;
    Ok(success_one_ok(state.publishers.update(id, &req).await?))
}

#[utoipa::path(
    delete,
    operation_id = "delete_publisher",
    path = "/api/v1/publishers/{id}",
    tag = "publishers",
    params(("id" = i64, Path, description = "Publisher id")),
    responses(
        (status = 204, description = "Publisher soft-deleted"),
        (status = 404, description = "No live publisher with this id", body = ErrorBody)
    )
)]
pub async fn delete(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    state.publishers.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
