//! Property CRUD handlers: validate, build query, call the store, shape the envelope.

use crate::error::AppError;
use crate::model::{NewProperty, Property, PropertyId, PropertyPatch};
use crate::response::{
    success_created, success_message, success_one_ok, success_page, success_updated, Pagination,
};
use crate::service::query::{build_property_query, ListParams};
use crate::service::PropertyValidator;
use crate::state::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::Value;

/// Ids that are not UUIDs cannot exist, so they are reported as missing.
fn parse_id(id_str: &str) -> Result<PropertyId, AppError> {
    id_str.parse().map_err(|_| AppError::property_not_found())
}

fn body_value(body: Result<Json<Value>, JsonRejection>) -> Result<Value, AppError> {
    body.map(|Json(v)| v).map_err(|e| match e.status() {
        StatusCode::PAYLOAD_TOO_LARGE => AppError::PayloadTooLarge(e.body_text()),
        _ => AppError::BadRequest(e.body_text()),
    })
}

#[utoipa::path(
    post,
    path = "/properties",
    tag = "properties",
    request_body = NewProperty,
    responses(
        (status = 201, description = "Property created", body = Property),
        (status = 400, description = "Validation failed"),
    )
)]
pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let body = body_value(body)?;
    let new = PropertyValidator::validate_create(&body)?;
    let property = state.store.create(new).await?;
    tracing::info!(id = %property.id, "property created");
    Ok(success_created("Property created successfully", property))
}

#[utoipa::path(
    get,
    path = "/properties",
    tag = "properties",
    params(ListParams),
    responses(
        (status = 200, description = "Page of properties with pagination block", body = [Property]),
        (status = 400, description = "Malformed query"),
    )
)]
pub async fn list(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(params) = params.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let query = build_property_query(&params)?;
    let (records, total) = state.store.list(&query).await?;
    let pagination = Pagination {
        total,
        page: query.window.page,
        limit: query.window.limit,
        total_pages: query.window.total_pages(total),
    };
    Ok(success_page(records, pagination))
}

#[utoipa::path(
    get,
    path = "/properties/{id}",
    tag = "properties",
    params(("id" = String, Path, description = "Property id")),
    responses(
        (status = 200, description = "The property", body = Property),
        (status = 404, description = "Property not found"),
    )
)]
pub async fn read(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let property = state.store.get(&id).await?;
    Ok(success_one_ok(property))
}

#[utoipa::path(
    patch,
    path = "/properties/{id}",
    tag = "properties",
    params(("id" = String, Path, description = "Property id")),
    request_body = PropertyPatch,
    responses(
        (status = 200, description = "Property updated", body = Property),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Property not found"),
    )
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let body = body_value(body)?;
    let patch = PropertyValidator::validate_update(&body)?;
    let property = state.store.update(&id, patch).await?;
    tracing::info!(id = %property.id, "property updated");
    Ok(success_updated("Property updated successfully", property))
}

#[utoipa::path(
    delete,
    path = "/properties/{id}",
    tag = "properties",
    params(("id" = String, Path, description = "Property id")),
    responses(
        (status = 200, description = "Property deleted"),
        (status = 404, description = "Property not found"),
    )
)]
pub async fn delete(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    state.store.delete(&id).await?;
    tracing::info!(id = %id, "property deleted");
    Ok(success_message("Property deleted successfully"))
}

/// Fallback for unmatched routes and for unsupported methods on known paths.
pub async fn route_not_found() -> AppError {
    AppError::NotFound("Route not found".into())
}
