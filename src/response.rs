//! Standard response envelope helpers.

use crate::error::FieldError;
use axum::{http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u64,
}

/// `{ status, message?, data?, pagination? }` wrapper for every successful response.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub status: ResponseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl<T> Envelope<T> {
    fn success(message: Option<String>, data: Option<T>) -> Self {
        Envelope {
            status: ResponseStatus::Success,
            message,
            data,
            pagination: None,
        }
    }
}

/// Error body as seen by a client. Rendered by `crate::error::ErrorReport`.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    pub status_code: u16,
    pub message: String,
    #[serde(default)]
    pub errors: Vec<FieldError>,
    pub stack: Option<String>,
}

pub fn success_created<T: Serialize>(message: &str, data: T) -> (StatusCode, Json<Envelope<T>>) {
    (
        StatusCode::CREATED,
        Json(Envelope::success(Some(message.to_string()), Some(data))),
    )
}

pub fn success_one_ok<T: Serialize>(data: T) -> (StatusCode, Json<Envelope<T>>) {
    (StatusCode::OK, Json(Envelope::success(None, Some(data))))
}

pub fn success_updated<T: Serialize>(message: &str, data: T) -> (StatusCode, Json<Envelope<T>>) {
    (
        StatusCode::OK,
        Json(Envelope::success(Some(message.to_string()), Some(data))),
    )
}

pub fn success_message(message: &str) -> (StatusCode, Json<Envelope<()>>) {
    (StatusCode::OK, Json(Envelope::success(Some(message.to_string()), None)))
}

pub fn success_page<T: Serialize>(data: Vec<T>, pagination: Pagination) -> (StatusCode, Json<Envelope<Vec<T>>>) {
    let mut envelope = Envelope::success(None, Some(data));
    envelope.pagination = Some(pagination);
    (StatusCode::OK, Json(envelope))
}
