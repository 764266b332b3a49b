//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
}

/// One failing field of a request body or query string. `field` is a dotted path such as `location.city`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        FieldError {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation failed")]
    Validation(Vec<FieldError>),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    PayloadTooLarge(String),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn property_not_found() -> Self {
        AppError::NotFound("Property not found".into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Db(sqlx::Error::RowNotFound) => StatusCode::NOT_FOUND,
            AppError::Db(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Unclassified errors hide their message outside development.
    fn is_unclassified(&self) -> bool {
        self.status_code() == StatusCode::INTERNAL_SERVER_ERROR
    }
}

/// Everything needed to render an error envelope. Travels as a response extension so the
/// environment-aware middleware can re-render it with diagnostics.
#[derive(Clone, Debug)]
pub struct ErrorReport {
    pub status: StatusCode,
    pub message: String,
    pub errors: Vec<FieldError>,
    pub trace: String,
    pub unclassified: bool,
}

impl ErrorReport {
    /// Report for an error response produced outside the handlers, e.g. by a tower layer.
    pub fn from_status(status: StatusCode) -> Self {
        ErrorReport {
            status,
            message: status.canonical_reason().unwrap_or("Error").to_string(),
            errors: Vec::new(),
            trace: format!("{} returned by middleware", status),
            unclassified: status.is_server_error(),
        }
    }

    pub fn render(&self, expose_internals: bool) -> serde_json::Value {
        let message = if self.unclassified && !expose_internals {
            "Internal Server Error".to_string()
        } else {
            self.message.clone()
        };
        let mut body = serde_json::json!({
            "status": "error",
            "statusCode": self.status.as_u16(),
            "message": message,
        });
        if !self.errors.is_empty() {
            body["errors"] = serde_json::to_value(&self.errors).unwrap_or_default();
        }
        if expose_internals {
            body["stack"] = serde_json::Value::String(self.trace.clone());
        }
        body
    }
}

impl From<&AppError> for ErrorReport {
    fn from(err: &AppError) -> Self {
        let errors = match err {
            AppError::Validation(errors) => errors.clone(),
            _ => Vec::new(),
        };
        ErrorReport {
            status: err.status_code(),
            message: err.to_string(),
            errors,
            trace: format!("{:?}", err),
            unclassified: err.is_unclassified(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let report = ErrorReport::from(&self);
        if report.unclassified {
            tracing::error!(error = ?self, "unhandled error");
        } else {
            tracing::debug!(status = %report.status, message = %report.message, "request failed");
        }
        let mut response = (report.status, Json(report.render(false))).into_response();
        response.extensions_mut().insert(report);
        response
    }
}
