//! Centralized error responder: every error response leaves through here as an envelope.

use crate::config::Environment;
use crate::error::ErrorReport;
use axum::{
    extract::State,
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response},
    Json,
};

/// Error statuses without a JSON body come from layers below the handlers (body limit, method routing).
fn is_bare_error(response: &Response) -> bool {
    let status = response.status();
    if !(status.is_client_error() || status.is_server_error()) {
        return false;
    }
    !response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"))
}

/// Render error envelopes. Outside production they carry the real message and a `stack` trace.
pub async fn render_error_details(State(environment): State<Environment>, mut response: Response) -> Response {
    let report = match response.extensions_mut().remove::<ErrorReport>() {
        Some(report) => report,
        None if is_bare_error(&response) => ErrorReport::from_status(response.status()),
        None => return response,
    };
    (report.status, Json(report.render(!environment.is_production()))).into_response()
}
