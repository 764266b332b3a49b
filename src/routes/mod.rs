//! Router assembly.

mod common;
mod property;

pub use common::common_routes;
pub use property::property_routes;

use crate::handlers::route_not_found;
use crate::middleware::render_error_details;
use crate::state::AppState;
use axum::{middleware, Router};
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

/// Full application: common and property routes, a 404 fallback, a request body cap, the
/// error responder and request tracing. The body cap sits inside the responder so its 413 is enveloped.
pub fn app(state: AppState, body_limit: usize) -> Router {
    let environment = state.environment;
    Router::new()
        .merge(common_routes(state.clone()))
        .merge(property_routes(state))
        .fallback(route_not_found)
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(middleware::map_response_with_state(environment, render_error_details))
        .layer(TraceLayer::new_for_http())
}
