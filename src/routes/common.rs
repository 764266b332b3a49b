//! Common routes: health, readiness, version, OpenAPI document.

use crate::handlers::route_not_found;
use crate::openapi::ApiDoc;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;
use utoipa::OpenApi;

#[derive(Serialize)]
struct HealthBody {
    status: &'static str,
    message: &'static str,
}

#[derive(Serialize)]
struct ReadyBody {
    status: &'static str,
    store: &'static str,
}

async fn health() -> Json<HealthBody> {
    Json(HealthBody {
        status: "ok",
        message: "Server is running",
    })
}

async fn ready(State(state): State<AppState>) -> Result<Json<ReadyBody>, (StatusCode, Json<ReadyBody>)> {
    if let Err(e) = state.store.ping().await {
        tracing::warn!(error = %e, "store unavailable");
        return Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ReadyBody {
                status: "degraded",
                store: "unavailable",
            }),
        ));
    }
    Ok(Json(ReadyBody {
        status: "ok",
        store: "ok",
    }))
}

async fn version() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// GET /health, /ready, /version, /openapi.json.
pub fn common_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health).fallback(route_not_found))
        .route("/ready", get(ready).fallback(route_not_found))
        .route("/version", get(version).fallback(route_not_found))
        .route("/openapi.json", get(openapi).fallback(route_not_found))
        .with_state(state)
}
