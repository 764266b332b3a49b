//! Property CRUD routes.

use crate::handlers::property::{create, delete as delete_handler, list, read, route_not_found, update};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn property_routes(state: AppState) -> Router {
    Router::new()
        .route("/properties", get(list).post(create).fallback(route_not_found))
        .route(
            "/properties/:id",
            get(read)
                .patch(update)
                .delete(delete_handler)
                .fallback(route_not_found),
        )
        .with_state(state)
}
