//! Property listings: validated CRUD over a record store, served with axum, plus a
//! client-side state container for the same records.

pub mod client;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod model;
pub mod openapi;
pub mod response;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

pub use config::{AppConfig, Environment};
pub use error::{AppError, ConfigError, FieldError};
pub use model::{Location, NewProperty, Property, PropertyId, PropertyPatch, PropertyStatus};
pub use routes::{app, common_routes, property_routes};
pub use service::{build_property_query, ListParams, PropertyValidator};
pub use state::AppState;
pub use store::{demo_listings, ensure_database_exists, MemoryStore, PgStore, PropertyStore};
