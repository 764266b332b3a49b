//! Shared application state for all routes. The store is injected, never global.

use crate::config::Environment;
use crate::store::PropertyStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn PropertyStore>,
    pub environment: Environment,
}

impl AppState {
    pub fn new(store: Arc<dyn PropertyStore>, environment: Environment) -> Self {
        AppState { store, environment }
    }
}
