//! Record store adapter: the only way handlers reach persistence.

mod memory;
mod postgres;

pub use memory::{demo_listings, MemoryStore};
pub use postgres::{ensure_database_exists, PgStore, DEFAULT_TABLE};

use crate::error::AppError;
use crate::model::{NewProperty, Property, PropertyId, PropertyPatch};
use crate::service::query::{PropertyFilter, PropertyQuery, Sort};
use async_trait::async_trait;

#[async_trait]
pub trait PropertyStore: Send + Sync {
    /// Persist a new record with a fresh id and timestamps.
    async fn create(&self, new: NewProperty) -> Result<Property, AppError>;

    async fn find(
        &self,
        filter: &PropertyFilter,
        sort: &Sort,
        skip: u64,
        limit: u32,
    ) -> Result<Vec<Property>, AppError>;

    async fn count(&self, filter: &PropertyFilter) -> Result<u64, AppError>;

    /// `AppError::NotFound` when absent.
    async fn get(&self, id: &PropertyId) -> Result<Property, AppError>;

    /// Apply a partial patch. `AppError::NotFound` when absent.
    async fn update(&self, id: &PropertyId, patch: PropertyPatch) -> Result<Property, AppError>;

    /// `AppError::NotFound` when absent.
    async fn delete(&self, id: &PropertyId) -> Result<(), AppError>;

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }

    /// Page of records plus total matching count.
    ///
    /// The page and the count are two independent queries run concurrently, so under
    /// concurrent writes the total may disagree with the page.
    async fn list(&self, query: &PropertyQuery) -> Result<(Vec<Property>, u64), AppError> {
        tokio::try_join!(
            self.find(&query.filter, &query.sort, query.window.skip(), query.window.limit),
            self.count(&query.filter)
        )
    }
}
