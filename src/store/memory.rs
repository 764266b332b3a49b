//! In-process store for development and tests. Each instance owns its records.

use super::PropertyStore;
use crate::error::AppError;
use crate::model::{Location, NewProperty, Property, PropertyId, PropertyPatch, PropertyStatus};
use crate::service::query::{PropertyFilter, Sort};
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<Vec<Property>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<Property>) -> Self {
        MemoryStore {
            records: RwLock::new(records),
        }
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl PropertyStore for MemoryStore {
    async fn create(&self, new: NewProperty) -> Result<Property, AppError> {
        let property = Property::from_new(PropertyId::new(), new, Utc::now());
        self.records.write().await.push(property.clone());
        Ok(property)
    }

    async fn find(
        &self,
        filter: &PropertyFilter,
        sort: &Sort,
        skip: u64,
        limit: u32,
    ) -> Result<Vec<Property>, AppError> {
        let records = self.records.read().await;
        let mut matched: Vec<&Property> = records.iter().filter(|p| filter.matches(p)).collect();
        matched.sort_by(|a, b| sort.compare(a, b));
        let skip = usize::try_from(skip).unwrap_or(usize::MAX);
        Ok(matched
            .into_iter()
            .skip(skip)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn count(&self, filter: &PropertyFilter) -> Result<u64, AppError> {
        let records = self.records.read().await;
        Ok(records.iter().filter(|p| filter.matches(p)).count() as u64)
    }

    async fn get(&self, id: &PropertyId) -> Result<Property, AppError> {
        self.records
            .read()
            .await
            .iter()
            .find(|p| p.id == *id)
            .cloned()
            .ok_or_else(AppError::property_not_found)
    }

    async fn update(&self, id: &PropertyId, patch: PropertyPatch) -> Result<Property, AppError> {
        let mut records = self.records.write().await;
        let record = records
            .iter_mut()
            .find(|p| p.id == *id)
            .ok_or_else(AppError::property_not_found)?;
        record.apply_patch(patch, Utc::now());
        Ok(record.clone())
    }

    async fn delete(&self, id: &PropertyId) -> Result<(), AppError> {
        let mut records = self.records.write().await;
        let pos = records
            .iter()
            .position(|p| p.id == *id)
            .ok_or_else(AppError::property_not_found)?;
        records.remove(pos);
        Ok(())
    }
}

/// Two sample listings for a seeded development store.
pub fn demo_listings() -> Vec<Property> {
    let now = Utc::now();
    let listing = |title: &str, description: &str, price: f64, location: Location, features: &[&str]| {
        Property::from_new(
            PropertyId::new(),
            NewProperty {
                title: title.into(),
                description: description.into(),
                price,
                location,
                features: features.iter().map(|f| f.to_string()).collect(),
                images: vec!["/api/placeholder/400/200".into()],
                status: PropertyStatus::Available,
            },
            now,
        )
    };
    vec![
        listing(
            "Modern Downtown Apartment",
            "Luxurious 2-bedroom apartment in the heart of downtown",
            250_000.0,
            Location {
                address: "123 Main St".into(),
                city: "New York".into(),
                state: "NY".into(),
                zip_code: "10001".into(),
            },
            &["2 Bedrooms", "2 Bathrooms", "Parking", "Pool"],
        ),
        listing(
            "Suburban Family Home",
            "Spacious 4-bedroom house with large backyard",
            450_000.0,
            Location {
                address: "456 Oak Avenue".into(),
                city: "Los Angeles".into(),
                state: "CA".into(),
                zip_code: "90001".into(),
            },
            &["4 Bedrooms", "3 Bathrooms", "Garden", "Garage"],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::query::{build_property_query, ListParams, PropertyQuery};

    fn new_property(title: &str, price: f64) -> NewProperty {
        NewProperty {
            title: title.into(),
            description: "A perfectly fine place to live".into(),
            price,
            location: Location {
                address: "1 St".into(),
                city: "X".into(),
                state: "Y".into(),
                zip_code: "1".into(),
            },
            features: vec![],
            images: vec![],
            status: PropertyStatus::Available,
        }
    }

    #[tokio::test]
    async fn create_then_get() {
        let store = MemoryStore::new();
        let created = store.create(new_property("A", 100.0)).await.unwrap();
        let fetched = store.get(&created.id).await.unwrap();
        assert_eq!(created, fetched);
        assert_eq!(fetched.created_at, fetched.updated_at);
    }

    #[tokio::test]
    async fn stores_are_independent() {
        let a = MemoryStore::new();
        let b = MemoryStore::new();
        a.create(new_property("A", 1.0)).await.unwrap();
        assert_eq!(a.len().await, 1);
        assert!(b.is_empty().await);
    }

    #[tokio::test]
    async fn list_pages_and_counts() {
        let store = MemoryStore::new();
        for i in 0..23 {
            store.create(new_property(&format!("P{i}"), i as f64)).await.unwrap();
        }
        let params = ListParams {
            page: Some("3".into()),
            limit: Some("10".into()),
            sort: Some("price".into()),
            ..Default::default()
        };
        let (page, total) = store.list(&build_property_query(&params).unwrap()).await.unwrap();
        assert_eq!(total, 23);
        assert_eq!(page.len(), 3);
        assert_eq!(page[0].price, 20.0);
    }

    #[tokio::test]
    async fn missing_ids_are_not_found() {
        let store = MemoryStore::with_records(demo_listings());
        let id = PropertyId::new();
        assert!(matches!(store.get(&id).await, Err(AppError::NotFound(_))));
        assert!(matches!(
            store.update(&id, PropertyPatch::default()).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(store.delete(&id).await, Err(AppError::NotFound(_))));
        let (all, total) = store.list(&PropertyQuery::default()).await.unwrap();
        assert_eq!((all.len(), total), (2, 2));
    }

    #[tokio::test]
    async fn delete_twice_fails_second_time() {
        let store = MemoryStore::new();
        let p = store.create(new_property("A", 1.0)).await.unwrap();
        store.delete(&p.id).await.unwrap();
        assert!(matches!(store.delete(&p.id).await, Err(AppError::NotFound(_))));
    }
}
