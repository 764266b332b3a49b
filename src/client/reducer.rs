//! Pure state transition function.

use super::action::Action;
use super::state::{FilterCriteria, Operation, PropertyState, RequestStatus};

pub fn reduce(mut state: PropertyState, action: Action) -> PropertyState {
    match action {
        Action::SetSelectedProperty(p) => state.selected_property = Some(p),
        Action::ClearSelectedProperty => state.selected_property = None,
        Action::SetFilters(patch) => state.filters.merge(patch),
        Action::ResetFilters => state.filters = FilterCriteria::default(),
        Action::ClearError => state.error = None,
        Action::Pending(op) => {
            state.status.set(op, RequestStatus::Loading);
            state.error = None;
        }
        Action::FetchFulfilled(records) => {
            state.status.set(Operation::Fetch, RequestStatus::Succeeded);
            state.properties = records;
            state.revision += 1;
        }
        Action::CreateFulfilled(record) => {
            state.status.set(Operation::Create, RequestStatus::Succeeded);
            state.properties.push(record);
            state.revision += 1;
            state.error = None;
        }
        Action::UpdateFulfilled(record) => {
            state.status.set(Operation::Update, RequestStatus::Succeeded);
            if let Some(slot) = state.properties.iter_mut().find(|p| p.id == record.id) {
                *slot = record;
                state.revision += 1;
            }
            state.error = None;
        }
        Action::Rejected(op, message) => {
            state.status.set(op, RequestStatus::Failed);
            state.error = Some(message);
        }
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::state::{FilterPatch, PriceRange};
    use crate::model::{Location, NewProperty, Property, PropertyId, PropertyStatus};
    use chrono::Utc;

    fn property(title: &str) -> Property {
        Property::from_new(
            PropertyId::new(),
            NewProperty {
                title: title.into(),
                description: "Test Description".into(),
                price: 200_000.0,
                location: Location {
                    address: "123 Test St".into(),
                    city: "Test City".into(),
                    state: "TS".into(),
                    zip_code: "12345".into(),
                },
                features: vec!["feature1".into(), "feature2".into()],
                images: vec!["image1.jpg".into()],
                status: PropertyStatus::Available,
            },
            Utc::now(),
        )
    }

    #[test]
    fn initial_state() {
        let s = PropertyState::default();
        assert!(s.properties.is_empty());
        assert!(s.selected_property.is_none());
        assert!(!s.is_loading());
        assert!(s.error.is_none());
        assert_eq!(s.filters.price_range, PriceRange { min: 0.0, max: 1_000_000.0 });
        assert!(s.filters.status.is_empty());
        assert_eq!(s.filters.location, "");
    }

    #[test]
    fn selection() {
        let p = property("Test Property");
        let s = reduce(PropertyState::default(), Action::SetSelectedProperty(p.clone()));
        assert_eq!(s.selected_property, Some(p));
        let s = reduce(s, Action::ClearSelectedProperty);
        assert!(s.selected_property.is_none());
    }

    #[test]
    fn set_filters_merges_and_reset_restores_defaults() {
        let s = reduce(
            PropertyState::default(),
            Action::SetFilters(FilterPatch {
                status: Some(vec![PropertyStatus::Available]),
                price_range: Some(PriceRange { min: 100_000.0, max: 500_000.0 }),
                location: None,
            }),
        );
        assert_eq!(s.filters.status, vec![PropertyStatus::Available]);
        assert_eq!(s.filters.price_range.min, 100_000.0);
        assert_eq!(s.filters.location, "");

        let s = reduce(
            s,
            Action::SetFilters(FilterPatch {
                location: Some("Test City".into()),
                ..Default::default()
            }),
        );
        assert_eq!(s.filters.status, vec![PropertyStatus::Available]);
        assert_eq!(s.filters.location, "Test City");

        let s = reduce(s, Action::ResetFilters);
        assert_eq!(s.filters, FilterCriteria::default());
    }

    #[test]
    fn fetch_lifecycle() {
        let s = reduce(PropertyState::default(), Action::Rejected(Operation::Fetch, "boom".into()));
        let s = reduce(s, Action::Pending(Operation::Fetch));
        assert!(s.is_loading());
        assert!(s.error.is_none());
        let s = reduce(s, Action::FetchFulfilled(vec![property("A"), property("B")]));
        assert!(!s.is_loading());
        assert_eq!(s.status.fetch, RequestStatus::Succeeded);
        assert_eq!(s.properties.len(), 2);
    }

    #[test]
    fn create_appends_and_update_replaces_by_id() {
        let a = property("A");
        let s = reduce(PropertyState::default(), Action::FetchFulfilled(vec![a.clone()]));
        let s = reduce(s, Action::CreateFulfilled(property("B")));
        assert_eq!(s.properties.len(), 2);
        assert_eq!(s.properties[1].title, "B");

        let mut edited = a.clone();
        edited.title = "A2".into();
        let s = reduce(s, Action::UpdateFulfilled(edited));
        assert_eq!(s.properties[0].title, "A2");
        assert_eq!(s.properties.len(), 2);
    }

    #[test]
    fn update_of_unknown_id_is_a_noop() {
        let s = reduce(PropertyState::default(), Action::FetchFulfilled(vec![property("A")]));
        let before = s.properties.clone();
        let rev = s.revision;
        let s = reduce(s, Action::UpdateFulfilled(property("stranger")));
        assert_eq!(s.properties, before);
        assert_eq!(s.revision, rev);
        assert_eq!(s.status.update, RequestStatus::Succeeded);
    }

    #[test]
    fn failure_keeps_records_and_sets_error() {
        let s = reduce(PropertyState::default(), Action::FetchFulfilled(vec![property("A")]));
        let s = reduce(s, Action::Pending(Operation::Create));
        let s = reduce(s, Action::Rejected(Operation::Create, "Validation failed".into()));
        assert_eq!(s.properties.len(), 1);
        assert_eq!(s.error.as_deref(), Some("Validation failed"));
        assert_eq!(s.status.create, RequestStatus::Failed);
        assert!(!s.is_loading());
        let s = reduce(s, Action::ClearError);
        assert!(s.error.is_none());
    }

    #[test]
    fn operations_are_tracked_independently() {
        let s = reduce(PropertyState::default(), Action::Pending(Operation::Fetch));
        let s = reduce(s, Action::Pending(Operation::Update));
        let s = reduce(s, Action::FetchFulfilled(vec![]));
        assert_eq!(s.status.fetch, RequestStatus::Succeeded);
        assert_eq!(s.status.update, RequestStatus::Loading);
        assert!(s.is_loading());
    }
}
