use property_listing::client::{ClientError, ClientStore, FilterPatch, FilteredView, HttpPropertyApi, Operation, PropertyApi, RequestStatus};
use property_listing::{app, AppState, Environment, Location, MemoryStore, NewProperty, PropertyPatch, PropertyStatus};
use property_listing::ListParams;
use std::sync::Arc;
use tokio::net::TcpListener;

async fn spawn_server() -> String {
    let state = AppState::new(Arc::new(MemoryStore::new()), Environment::Test);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app(state, 1024 * 1024)).await.unwrap();
    });
    format!("http://{}", addr)
}

fn new_listing(title: &str, city: &str, price: f64) -> NewProperty {
    NewProperty {
        title: title.into(),
        description: "Two bedrooms and a garden".into(),
        price,
        location: Location {
            address: "9 Elm St".into(),
            city: city.into(),
            state: "MA".into(),
            zip_code: "02101".into(),
        },
        features: vec!["Garden".into()],
        images: vec![],
        status: PropertyStatus::Available,
    }
}

#[tokio::test]
async fn client_store_round_trips_through_the_server() {
    let base = spawn_server().await;
    let store = ClientStore::new(HttpPropertyApi::new(base));

    let a = store.create_property(&new_listing("Elm house", "Boston", 300_000.0)).await.unwrap();
    store.create_property(&new_listing("Oak flat", "Salem", 2_000_000.0)).await.unwrap();

    let records = store.fetch_properties(&ListParams::default()).await.unwrap();
    assert_eq!(records.len(), 2);
    let state = store.snapshot();
    assert_eq!(state.status.fetch, RequestStatus::Succeeded);
    assert!(!state.is_loading());

    let mut view = FilteredView::new();
    assert_eq!(view.get(&state).len(), 1);

    store.dispatch(property_listing::client::Action::SetFilters(FilterPatch {
        location: Some("salem".into()),
        price_range: Some(property_listing::client::PriceRange {
            min: 0.0,
            max: 5_000_000.0,
        }),
        ..Default::default()
    }));
    let state = store.snapshot();
    let visible = view.get(&state);
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].title, "Oak flat");

    let patch = PropertyPatch {
        price: Some(310_000.0),
        ..Default::default()
    };
    let updated = store.update_property(&a.id, &patch).await.unwrap();
    assert_eq!(updated.price, 310_000.0);
    assert_eq!(updated.title, "Elm house");
    let state = store.snapshot();
    let local = state.properties.iter().find(|p| p.id == a.id).unwrap();
    assert_eq!(local.price, 310_000.0);
}

#[tokio::test]
async fn server_errors_surface_as_state_errors() {
    let base = spawn_server().await;
    let store = ClientStore::new(HttpPropertyApi::new(base));

    let mut bad = new_listing("", "Boston", 1.0);
    bad.description = "short".into();
    let err = store.create_property(&bad).await.unwrap_err();
    match &err {
        ClientError::Api { status, errors, .. } => {
            assert_eq!(*status, 400);
            assert_eq!(errors.len(), 2);
        }
        other => panic!("unexpected error {other:?}"),
    }
    let state = store.snapshot();
    assert_eq!(state.status.get(Operation::Create), RequestStatus::Failed);
    assert!(state.error.as_deref().unwrap().starts_with("Validation failed"));

    let missing = store.api().get(&property_listing::PropertyId::new()).await.unwrap_err();
    assert_eq!(missing.to_string(), "Property not found");
}

#[tokio::test]
async fn fetch_all_walks_every_page() {
    let base = spawn_server().await;
    let store = ClientStore::new(HttpPropertyApi::new(base));
    for i in 0..12 {
        store
            .create_property(&new_listing(&format!("Unit {i}"), "Boston", 1000.0 + i as f64))
            .await
            .unwrap();
    }

    let first_page = store.fetch_properties(&ListParams::default()).await.unwrap();
    assert_eq!(first_page.len(), 10);

    let params = ListParams {
        limit: Some("5".into()),
        ..Default::default()
    };
    let all = store.fetch_all_properties(&params).await.unwrap();
    assert_eq!(all.len(), 12);
    let state = store.snapshot();
    assert_eq!(state.properties.len(), 12);
    assert_eq!(state.status.fetch, RequestStatus::Succeeded);

    let mut view = FilteredView::new();
    assert_eq!(view.get(&state).len(), 12);
}
