use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use catalog::{Category, ProductPayload};
use client::{Action, ApiClient, ClientError, ProductForm, Session, form::SUBMIT_KEY};
use server::{
    build_router,
    config::Config,
    seed::seed_categories,
    state::State,
    store::{MemoryStore, Store},
};
use tokio::net::TcpListener;

async fn spawn_server() -> (ApiClient, Vec<Category>) {
    let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
    let categories = seed_categories(store.as_ref()).await.expect("seed categories");
    let state = State::with_store(Config::in_memory(), store);

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let app = build_router(state);
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve app") });

    (ApiClient::new(&format!("http://{addr}")), categories)
}

fn id_of(categories: &[Category], name: &str) -> String {
    categories
        .iter()
        .find(|c| c.name == name)
        .map(|c| c.id.clone())
        .expect("seeded category")
}

async fn add_many(api: &ApiClient, books: &str, count: usize) {
    for i in 0..count {
        api.create_product(&ProductPayload::new(
            &format!("Book number {i}"),
            "A paperback in good condition",
            1,
            vec![books.to_string()],
        ))
        .await
        .expect("create product");
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
}

#[tokio::test]
async fn deleting_last_item_on_second_page_returns_to_first() {
    let (api, categories) = spawn_server().await;
    let books = id_of(&categories, "Books");
    add_many(&api, &books, 11).await;

    let mut session = Session::new(api);
    session.start().await.expect("start");
    assert_eq!(session.state().products.len(), 10);
    assert_eq!(session.state().total_pages, 2);
    let first_page: Vec<String> = session
        .state()
        .products
        .iter()
        .map(|p| p.id.clone())
        .collect();

    session.dispatch(Action::PageRequested(2)).await;
    assert_eq!(session.state().current_page, 2);
    let last = session.state().products[0].clone();
    assert_eq!(last.name, "Book number 0");

    session
        .dispatch(Action::DeleteRequested {
            id: last.id.clone(),
            name: last.name.clone(),
        })
        .await;
    session.dispatch(Action::DeleteConfirmed).await;

    let state = session.state();
    assert_eq!(state.current_page, 1);
    assert_eq!(state.total_pages, 1);
    let shown: Vec<String> = state.products.iter().map(|p| p.id.clone()).collect();
    assert_eq!(shown, first_page);
    assert_eq!(
        state.notice.as_ref().map(|n| n.text.as_str()),
        Some("Product deleted successfully!")
    );
    assert!(state.alert.is_none());

    let err = session
        .api()
        .get_product(&last.id)
        .await
        .expect_err("deleted product");
    assert!(err.is_not_found());
}

#[tokio::test]
async fn filters_narrow_the_listing() {
    let (api, categories) = spawn_server().await;
    let books = id_of(&categories, "Books");
    let toys = id_of(&categories, "Toys");

    for (name, category) in [("Atlas", &books), ("Atlas Puzzle", &toys), ("Kite", &toys)] {
        api.create_product(&ProductPayload::new(
            name,
            "Something described at length",
            2,
            vec![category.clone()],
        ))
        .await
        .expect("create product");
    }

    let mut session = Session::new(api);
    session.start().await.expect("start");
    assert_eq!(session.state().categories.len(), 6);
    assert_eq!(session.state().products.len(), 3);

    session
        .dispatch(Action::SearchChanged("atlas".to_string()))
        .await;
    assert_eq!(session.state().products.len(), 2);

    session.dispatch(Action::CategoryToggled(toys)).await;
    let names: Vec<_> = session
        .state()
        .products
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(names, ["Atlas Puzzle"]);

    session.dispatch(Action::FiltersCleared).await;
    assert_eq!(session.state().products.len(), 3);
}

#[tokio::test]
async fn form_submission_and_notice_expiry() {
    let (api, categories) = spawn_server().await;
    let mut session = Session::new(api);
    session.start().await.expect("start");

    let mut form = ProductForm::new();
    form.set_name("Desk Lamp");
    form.set_description("Warm light for late reading");
    form.set_quantity("4");
    form.toggle_category(&id_of(&categories, "Home & Garden"));

    let created = session.submit(&mut form).await.expect("created");
    assert_eq!(created.categories[0].name, "Home & Garden");
    assert_eq!(form, ProductForm::default());
    assert_eq!(session.state().products.len(), 1);
    assert_eq!(session.pending_timers(), 1);

    session.tick(Instant::now()).await;
    assert!(session.state().notice.is_some());

    session.tick(Instant::now() + Duration::from_secs(3)).await;
    assert!(session.state().notice.is_none());
    assert_eq!(session.pending_timers(), 0);

    let mut twin = ProductForm::new();
    twin.set_name("Desk Lamp");
    twin.set_description("Another lamp for the same desk");
    twin.set_quantity("1");
    twin.toggle_category(&id_of(&categories, "Home & Garden"));

    assert!(session.submit(&mut twin).await.is_none());
    assert_eq!(
        twin.error(SUBMIT_KEY),
        Some("A product with this name already exists")
    );
}

#[tokio::test]
async fn failed_delete_raises_alert() {
    let (api, _) = spawn_server().await;
    let mut session = Session::new(api);
    session.start().await.expect("start");

    session
        .dispatch(Action::DeleteRequested {
            id: "missing".to_string(),
            name: "Ghost".to_string(),
        })
        .await;
    session.dispatch(Action::DeleteConfirmed).await;

    assert_eq!(
        session.state().alert.as_deref(),
        Some("Failed to delete product. Please try again.")
    );
    assert!(session.state().notice.is_none());
}

#[tokio::test]
async fn api_errors_carry_field_messages() {
    let (api, _) = spawn_server().await;

    let mut payload = ProductPayload::default();
    payload.name = Some("ab".to_string());

    let err = api
        .create_product(&payload)
        .await
        .expect_err("invalid product");

    let ClientError::Rejected { status, message, errors } = &err else {
        panic!("expected a rejection, got {err:?}");
    };
    assert_eq!(*status, 400);
    assert_eq!(message, "Validation failed");
    assert_eq!(errors[0].field, "name");
    assert_eq!(errors.len(), 4);
}
