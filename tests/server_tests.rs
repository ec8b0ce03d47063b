//! End-to-end tests against a real listener.

use std::net::SocketAddr;
use std::time::Duration;

use car_cache::{api::create_router, store::seed_cars, store::CarStore, AppState};
use reqwest::StatusCode;
use serde_json::{json, Value};

async fn spawn_server(state: AppState) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, create_router(state)).await.unwrap();
    });
    addr
}

#[tokio::test]
async fn test_read_through_and_invalidation_over_http() {
    let store = CarStore::new(
        seed_cars(),
        Duration::from_millis(5),
        Duration::from_millis(10),
    );
    let state = AppState::new(store, Some(Duration::from_secs(5))).unwrap();
    let addr = spawn_server(state.clone()).await;
    let client = reqwest::Client::new();
    let url = format!("http://{addr}/cars/1");

    let car: Value = client.get(&url).send().await.unwrap().json().await.unwrap();
    assert_eq!(car["brand"], "Ford");
    assert_eq!(state.cache.keys(), vec!["cars/1".to_string()]);

    let response = client
        .put(&url)
        .json(&json!({"brand": "Ford2", "country": "USA"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(state.cache.is_empty());

    let car: Value = client.get(&url).send().await.unwrap().json().await.unwrap();
    assert_eq!(car["brand"], "Ford2");

    let response = client.delete(&url).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = client.get(&url).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"status": 404, "message": "Entity not found"}));
}

#[tokio::test]
async fn test_concurrent_requests_query_store_once() {
    let store = CarStore::new(
        seed_cars(),
        Duration::from_millis(50),
        Duration::from_millis(100),
    );
    let state = AppState::new(store, Some(Duration::from_secs(5))).unwrap();
    let addr = spawn_server(state.clone()).await;
    let client = reqwest::Client::new();
    let url = format!("http://{addr}/cars/3");

    let requests = (0..8).map(|_| {
        let client = client.clone();
        let url = url.clone();
        tokio::spawn(async move {
            client.get(&url).send().await.unwrap().json::<Value>().await
        })
    });

    for request in requests.collect::<Vec<_>>() {
        let car = request.await.unwrap().unwrap();
        assert_eq!(car["brand"], "Ferrari");
    }
    assert_eq!(state.store.lookups(), 1);
    assert_eq!(state.cache.len(), 1);
}
