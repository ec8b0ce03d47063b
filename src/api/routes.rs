//! API Routes
//!
//! Configures the Axum router with the cars endpoints.

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    create_car, delete_car, get_car, list_cars, not_found, update_car, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /cars` - List all cars
/// - `POST /cars` - Create a car
/// - `GET /cars/:id` - Fetch one car (cached)
/// - `PUT /cars/:id` - Replace a car's brand and country
/// - `DELETE /cars/:id` - Delete a car
///
/// Unknown paths and unsupported methods answer 404.
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/cars",
            get(list_cars).post(create_car).fallback(not_found),
        )
        .route(
            "/cars/:id",
            get(get_car)
                .put(update_car)
                .delete(delete_car)
                .fallback(not_found),
        )
        .fallback(not_found)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{seed_cars, CarStore};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use std::time::Duration;
    use tower::util::ServiceExt;

    fn create_test_app() -> Router {
        let state =
            AppState::new(CarStore::instant(seed_cars()), Some(Duration::from_secs(5))).unwrap();
        create_router(state)
    }

    async fn status_of(request: Request<Body>) -> StatusCode {
        create_test_app().oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn test_list_endpoint() {
        let request = Request::builder().uri("/cars").body(Body::empty()).unwrap();
        assert_eq!(status_of(request).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_get_endpoint() {
        let request = Request::builder().uri("/cars/3").body(Body::empty()).unwrap();
        assert_eq!(status_of(request).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_malformed_id_falls_through() {
        for uri in ["/cars/0", "/cars/07", "/cars/abc"] {
            let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
            assert_eq!(status_of(request).await, StatusCode::NOT_FOUND, "{uri}");
        }
    }

    #[tokio::test]
    async fn test_unknown_path() {
        let request = Request::builder().uri("/trucks").body(Body::empty()).unwrap();
        assert_eq!(status_of(request).await, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unsupported_method() {
        let request = Request::builder()
            .method("PATCH")
            .uri("/cars/1")
            .body(Body::empty())
            .unwrap();
        assert_eq!(status_of(request).await, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_endpoint() {
        let request = Request::builder()
            .method("POST")
            .uri("/cars")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"brand":"Renault","country":"France"}"#))
            .unwrap();
        assert_eq!(status_of(request).await, StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_malformed_json() {
        let request = Request::builder()
            .method("POST")
            .uri("/cars")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"brand":"#))
            .unwrap();
        assert_eq!(status_of(request).await, StatusCode::BAD_REQUEST);
    }
}
