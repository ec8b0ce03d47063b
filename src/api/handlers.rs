//! API Handlers
//!
//! HTTP request handlers for the cars endpoints. Single-car reads go
//! through the cache; every write invalidates the car's cache key.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;
use tracing::debug;

use crate::cache::TtlCache;
use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::models::{car_schema, BodySchema, Car, NewCar};
use crate::store::{seed_cars, CarStore};

/// Application state shared across all handlers.
///
/// The cache is created once at startup and handed to the handlers here
/// rather than living in a global.
#[derive(Clone)]
pub struct AppState {
    /// Read-through cache of single-car lookups
    pub cache: TtlCache<Car>,
    /// Authoritative car collection
    pub store: Arc<CarStore>,
    /// TTL applied to cached cars
    pub cache_ttl: Option<Duration>,
    schema: Arc<BodySchema>,
}

impl AppState {
    /// Creates a new AppState around the given store.
    pub fn new(
        store: CarStore,
        cache_ttl: Option<Duration>,
    ) -> std::result::Result<Self, regex::Error> {
        Ok(Self {
            cache: TtlCache::new(),
            store: Arc::new(store),
            cache_ttl,
            schema: Arc::new(car_schema()?),
        })
    }

    /// Creates a new AppState from configuration, with the seeded cars.
    pub fn from_config(config: &Config) -> std::result::Result<Self, regex::Error> {
        let store = CarStore::new(seed_cars(), config.store_min_delay, config.store_max_delay);
        Self::new(store, config.cache_ttl)
    }

    fn invalidate(&self, id: u64) {
        let key = Car::cache_key(id);
        self.cache.delete(&key);
        debug!(key = %key, "Invalidated cache entry");
    }
}

/// A JSON body, with the rejection kept so it renders as our own 400.
type JsonBody = std::result::Result<Json<Value>, JsonRejection>;

/// Parses a car id path segment. Ids are positive decimal numbers without
/// leading zeros; anything else does not address a car route.
fn parse_id(raw: &str) -> Result<u64> {
    let well_formed = raw.starts_with(|c: char| ('1'..='9').contains(&c))
        && raw.bytes().all(|b| b.is_ascii_digit());
    if !well_formed {
        return Err(ApiError::RouteNotFound);
    }
    raw.parse().map_err(|_| ApiError::RouteNotFound)
}

/// Validates a car body and converts it into the writable fields.
fn parse_car_body(schema: &BodySchema, body: JsonBody) -> Result<NewCar> {
    let Json(body) = body?;
    schema.validate(&body).map_err(ApiError::BadRequest)?;
    serde_json::from_value(body).map_err(|err| ApiError::BadRequest(err.to_string()))
}

/// Handler for GET /cars
pub async fn list_cars(State(state): State<AppState>) -> Json<Vec<Car>> {
    Json(state.store.find_all().await)
}

/// Handler for GET /cars/:id
///
/// Served from the cache; on a miss the store is queried and a found car
/// is cached for the configured TTL. Missing cars are not cached.
pub async fn get_car(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Car>> {
    let id = parse_id(&id)?;
    let store = Arc::clone(&state.store);

    let car = state
        .cache
        .get_or_set_with(Car::cache_key(id), state.cache_ttl, || async move {
            store
                .find_one(id)
                .await
                .ok_or_else(|| ApiError::NotFound("Entity not found".to_string()))
        })
        .await?;

    Ok(Json(car))
}

/// Handler for POST /cars
pub async fn create_car(
    State(state): State<AppState>,
    body: JsonBody,
) -> Result<(StatusCode, Json<Car>)> {
    let data = parse_car_body(&state.schema, body)?;
    let car = state.store.create(data).await;
    Ok((StatusCode::CREATED, Json(car)))
}

/// Handler for PUT /cars/:id
pub async fn update_car(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: JsonBody,
) -> Result<Json<Car>> {
    let id = parse_id(&id)?;
    let data = parse_car_body(&state.schema, body)?;

    let car = state.store.update(id, data).await?;
    state.invalidate(id);

    Ok(Json(car))
}

/// Handler for DELETE /cars/:id
pub async fn delete_car(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let id = parse_id(&id)?;

    state.store.delete(id).await?;
    state.invalidate(id);

    Ok(StatusCode::NO_CONTENT)
}

/// Fallback for unknown paths and unsupported methods.
pub async fn not_found() -> ApiError {
    ApiError::RouteNotFound
}
