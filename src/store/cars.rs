//! Car Store
//!
//! Keeps the car collection in memory and simulates the latency of a real
//! database on every call, so the effect of the cache is visible.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::Utc;
use rand::Rng;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::info;

use crate::models::{Car, NewCar};

/// Errors returned by store mutations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Entity does not exist: {0}")]
    NotFound(u64),
}

#[derive(Debug)]
struct Inventory {
    cars: Vec<Car>,
    last_id: u64,
}

// == Car Store ==
/// In-memory car collection with simulated access latency.
#[derive(Debug)]
pub struct CarStore {
    inventory: RwLock<Inventory>,
    lookups: AtomicU64,
    min_delay: Duration,
    max_delay: Duration,
}

impl CarStore {
    // == Constructor ==
    /// Creates a store holding `cars`. Every operation sleeps a random
    /// duration between `min_delay` and `max_delay` first.
    pub fn new(cars: Vec<Car>, min_delay: Duration, max_delay: Duration) -> Self {
        let last_id = cars.iter().map(|car| car.id).max().unwrap_or(0);
        let (min_delay, max_delay) = if min_delay <= max_delay {
            (min_delay, max_delay)
        } else {
            (max_delay, min_delay)
        };

        Self {
            inventory: RwLock::new(Inventory { cars, last_id }),
            lookups: AtomicU64::new(0),
            min_delay,
            max_delay,
        }
    }

    /// Creates a store without simulated latency.
    pub fn instant(cars: Vec<Car>) -> Self {
        Self::new(cars, Duration::ZERO, Duration::ZERO)
    }

    /// Returns every car.
    pub async fn find_all(&self) -> Vec<Car> {
        self.simulate_latency().await;
        self.inventory.read().await.cars.clone()
    }

    /// Returns the car with `id`, if any.
    pub async fn find_one(&self, id: u64) -> Option<Car> {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        self.simulate_latency().await;
        self.inventory
            .read()
            .await
            .cars
            .iter()
            .find(|car| car.id == id)
            .cloned()
    }

    /// Number of single-car lookups served so far.
    pub fn lookups(&self) -> u64 {
        self.lookups.load(Ordering::Relaxed)
    }

    /// Adds a car under the next free id.
    pub async fn create(&self, data: NewCar) -> Car {
        self.simulate_latency().await;
        let mut inventory = self.inventory.write().await;

        inventory.last_id += 1;
        let now = Utc::now();
        let car = Car {
            id: inventory.last_id,
            brand: data.brand,
            country: data.country,
            created_at: now,
            updated_at: now,
        };
        inventory.cars.push(car.clone());

        info!(id = car.id, "Car created");
        car
    }

    /// Replaces the writable fields of car `id`. The id and creation time
    /// are kept; the update time is refreshed.
    pub async fn update(&self, id: u64, data: NewCar) -> Result<Car, StoreError> {
        self.simulate_latency().await;
        let mut inventory = self.inventory.write().await;

        let car = inventory
            .cars
            .iter_mut()
            .find(|car| car.id == id)
            .ok_or(StoreError::NotFound(id))?;
        car.brand = data.brand;
        car.country = data.country;
        car.updated_at = Utc::now();

        info!(id, "Car updated");
        Ok(car.clone())
    }

    /// Removes car `id` and returns it.
    pub async fn delete(&self, id: u64) -> Result<Car, StoreError> {
        self.simulate_latency().await;
        let mut inventory = self.inventory.write().await;

        let index = inventory
            .cars
            .iter()
            .position(|car| car.id == id)
            .ok_or(StoreError::NotFound(id))?;

        info!(id, "Car deleted");
        Ok(inventory.cars.remove(index))
    }

    async fn simulate_latency(&self) {
        if self.max_delay.is_zero() {
            return;
        }
        let delay = rand::thread_rng().gen_range(self.min_delay..=self.max_delay);
        tokio::time::sleep(delay).await;
    }
}

// == Seed Data ==
/// The cars the service starts with.
pub fn seed_cars() -> Vec<Car> {
    let now = Utc::now();
    [
        ("Ford", "USA"),
        ("Lamborghini", "Italy"),
        ("Ferrari", "Italy"),
        ("Volvo", "Sweden"),
        ("Fiat", "Italy"),
        ("Porsche", "Germany"),
        ("Skoda", "Czech Republic"),
        ("Seat", "Spain"),
        ("Peugeot", "France"),
    ]
    .into_iter()
    .zip(1u64..)
    .map(|((brand, country), id)| Car {
        id,
        brand: brand.to_string(),
        country: country.to_string(),
        created_at: now,
        updated_at: now,
    })
    .collect()
}
