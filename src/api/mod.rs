//! API Module
//!
//! HTTP handlers and routing for the cars REST API.
//!
//! # Endpoints
//! - `GET /cars` - List all cars
//! - `POST /cars` - Create a car
//! - `GET /cars/:id` - Fetch one car through the cache
//! - `PUT /cars/:id` - Update a car and invalidate its cache entry
//! - `DELETE /cars/:id` - Delete a car and invalidate its cache entry

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
