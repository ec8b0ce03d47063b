//! Car Cache - a cars REST API fronted by an in-memory TTL cache
//!
//! Single-car reads go through a read-through cache with per-entry expiry;
//! writes go to the store and invalidate the affected cache keys.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod store;
mod tasks;

pub use api::AppState;
pub use cache::TtlCache;
pub use config::Config;
