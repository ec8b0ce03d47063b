//! Data Store Module
//!
//! In-memory backing store for cars. This is the authoritative source the
//! cache reads through to.

mod cars;

pub use cars::{seed_cars, CarStore, StoreError};
