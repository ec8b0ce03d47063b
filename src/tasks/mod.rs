//! Background Tasks Module
//!
//! Contains the tasks the cache schedules on the Tokio runtime.
//!
//! # Tasks
//! - TTL Eviction: removes one expired cache entry at its deadline

mod eviction;

pub(crate) use eviction::spawn_eviction;
