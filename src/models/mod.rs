//! Request and Response models for the cars API
//!
//! This module defines the car entity, request body validation and the
//! error body returned on failures.

pub mod car;
pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use car::{Car, NewCar};
pub use requests::{car_schema, BodySchema, Param, ParamType};
pub use responses::ErrorResponse;
