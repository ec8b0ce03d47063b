//! Response DTOs for the cars API
//!
//! Defines the structure of outgoing error bodies. Successful responses
//! serialize the [`Car`](super::Car) entity directly.

use serde::Serialize;
use serde_json::Value;

/// Error response body for all error conditions
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorResponse {
    /// HTTP status code, repeated in the body
    pub status: u16,
    /// Short description of the failure
    pub message: String,
    /// Details, e.g. the offending property of a rejected body
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse without details
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            data: None,
        }
    }

    /// Attaches details to the response
    pub fn with_data(mut self, data: impl Into<Value>) -> Self {
        self.data = Some(data.into());
        self
    }
}
