//! Response models for the node's HTTP API
//!
//! Defines the DTOs serialized into HTTP response bodies. The peer wire
//! endpoint itself returns raw bytes and has no DTO.

pub mod responses;

// Re-export commonly used types
pub use responses::{HealthResponse, StatsResponse};
