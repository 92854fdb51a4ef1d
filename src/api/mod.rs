//! API Module
//!
//! HTTP handlers and routing for the cache node.
//!
//! # Endpoints
//! - `GET /_cache/:group/:key` - Peer wire endpoint, returns raw bytes
//! - `GET /stats/:group` - Per-group cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
