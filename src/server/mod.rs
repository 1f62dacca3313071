//! Axum-based HTTP server implementation for the SparkPath gateway.
//!
//! This module is responsible for setting up the HTTP server, configuring
//! routes, and handling incoming requests from the SparkPath web app. Each
//! advisory endpoint validates its input, consults the cache-aside layer and
//! falls through to the advisor service on a miss.
//!
//! # Components
//!
//! - `handlers`: Advisory endpoints plus health and metrics.
//! - `mentor`: Mentor chat endpoints backed by the conversation registry.
//! - `extract`: Lenient JSON body extraction.
//! - `middleware`: Request ID, CORS and request metrics layers.
//! - `routes`: The main router configuration that ties everything together.

mod extract;
mod handlers;
mod mentor;
mod middleware;
mod routes;

pub use handlers::{HealthResponse, HealthStatus, CACHE_STATUS_HEADER};
pub use mentor::SUGGESTED_QUESTIONS;
pub use routes::{create_router, AppState};
