//! HTTP surface: query endpoint, health and Prometheus metrics

pub mod handlers;
pub mod router;
pub mod types;

pub use router::{create_router, AppState};
