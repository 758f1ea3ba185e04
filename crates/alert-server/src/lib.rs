//! HTTP query API for AlertIndia.
//!
//! Serves the aggregation engine's results as JSON over a small read-only
//! axum router, with permissive CORS and per-request tracing.

pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use alert_core as core;
pub use alert_data as data;
pub use routes::build_router;
pub use server::serve;
pub use state::AppState;
