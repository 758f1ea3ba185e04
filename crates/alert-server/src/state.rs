//! Shared handler state.

use std::sync::Arc;

use alert_data::AggregationEngine;

/// Origin value meaning "allow every origin".
pub const ANY_ORIGIN: &str = "*";

/// State cloned into every request handler and middleware.
#[derive(Debug, Clone)]
pub struct AppState {
    pub engine: Arc<AggregationEngine>,
    /// Allowed CORS origins. `*` allows every origin.
    pub cors_origins: Arc<Vec<String>>,
}

impl AppState {
    /// State with the permissive `*` CORS policy.
    pub fn new(engine: AggregationEngine) -> Self {
        Self::with_cors(engine, vec![ANY_ORIGIN.to_string()])
    }

    pub fn with_cors(engine: AggregationEngine, cors_origins: Vec<String>) -> Self {
        Self {
            engine: Arc::new(engine),
            cors_origins: Arc::new(cors_origins),
        }
    }

    /// The value to echo in `access-control-allow-origin`, if the request
    /// origin is allowed.
    pub fn allowed_origin(&self, origin: Option<&str>) -> Option<String> {
        if self.cors_origins.iter().any(|o| o == ANY_ORIGIN) {
            return Some(ANY_ORIGIN.to_string());
        }
        let origin = origin?;
        self.cors_origins
            .iter()
            .any(|o| o == origin)
            .then(|| origin.to_string())
    }
}
