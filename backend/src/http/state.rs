//! Application state for the HTTP server.

use std::sync::Arc;

use crate::config::AnalyticsConfig;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Defaults applied to request parameters the client leaves out
    pub config: Arc<AnalyticsConfig>,
}

impl AppState {
    /// Create a new application state with the given configuration.
    pub fn new(config: AnalyticsConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(AnalyticsConfig::default())
    }
}
