use tracing::{debug, warn};

use crate::error::ConfigError;

/// Receives the outcome of every refresh a strategy performs.
///
/// Scheduled refreshes have no caller to return an error to, so failures are
/// reported here instead and scheduling continues.
pub trait RefreshObserver: Send + Sync {
    /// Called after a refresh completed.
    fn on_refresh_success(&self) {}

    /// Called after a refresh failed or panicked.
    fn on_refresh_failure(&self, error: &ConfigError);
}

/// Default observer: logs outcomes through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingRefreshObserver;

impl RefreshObserver for TracingRefreshObserver {
    fn on_refresh_success(&self) {
        debug!("Refresh successful");
    }

    fn on_refresh_failure(&self, error: &ConfigError) {
        warn!(error = %error, "Refresh failed");
    }
}
