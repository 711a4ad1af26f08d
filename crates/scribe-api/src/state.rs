//! Application state shared across all route handlers.

use std::sync::Arc;
use std::time::Instant;

use scribe_core::ScribeConfig;
use scribe_router::IntentRouter;

/// Shared application state.
///
/// All fields use `Arc` for cheap cloning across handler tasks. The router
/// does its own per-session locking, so nothing here needs a `Mutex`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ScribeConfig>,
    pub router: Arc<IntentRouter>,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: ScribeConfig, router: IntentRouter) -> Self {
        Self {
            config: Arc::new(config),
            router: Arc::new(router),
            start_time: Instant::now(),
        }
    }
}
