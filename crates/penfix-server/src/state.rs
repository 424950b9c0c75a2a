//! Application state shared by all handlers.

use std::sync::Arc;

use tokio::sync::Semaphore;

/// Server settings.
#[derive(Debug, Clone, Copy)]
pub struct ServerConfig {
    /// Scoring batches allowed on the blocking pool at once.
    pub max_concurrent_scoring: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            max_concurrent_scoring: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4),
        }
    }
}

/// Shared application state.
///
/// Scoring requests each build their own matcher, so no oracle is ever
/// shared; the semaphore only bounds CPU use.
#[derive(Clone)]
pub struct AppState {
    pub config: ServerConfig,
    pub scoring_slots: Arc<Semaphore>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        AppState {
            config,
            scoring_slots: Arc::new(Semaphore::new(config.max_concurrent_scoring.max(1))),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(ServerConfig::default())
    }
}
